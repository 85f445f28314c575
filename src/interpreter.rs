//! Entry points for executing parsed programs.

use crate::runtime::context::{BufferedContext, Context};
use crate::runtime::error::RuntimeError;
use crate::runtime::execution::{Closure, Executable, Interrupt};
use crate::runtime::value::Value;

/// Executes a program against a fresh global scope. A `return` escaping
/// every method body is reported as a runtime error.
pub fn run(program: &dyn Executable, context: &mut dyn Context) -> Result<Value, RuntimeError> {
    let mut globals = Closure::new();
    match program.execute(&mut globals, context) {
        Ok(value) => Ok(value),
        Err(Interrupt::Return(_)) => Err(RuntimeError::ReturnOutsideMethod),
        Err(Interrupt::Error(error)) => Err(error),
    }
}

/// Executes a program and returns everything it printed.
pub fn run_captured(program: &dyn Executable) -> Result<String, RuntimeError> {
    let mut context = BufferedContext::new();
    run(program, &mut context)?;
    Ok(context.contents())
}
