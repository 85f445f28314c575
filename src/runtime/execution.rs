use std::collections::HashMap;

use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// Variable bindings active during evaluation. Also the shape of an
/// instance's field table.
pub type Closure = HashMap<String, Value>;

/// Non-local exits from node evaluation: a genuine failure, or the `return`
/// transfer unwinding to the enclosing method body.
#[derive(Debug)]
pub enum Interrupt {
    /// Raised by `return`. Caught only by a method body; reaching the host
    /// means the program returned outside of any method.
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

pub type ExecResult = Result<Value, Interrupt>;

/// A node of the syntax tree: anything evaluatable against a variable scope
/// and a host context.
pub trait Executable {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult;
}
