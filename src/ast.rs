//! Syntax tree nodes and their evaluation.
//!
//! Each node kind is a struct implementing [`Executable`]; the parser builds
//! trees out of them and the host drives the root. Evaluation is a plain
//! tree walk: every node produces a [`Value`], statements producing nothing
//! interesting return the null handle.

use std::io::Write;
use std::rc::Rc;

use crate::runtime::class::{Class, ClassInstance};
use crate::runtime::compare::Comparator;
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::execution::{Closure, ExecResult, Executable, Interrupt};
use crate::runtime::value::Value;

const ADD_METHOD: &str = "__add__";
const INIT_METHOD: &str = "__init__";

/// A literal value baked into the tree.
pub struct Constant {
    value: Value,
}

impl Constant {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn number(value: i32) -> Self {
        Self::new(Value::number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Value::string(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(Value::boolean(value))
    }

    pub fn none() -> Self {
        Self::new(Value::none())
    }
}

impl Executable for Constant {
    fn execute(&self, _closure: &mut Closure, _context: &mut dyn Context) -> ExecResult {
        Ok(self.value.clone())
    }
}

/// A variable reference: either a plain name or a dotted field chain.
pub struct VariableValue {
    dotted_ids: Vec<String>,
}

impl VariableValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            dotted_ids: vec![name.into()],
        }
    }

    /// A chain such as `object.field.inner`.
    pub fn dotted(dotted_ids: Vec<String>) -> Self {
        Self { dotted_ids }
    }
}

impl Executable for VariableValue {
    fn execute(&self, closure: &mut Closure, _context: &mut dyn Context) -> ExecResult {
        let Some(first) = self.dotted_ids.first() else {
            return Err(RuntimeError::UndefinedName {
                name: String::new(),
            }
            .into());
        };
        let mut value = lookup(closure, first)?;
        if self.dotted_ids.len() > 1 {
            // Field resolution sees the outer scope plus the fields of every
            // instance along the chain; fields shadow on name collision. The
            // merged scope is private to this evaluation.
            let mut scope = closure.clone();
            for id in &self.dotted_ids[1..] {
                let fields = match value.as_instance() {
                    Some(instance) => instance.fields().clone(),
                    None => {
                        return Err(RuntimeError::NotAnInstance {
                            type_name: value.type_name(),
                        }
                        .into());
                    }
                };
                scope.extend(fields);
                value = lookup(&scope, id)?;
            }
        }
        Ok(value)
    }
}

/// `name = rhs`: stores into the current scope, creating or overwriting.
pub struct Assignment {
    name: String,
    rhs: Box<dyn Executable>,
}

impl Assignment {
    pub fn new(name: impl Into<String>, rhs: Box<dyn Executable>) -> Self {
        Self {
            name: name.into(),
            rhs,
        }
    }
}

impl Executable for Assignment {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let value = self.rhs.execute(closure, context)?;
        closure.insert(self.name.clone(), value.clone());
        Ok(value)
    }
}

/// `object.field = rhs`: writes into the instance's field table.
pub struct FieldAssignment {
    object: VariableValue,
    field_name: String,
    rhs: Box<dyn Executable>,
}

impl FieldAssignment {
    pub fn new(object: VariableValue, field_name: impl Into<String>, rhs: Box<dyn Executable>) -> Self {
        Self {
            object,
            field_name: field_name.into(),
            rhs,
        }
    }
}

impl Executable for FieldAssignment {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let object = self.object.execute(closure, context)?;
        let value = self.rhs.execute(closure, context)?;
        let instance = object
            .as_instance()
            .ok_or_else(|| RuntimeError::NotAnInstance {
                type_name: object.type_name(),
            })?;
        instance
            .fields_mut()
            .insert(self.field_name.clone(), value.clone());
        Ok(value)
    }
}

/// The `print` statement: arguments separated by single spaces, terminated
/// by a newline. The null handle prints as the literal `None`.
pub struct Print {
    args: Vec<Box<dyn Executable>>,
}

impl Print {
    pub fn new(args: Vec<Box<dyn Executable>>) -> Self {
        Self { args }
    }

    /// Shorthand printing a single variable by name.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(vec![Box::new(VariableValue::new(name))])
    }
}

impl Executable for Print {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        for (index, argument) in self.args.iter().enumerate() {
            if index > 0 {
                write_output(context, " ")?;
            }
            let value = argument.execute(closure, context)?;
            let rendered = if value.is_null() {
                "None".to_string()
            } else {
                value.to_output(context)?
            };
            write_output(context, &rendered)?;
        }
        write_output(context, "\n")?;
        Ok(Value::none())
    }
}

/// `object.method(args…)`.
pub struct MethodCall {
    object: Box<dyn Executable>,
    method: String,
    args: Vec<Box<dyn Executable>>,
}

impl MethodCall {
    pub fn new(
        object: Box<dyn Executable>,
        method: impl Into<String>,
        args: Vec<Box<dyn Executable>>,
    ) -> Self {
        Self {
            object,
            method: method.into(),
            args,
        }
    }
}

impl Executable for MethodCall {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let object = self.object.execute(closure, context)?;
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            args.push(arg.execute(closure, context)?);
        }
        object.call_method(&self.method, &args, context)
    }
}

/// `Class(args…)`: creates a fresh instance and, when the class defines an
/// `__init__` whose arity matches, evaluates the arguments left to right and
/// invokes it. Without a matching `__init__` the arguments are left
/// unevaluated and the bare instance is returned.
pub struct NewInstance {
    class: Rc<Class>,
    args: Vec<Box<dyn Executable>>,
}

impl NewInstance {
    pub fn new(class: Rc<Class>) -> Self {
        Self::with_args(class, Vec::new())
    }

    pub fn with_args(class: Rc<Class>, args: Vec<Box<dyn Executable>>) -> Self {
        Self { class, args }
    }
}

impl Executable for NewInstance {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let instance = Value::instance(ClassInstance::new(Rc::clone(&self.class)));
        let has_init = self
            .class
            .get_method(INIT_METHOD)
            .is_some_and(|method| method.formal_params.len() == self.args.len());
        if has_init {
            let mut args = Vec::with_capacity(self.args.len());
            for arg in &self.args {
                args.push(arg.execute(closure, context)?);
            }
            instance.call_method(INIT_METHOD, &args, context)?;
        }
        Ok(instance)
    }
}

/// `str(x)`: renders the argument through the printing path and wraps the
/// text in a fresh string value. The null handle stringifies to `None`.
pub struct Stringify {
    argument: Box<dyn Executable>,
}

impl Stringify {
    pub fn new(argument: Box<dyn Executable>) -> Self {
        Self { argument }
    }
}

impl Executable for Stringify {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let value = self.argument.execute(closure, context)?;
        let rendered = if value.is_null() {
            "None".to_string()
        } else {
            value.to_output(context)?
        };
        Ok(Value::string(rendered))
    }
}

/// Addition: numbers add, strings concatenate, and a class instance on the
/// left may provide `__add__`.
pub struct Add {
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl Add {
    pub fn new(lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self { lhs, rhs }
    }
}

impl Executable for Add {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        let rhs = self.rhs.execute(closure, context)?;
        if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) {
            return Ok(Value::number(l + r));
        }
        if let (Some(l), Some(r)) = (lhs.as_string(), rhs.as_string()) {
            return Ok(Value::string(format!("{l}{r}")));
        }
        if lhs
            .as_instance()
            .is_some_and(|instance| instance.has_method(ADD_METHOD, 1))
        {
            return lhs.call_method(ADD_METHOD, std::slice::from_ref(&rhs), context);
        }
        Err(invalid_operands("add", &lhs, &rhs))
    }
}

/// Subtraction over numbers.
pub struct Sub {
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl Sub {
    pub fn new(lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self { lhs, rhs }
    }
}

impl Executable for Sub {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        let rhs = self.rhs.execute(closure, context)?;
        if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) {
            return Ok(Value::number(l - r));
        }
        Err(invalid_operands("subtract", &lhs, &rhs))
    }
}

/// Multiplication over numbers.
pub struct Mult {
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl Mult {
    pub fn new(lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self { lhs, rhs }
    }
}

impl Executable for Mult {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        let rhs = self.rhs.execute(closure, context)?;
        if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number()) {
            return Ok(Value::number(l * r));
        }
        Err(invalid_operands("multiply", &lhs, &rhs))
    }
}

/// Division over numbers. A zero divisor fails the same way a type mismatch
/// does.
pub struct Div {
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl Div {
    pub fn new(lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self { lhs, rhs }
    }
}

impl Executable for Div {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        let rhs = self.rhs.execute(closure, context)?;
        if let (Some(l), Some(r)) = (lhs.as_number(), rhs.as_number())
            && r != 0
        {
            return Ok(Value::number(l / r));
        }
        Err(invalid_operands("divide", &lhs, &rhs))
    }
}

/// Short-circuit `or`: the right operand is evaluated only when the left is
/// falsy. The result is always a fresh `Bool`.
pub struct Or {
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl Or {
    pub fn new(lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self { lhs, rhs }
    }
}

impl Executable for Or {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        if lhs.is_truthy() {
            return Ok(Value::boolean(true));
        }
        let rhs = self.rhs.execute(closure, context)?;
        Ok(Value::boolean(rhs.is_truthy()))
    }
}

/// Short-circuit `and`: the right operand is evaluated only when the left is
/// truthy. The result is always a fresh `Bool`.
pub struct And {
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl And {
    pub fn new(lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self { lhs, rhs }
    }
}

impl Executable for And {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        if !lhs.is_truthy() {
            return Ok(Value::boolean(false));
        }
        let rhs = self.rhs.execute(closure, context)?;
        Ok(Value::boolean(rhs.is_truthy()))
    }
}

/// `not x`.
pub struct Not {
    argument: Box<dyn Executable>,
}

impl Not {
    pub fn new(argument: Box<dyn Executable>) -> Self {
        Self { argument }
    }
}

impl Executable for Not {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let argument = self.argument.execute(closure, context)?;
        Ok(Value::boolean(!argument.is_truthy()))
    }
}

/// A comparison applying one of the [`crate::runtime::compare`] predicates.
pub struct Comparison {
    comparator: Comparator,
    lhs: Box<dyn Executable>,
    rhs: Box<dyn Executable>,
}

impl Comparison {
    pub fn new(comparator: Comparator, lhs: Box<dyn Executable>, rhs: Box<dyn Executable>) -> Self {
        Self {
            comparator,
            lhs,
            rhs,
        }
    }
}

impl Executable for Comparison {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let lhs = self.lhs.execute(closure, context)?;
        let rhs = self.rhs.execute(closure, context)?;
        Ok(Value::boolean((self.comparator)(&lhs, &rhs, context)?))
    }
}

/// A sequence of statements executed in order; intermediate results are
/// discarded.
pub struct Compound {
    statements: Vec<Box<dyn Executable>>,
}

impl Compound {
    pub fn new(statements: Vec<Box<dyn Executable>>) -> Self {
        Self { statements }
    }

    pub fn add_statement(&mut self, statement: Box<dyn Executable>) {
        self.statements.push(statement);
    }
}

impl Executable for Compound {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        for statement in &self.statements {
            statement.execute(closure, context)?;
        }
        Ok(Value::none())
    }
}

/// `return expr` raises the non-local transfer caught by [`MethodBody`].
/// A bare `return` evaluates to `None` without leaving the body; the
/// method's null result comes from falling off the end of the body.
pub struct Return {
    expr: Option<Box<dyn Executable>>,
}

impl Return {
    pub fn new(expr: Box<dyn Executable>) -> Self {
        Self { expr: Some(expr) }
    }

    pub fn bare() -> Self {
        Self { expr: None }
    }
}

impl Executable for Return {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        match &self.expr {
            Some(expr) => {
                let value = expr.execute(closure, context)?;
                Err(Interrupt::Return(value))
            }
            None => Ok(Value::none()),
        }
    }
}

/// Publishes a pre-built class object into the current scope under the
/// class's name.
pub struct ClassDefinition {
    class: Value,
}

impl ClassDefinition {
    pub fn new(class: Value) -> Self {
        Self { class }
    }
}

impl Executable for ClassDefinition {
    fn execute(&self, closure: &mut Closure, _context: &mut dyn Context) -> ExecResult {
        let name = match self.class.as_class() {
            Some(class) => class.name().to_string(),
            None => {
                return Err(RuntimeError::NotAClass {
                    type_name: self.class.type_name(),
                }
                .into());
            }
        };
        // An existing binding under the class's name wins over redefinition.
        Ok(closure
            .entry(name)
            .or_insert_with(|| self.class.clone())
            .clone())
    }
}

/// `if`/`else`. A false condition with no else-branch evaluates to `None`.
pub struct IfElse {
    condition: Box<dyn Executable>,
    if_body: Box<dyn Executable>,
    else_body: Option<Box<dyn Executable>>,
}

impl IfElse {
    pub fn new(
        condition: Box<dyn Executable>,
        if_body: Box<dyn Executable>,
        else_body: Option<Box<dyn Executable>>,
    ) -> Self {
        Self {
            condition,
            if_body,
            else_body,
        }
    }
}

impl Executable for IfElse {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        let condition = self.condition.execute(closure, context)?;
        if condition.is_truthy() {
            self.if_body.execute(closure, context)
        } else if let Some(else_body) = &self.else_body {
            else_body.execute(closure, context)
        } else {
            Ok(Value::none())
        }
    }
}

/// The sole handler of the `return` transfer: converts it into the method's
/// result. A body that completes normally produces `None` through its last
/// statement being a [`Compound`].
pub struct MethodBody {
    body: Box<dyn Executable>,
}

impl MethodBody {
    pub fn new(body: Box<dyn Executable>) -> Self {
        Self { body }
    }
}

impl Executable for MethodBody {
    fn execute(&self, closure: &mut Closure, context: &mut dyn Context) -> ExecResult {
        match self.body.execute(closure, context) {
            Err(Interrupt::Return(value)) => Ok(value),
            other => other,
        }
    }
}

fn lookup(closure: &Closure, name: &str) -> Result<Value, RuntimeError> {
    closure
        .get(name)
        .cloned()
        .ok_or_else(|| RuntimeError::UndefinedName {
            name: name.to_string(),
        })
}

fn invalid_operands(operation: &'static str, lhs: &Value, rhs: &Value) -> Interrupt {
    RuntimeError::InvalidOperands {
        operation,
        left: lhs.type_name(),
        right: rhs.type_name(),
    }
    .into()
}

fn write_output(context: &mut dyn Context, text: &str) -> Result<(), Interrupt> {
    context
        .output()
        .write_all(text.as_bytes())
        .map_err(|error| {
            Interrupt::from(RuntimeError::OutputWrite {
                message: error.to_string(),
            })
        })
}
