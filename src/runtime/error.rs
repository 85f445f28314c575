use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined name '{name}'")]
    UndefinedName { name: String },
    #[error("Values of type {type_name} have no fields or methods")]
    NotAnInstance { type_name: &'static str },
    #[error("Class '{class}' has no method '{method}' taking {arity} arguments")]
    UnknownMethod {
        class: String,
        method: String,
        arity: usize,
    },
    #[error("Class definition does not hold a class, got {type_name}")]
    NotAClass { type_name: &'static str },
    #[error("Cannot {operation} values of type {left} and {right}")]
    InvalidOperands {
        operation: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("No comparison implementation for values of type {left} and {right}")]
    UnsupportedComparison {
        left: &'static str,
        right: &'static str,
    },
    #[error("Method '{method}' must produce a Bool, got {got}")]
    ComparisonNotBool {
        method: &'static str,
        got: &'static str,
    },
    #[error("Expected a value, found None")]
    ExpectedValue,
    #[error("Failed to write program output: {message}")]
    OutputWrite { message: String },
    #[error("Return outside of a method body")]
    ReturnOutsideMethod,
}
