//! Polymorphic equality and ordering.
//!
//! `equal` and `less` are the two primitives: class instances may override
//! them through `__eq__`/`__lt__`, primitives compare by payload. The
//! remaining predicates are derived by negation, so they consult the
//! user-defined operators only through the primitive they negate.

use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::execution::Interrupt;
use crate::runtime::value::{Object, Value};

const EQ_METHOD: &str = "__eq__";
const LT_METHOD: &str = "__lt__";

/// Signature shared by all comparison predicates, so a parsed comparison
/// node can hold any of them.
pub type Comparator = fn(&Value, &Value, &mut dyn Context) -> Result<bool, Interrupt>;

pub fn equal(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, Interrupt> {
    if lhs
        .as_instance()
        .is_some_and(|instance| instance.has_method(EQ_METHOD, 1))
    {
        return dispatch(lhs, rhs, EQ_METHOD, context);
    }
    match (lhs.get(), rhs.get()) {
        (Some(Object::Number(l)), Some(Object::Number(r))) => Ok(l == r),
        (Some(Object::String(l)), Some(Object::String(r))) => Ok(l == r),
        (Some(Object::Bool(l)), Some(Object::Bool(r))) => Ok(l == r),
        (None, None) => Ok(true),
        _ => Err(no_comparison(lhs, rhs)),
    }
}

pub fn less(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, Interrupt> {
    if lhs
        .as_instance()
        .is_some_and(|instance| instance.has_method(LT_METHOD, 1))
    {
        return dispatch(lhs, rhs, LT_METHOD, context);
    }
    match (lhs.get(), rhs.get()) {
        (Some(Object::Number(l)), Some(Object::Number(r))) => Ok(l < r),
        (Some(Object::String(l)), Some(Object::String(r))) => Ok(l < r),
        (Some(Object::Bool(l)), Some(Object::Bool(r))) => Ok(l < r),
        _ => Err(no_comparison(lhs, rhs)),
    }
}

pub fn not_equal(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, Interrupt> {
    Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, Interrupt> {
    Ok(!less(lhs, rhs, context)? && not_equal(lhs, rhs, context)?)
}

pub fn less_or_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn Context,
) -> Result<bool, Interrupt> {
    Ok(!greater(lhs, rhs, context)?)
}

pub fn greater_or_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn Context,
) -> Result<bool, Interrupt> {
    Ok(!less(lhs, rhs, context)?)
}

fn dispatch(
    lhs: &Value,
    rhs: &Value,
    method: &'static str,
    context: &mut dyn Context,
) -> Result<bool, Interrupt> {
    let result = lhs.call_method(method, std::slice::from_ref(rhs), context)?;
    result.as_bool().ok_or_else(|| {
        Interrupt::from(RuntimeError::ComparisonNotBool {
            method,
            got: result.type_name(),
        })
    })
}

fn no_comparison(lhs: &Value, rhs: &Value) -> Interrupt {
    RuntimeError::UnsupportedComparison {
        left: lhs.type_name(),
        right: rhs.type_name(),
    }
    .into()
}
