//! Runtime object model.
//!
//! This module contains the dynamically-typed value universe the evaluator
//! runs against: the shared value handle, primitive objects, classes with
//! method tables and single inheritance, polymorphic comparisons, and the
//! host context that supplies the output sink.
pub mod class;
pub mod compare;
pub mod context;
pub mod error;
pub mod execution;
pub mod value;

pub use class::{Class, ClassInstance, Method};
pub use context::{BufferedContext, Context, StandardContext};
pub use error::RuntimeError;
pub use execution::{Closure, ExecResult, Executable, Interrupt};
pub use value::{Object, Value};
