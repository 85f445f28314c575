//! `minipy` library crate.
//!
//! Interpreter core for a small indentation-sensitive, object-oriented
//! scripting language. High-level layout:
//! - `lexer`: source text to token stream, consumed by an external parser
//! - `runtime`: the dynamically-typed value and object model
//! - `ast`: tree nodes the parser builds, evaluated by a direct walk
//! - `interpreter`: convenience entry points for running parsed trees
pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod runtime;
