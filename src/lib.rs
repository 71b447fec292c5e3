//! # grol
//!
//! grol is an interpreter for a small dynamic expression language.
//! It has integers, floats, strings, arrays, ordered maps, first-class
//! functions with closures, macros built on `quote` and `unquote`, and
//! transparent memoization of function results.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{evaluator::core::State, value::core::Value};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum that represents programs as a tree
/// of expressions. The tree is built by the parser, rewritten by macro
/// expansion and walked by the evaluator.
///
/// # Responsibilities
/// - Defines one node kind per language construct, each holding the token
///   that introduced it.
/// - Rewrites trees structurally for `quote` and macros.
/// - Prints trees back to source, compact or indented.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// registry setup or evaluation, with their messages and categories.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches line numbers to syntax errors.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, macro expansion, evaluation,
/// value representations and extensions to provide a complete runtime.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator and values.
/// - Provides entry points for parsing and evaluating code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Drivers for whole sources, files and line by line input.
///
/// Used by the command line and by tests to run programs with formatting,
/// depth and time options.
pub mod runner;
/// General utilities for numbers, strings and allocation.
///
/// This module provides helpers used throughout the interpreter: numeric
/// literal parsing, float formatting, string quoting and checked
/// collection allocation.
pub mod util;

/// Evaluates a program in a fresh state and returns its value.
///
/// Output of `print` and friends goes to standard output.
///
/// # Errors
/// Returns the parse errors, or the runtime error with its call stack.
///
/// # Examples
/// ```
/// use grol::{eval_string, interpreter::value::core::Value};
///
/// let v = eval_string("fact = func(n) { if n <= 1 { return 1 }; n * fact(n - 1) }; fact(5)");
/// assert_eq!(v.unwrap(), Value::Integer(120));
///
/// // 'x' is not defined
/// let err = eval_string("y = x + 1").unwrap_err();
/// assert_eq!(err.to_string(), "<err: identifier not found: x>");
/// ```
pub fn eval_string(source: &str) -> Result<Value, Box<dyn std::error::Error>> {
    State::new().eval_source(source)
}
