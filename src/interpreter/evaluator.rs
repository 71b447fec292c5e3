/// Infix operator evaluation.
///
/// Handles arithmetic on integers and floats, comparisons, short-circuit
/// logic, string, array and map concatenation, and assignment.
pub mod binary;

/// Prefix operators and increments.
///
/// Implements `!`, unary `-` and `+`, and the prefix and postfix `++` and
/// `--` forms.
pub mod unary;

/// Core evaluation logic and state management.
///
/// Contains the evaluation state, the dispatch over every node kind, the
/// `Unwind` signal used for `return`, `break`, `continue` and errors, and the
/// output and input the builtins use.
pub mod core;

/// Evaluation of `for` loops.
pub mod for_loop;

/// Indexing of arrays, strings and maps.
pub mod index;

/// Helpers shared by the evaluation modules.
pub mod utils;

/// Function calls.
///
/// Handles user function application with argument binding, memoization and
/// call stack tracking, extension calls, and the builtins that have their own
/// token.
pub mod function;

/// Memoization of user function results.
pub mod memo;

/// The call stack of user functions in progress.
pub mod stack;

/// `quote` and `unquote`.
///
/// Turns code into values and values back into code.
pub mod quote;

/// Macro definition and expansion, run on a program before it is evaluated.
pub mod macro_expansion;
