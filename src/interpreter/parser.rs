/// Parser state, token handling and the Pratt expression loop.
///
/// Contains the `Parser` type, program-level parsing with error recovery and
/// the line-mode continuation signal.
pub mod core;

/// Prefix parsing.
///
/// Handles everything that can start an expression: literals, identifiers,
/// prefix operators, grouping, `if`, `for`, function and macro literals,
/// `return` and the builtin call forms.
pub mod unary;

/// Infix parsing.
///
/// Implements the handlers for binary operators, assignment, calls,
/// indexing, `.` access and postfix `++`/`--`.
pub mod binary;

/// Block parsing.
///
/// Parses `{ ... }` bodies shared by functions, macros, `if` and `for`.
pub mod block;

/// Utility functions for the parser.
///
/// Provides the comma separated list parsers, parameter lists and comment
/// skipping used by several grammar rules.
pub mod utils;

/// Statement parsing.
///
/// Statements are expressions optionally followed by `;`, or comments.
pub mod statement;

pub use self::core::{MAX_NESTING, ParseResult, Parser, parse_program};
