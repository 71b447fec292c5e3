/// The environment module stores name bindings.
///
/// Environments are lexical scopes linked to their enclosing scope. Lookup
/// walks outward, assignment writes to the innermost scope, and names made of
/// capitals are constants that cannot be rebound to a different value.
pub mod environment;
/// The evaluator module executes the syntax tree.
///
/// The evaluator walks the tree produced by the parser, after macro
/// expansion, and computes values. It is the core execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Evaluates every node kind, with closures and lexical scoping.
/// - Propagates `return`, `break`, `continue` and errors.
/// - Memoizes results of user functions and tracks the call stack.
pub mod evaluator;
/// The extension module holds native functions callable from scripts.
///
/// Extensions are registered once in a process-wide registry with their
/// arity, argument types and cache policy, and are seeded into every root
/// environment.
pub mod extension;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of interned
/// tokens: numbers, strings, identifiers, operators, delimiters, keywords,
/// builtins and comments. This is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens.
/// - Handles numeric and string literals with their escapes.
/// - Reports unknown input as `Illegal` tokens.
pub mod lexer;
/// The parser module builds the syntax tree from tokens.
///
/// The parser is a Pratt parser: every token kind may have a prefix handler
/// and an infix handler, and operator priorities decide how far an
/// expression extends.
///
/// # Responsibilities
/// - Converts tokens into a uniform expression tree.
/// - Collects syntax errors with their line and recovers at statement
///   boundaries.
/// - Tells line-oriented drivers when a statement needs more input.
pub mod parser;
/// The token module defines token kinds and interning.
///
/// Tokens with the same kind and literal share one allocation for the whole
/// thread.
pub mod token;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values scripts manipulate: integers, floats,
/// booleans, strings, arrays, maps, functions, macros, quotes and errors,
/// together with their printed form and the hashable projection used for map
/// keys and memoization.
pub mod value;
