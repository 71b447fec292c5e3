/// Calls of user functions and extensions.
///
/// Evaluates arguments, checks arity, binds parameters in a fresh scope and
/// keeps the call stack and memoization cache up to date.
pub mod core;
/// Builtins that have their own token.
///
/// `len`, `first`, `rest`, the printing family, `log`, `error`, `quote` and
/// `unquote`.
pub mod builtin;
