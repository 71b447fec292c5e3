/// Hashable projection of values.
///
/// Defines `HashKey`, the form a value takes when it is used as a map key or
/// as part of a memoization key. Only scalars and small collections of
/// hashable values have one.
pub mod hash_key;
/// Callable and code values.
///
/// Defines user functions with their captured environment, macros and the
/// error value that carries a call stack.
pub mod function;

pub mod core;
