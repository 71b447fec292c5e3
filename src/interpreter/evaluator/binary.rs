/// Dispatch of infix operators.
pub mod core;

/// Integer and float arithmetic and comparisons.
///
/// Integers wrap on overflow. Mixing an integer with a float widens the
/// integer.
pub mod scalar;

/// Short-circuit `&&` and `||`.
pub mod logic;

/// `+` on strings, arrays and maps.
pub mod collection;

/// `=` and `:=` on names and index expressions.
pub mod assign;
