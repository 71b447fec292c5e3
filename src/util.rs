/// Checked allocation of collections.
///
/// Collections built from script values go through these helpers so that a
/// request that cannot be satisfied becomes a resource error instead of an
/// abort.
pub mod alloc;
/// Numeric literal parsing and number formatting.
///
/// This module converts the integer and float literals accepted by the lexer
/// (with underscores, hex and binary prefixes) into values, and formats floats
/// so that the printed text lexes back as a float.
pub mod num;
/// String quoting.
///
/// Produces double quoted string literals, escaping exactly what the lexer
/// unescapes, so printed strings read back unchanged.
pub mod text;
