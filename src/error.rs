/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include unexpected tokens, missing prefix handlers,
/// malformed literals and unterminated strings or comments.
pub mod parse_error;
/// Registry errors.
///
/// Errors raised while populating the extension registry, such as registering
/// the same name twice or declaring an inconsistent arity.
pub mod registry_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include unknown identifiers, type mismatches, arity
/// mismatches, cancellation and resource exhaustion.
pub mod runtime_error;

pub use parse_error::{ParseError, ParseErrors};
pub use registry_error::RegistryError;
pub use runtime_error::RuntimeError;
