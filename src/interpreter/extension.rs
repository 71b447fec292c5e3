/// Input, output and clock extensions.
///
/// These depend on the outside world, so they are all marked as not
/// memoizable.
pub mod io;
/// Math extensions.
///
/// Float functions such as `sin`, `sqrt` or `pow`, generated from the
/// standard library float methods.
pub mod math;
/// The extension table.
///
/// Declares `Extension` (name, arity, argument types, callback and cache
/// policy) and the `Registry` every evaluation state reads its native
/// functions from.
pub mod registry;
