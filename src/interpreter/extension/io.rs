use std::time::{SystemTime, UNIX_EPOCH};

use crate::interpreter::{extension::registry::Extension, value::core::Value};

/// Input, output and clock extensions. None of them can be memoized.
///
/// - `read()` returns the next line of input, with its newline, or `""` at
///   the end of input.
/// - `eof()` tells whether a `read` reached the end of input, and resets the
///   flag.
/// - `flush()` flushes the output.
/// - `time()` returns the seconds since the Unix epoch as a float.
#[must_use]
pub fn extensions() -> Vec<Extension> {
    vec![Extension::new("read", 0, Some(0), Vec::new(), |state, _, _| {
             state.flush_output()?;
             let (line, _) = state.read_line()?;
             Ok(Value::from(line))
         }).no_cache(),
         Extension::new("eof", 0, Some(0), Vec::new(), |state, _, _| {
             Ok(Value::Boolean(state.take_eof()))
         }).no_cache(),
         Extension::new("flush", 0, Some(0), Vec::new(), |state, _, _| {
             state.flush_output()?;
             Ok(Value::Null)
         }).no_cache(),
         Extension::new("time", 0, Some(0), Vec::new(), |_, _, _| {
             let now = SystemTime::now().duration_since(UNIX_EPOCH)
                                        .map_or(0.0, |d| d.as_secs_f64());
             Ok(Value::Float(now))
         }).no_cache(),]
}
