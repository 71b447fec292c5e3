use crate::{error::RuntimeError, interpreter::value::core::Value};

/// Returns the boolean of an `if` or `for` condition.
///
/// # Errors
/// `ConditionNotBoolean` for any other value; there is no truthiness.
///
/// # Example
/// ```
/// use grol::interpreter::{evaluator::utils::expect_bool, value::core::Value};
///
/// assert_eq!(expect_bool(&Value::Boolean(true)), Ok(true));
/// assert!(expect_bool(&Value::Integer(1)).is_err());
/// ```
pub fn expect_bool(value: &Value) -> Result<bool, RuntimeError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(RuntimeError::ConditionNotBoolean { value: other.to_string() }),
    }
}

/// Joins values the way `print` writes them, separated by spaces.
///
/// # Example
/// ```
/// use grol::interpreter::{evaluator::utils::join_print, value::core::Value};
///
/// let values = [Value::from("a"), Value::from(1), Value::from(vec![Value::from("b")])];
/// assert_eq!(join_print(&values), r#"a 1 ["b"]"#);
/// ```
#[must_use]
pub fn join_print(values: &[Value]) -> String {
    values.iter()
          .map(Value::to_print_string)
          .collect::<Vec<_>>()
          .join(" ")
}
