use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, State},
        value::{core::Value, hash_key::HashKey},
    },
};

impl State {
    pub(super) fn eval_index(&mut self, left: &Node, index: &Node) -> EvalResult<Value> {
        let left = self.eval(left)?;
        let index = self.eval(index)?;
        Ok(Self::index_value(&left, &index)?)
    }

    /// Returns `container[index]`.
    ///
    /// Arrays and strings take an integer index; a negative or too large
    /// index gives `nil`. Strings are indexed by character. A missing map
    /// key also gives `nil`.
    ///
    /// # Errors
    /// - `UnsupportedOperation` for a non-integer array or string index.
    /// - `NotHashable` for a map key that cannot be hashed.
    /// - `IndexNotSupported` for values that cannot be indexed.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let s = Value::from("héllo");
    /// assert_eq!(State::index_value(&s, &Value::from(1)).unwrap(), Value::from("é"));
    /// assert_eq!(State::index_value(&s, &Value::from(9)).unwrap(), Value::Null);
    /// assert!(State::index_value(&Value::from(1), &Value::from(0)).is_err());
    /// ```
    pub fn index_value(container: &Value, index: &Value) -> Result<Value, RuntimeError> {
        match (container, index) {
            (Value::Array(arr), Value::Integer(i)) => {
                Ok(usize::try_from(*i).ok()
                                      .and_then(|i| arr.get(i))
                                      .cloned()
                                      .unwrap_or(Value::Null))
            },
            (Value::Str(s), Value::Integer(i)) => {
                Ok(usize::try_from(*i).ok()
                                      .and_then(|i| s.chars().nth(i))
                                      .map_or(Value::Null, |c| Value::from(c.to_string())))
            },
            (Value::Map(map), key) => {
                Ok(map.get(&HashKey::try_from(key)?)
                      .cloned()
                      .unwrap_or(Value::Null))
            },
            (Value::Array(_) | Value::Str(_), _) => {
                Err(RuntimeError::UnsupportedOperation { op:    "[]".to_string(),
                                                         left:  container.type_name(),
                                                         right: index.type_name(), })
            },
            _ => Err(RuntimeError::IndexNotSupported { kind: container.type_name() }),
        }
    }
}
