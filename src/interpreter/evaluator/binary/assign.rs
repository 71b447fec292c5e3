use std::rc::Rc;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, State},
        value::{core::Value, hash_key::HashKey},
    },
};

impl State {
    /// Evaluates `target = value`.
    ///
    /// The value is evaluated first. A name is bound in the current scope; an
    /// unnamed function assigned to a name takes that name. For `a[i] = v`
    /// the updated collection is stored back into `a`, so other holders of
    /// the old collection do not see the change.
    ///
    /// # Returns
    /// The assigned value.
    pub(super) fn eval_assign(&mut self, target: &Node, value: &Node) -> EvalResult<Value> {
        let value = self.eval(value)?;
        self.assign(target, value)
    }

    fn assign(&mut self, target: &Node, value: Value) -> EvalResult<Value> {
        match target {
            Node::Identifier { token } => {
                let value = Self::adopt_name(token.literal_rc(), value);
                self.env.borrow_mut().set(token.literal_rc(), value.clone())?;
                Ok(value)
            },
            Node::Index { left, index, .. } => {
                let container = self.eval(left)?;
                let key = self.eval(index)?;
                let updated = Self::set_element(&container, &key, value.clone())?;
                self.assign(left, updated)?;
                Ok(value)
            },
            other => Err(RuntimeError::NotAssignable { target: other.to_string() }.into()),
        }
    }

    fn adopt_name(name: Rc<str>, value: Value) -> Value {
        match &value {
            Value::Function(function) if function.name.is_none() => {
                Value::Function(Rc::new(function.with_name(name)))
            },
            _ => value,
        }
    }

    /// Returns a copy of `container` with `key` set to `value`.
    ///
    /// # Errors
    /// - `IndexOutOfBounds` for an array index outside the array.
    /// - `NotHashable` for a map key that cannot be hashed.
    /// - `IndexNotSupported` for anything but arrays and maps.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let arr = Value::from(vec![Value::from(1), Value::from(2)]);
    /// let updated = State::set_element(&arr, &Value::from(1), Value::from("x")).unwrap();
    /// assert_eq!(updated.to_string(), r#"[1,"x"]"#);
    /// assert_eq!(arr.to_string(), "[1,2]");
    ///
    /// assert!(State::set_element(&arr, &Value::from(2), Value::Null).is_err());
    /// ```
    pub fn set_element(container: &Value, key: &Value, value: Value) -> Result<Value, RuntimeError> {
        match (container, key) {
            (Value::Array(arr), Value::Integer(i)) => {
                let slot = usize::try_from(*i).ok()
                                              .filter(|slot| *slot < arr.len())
                                              .ok_or(RuntimeError::IndexOutOfBounds { index: *i,
                                                                                      len:   arr.len(), })?;
                let mut elements = Vec::clone(arr);
                elements[slot] = value;
                Ok(Value::from(elements))
            },
            (Value::Map(map), key) => {
                let mut map = Rc::clone(map);
                Rc::make_mut(&mut map).insert(HashKey::try_from(key)?, value);
                Ok(Value::Map(map))
            },
            (Value::Array(_), key) => {
                Err(RuntimeError::UnsupportedOperation { op:    "[]=".to_string(),
                                                         left:  container.type_name(),
                                                         right: key.type_name(), })
            },
            _ => Err(RuntimeError::IndexNotSupported { kind: container.type_name() }),
        }
    }
}
