use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::State,
        value::core::{Value, ValueMap},
    },
    util::alloc::concat,
};

impl State {
    pub(super) fn concat_str(a: &str, b: &str) -> Result<Value, RuntimeError> {
        let mut s = String::new();
        s.try_reserve(a.len() + b.len())
         .map_err(|_| RuntimeError::AllocationFailed { requested: a.len() + b.len() })?;
        s.push_str(a);
        s.push_str(b);
        Ok(Value::from(s))
    }

    /// `array + array` concatenates, `array + x` appends `x`.
    pub(super) fn concat_array(a: &[Value], right: &Value) -> Result<Value, RuntimeError> {
        let joined = match right {
            Value::Array(b) => concat(a, b)?,
            other => concat(a, std::slice::from_ref(other))?,
        };
        Ok(Value::from(joined))
    }

    /// Keys of `b` override those of `a`; new keys are added at the end.
    pub(super) fn merge_maps(a: &Rc<ValueMap>, b: &ValueMap) -> Value {
        let mut merged = ValueMap::clone(a);
        merged.extend(b.iter().map(|(key, value)| (key.clone(), value.clone())));
        Value::from(merged)
    }
}
