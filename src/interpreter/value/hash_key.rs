use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    rc::Rc,
};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::{error::RuntimeError, interpreter::value::core::Value};

/// Arrays and maps up to this many elements can be hashed.
pub const MAX_SMALL_ARRAY: usize = 8;

/// Enum representing values usable as map keys and memoization keys.
///
/// Floats are wrapped in `OrderedFloat` so they can be hashed. Maps compare
/// and hash independently of their insertion order.
#[derive(Clone, Debug)]
pub enum HashKey {
    /// An integer such as `-4` or `42`.
    Integer(i64),
    /// A float such as `3.141592653589793`.
    Float(OrderedFloat<f64>),
    /// A boolean such as `true`.
    Boolean(bool),
    /// A string such as `"abc"`.
    Str(Rc<str>),
    /// A small array such as `[1, 2, 2]`.
    Array(Vec<HashKey>),
    /// A small map such as `{"a": 1}`.
    Map(Vec<(HashKey, HashKey)>),
}

impl TryFrom<&Value> for HashKey {
    type Error = RuntimeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        let not_hashable = || RuntimeError::NotHashable { kind: v.type_name() };
        match v {
            Value::Integer(i) => Ok(Self::Integer(*i)),
            Value::Float(f) => Ok(Self::Float(OrderedFloat(*f))),
            Value::Boolean(b) => Ok(Self::Boolean(*b)),
            Value::Str(s) => Ok(Self::Str(Rc::clone(s))),
            Value::Array(arr) if arr.len() <= MAX_SMALL_ARRAY => {
                arr.iter()
                   .map(Self::try_from)
                   .collect::<Result<Vec<_>, _>>()
                   .map(Self::Array)
                   .map_err(|_| not_hashable())
            },
            Value::Map(map) if map.len() <= MAX_SMALL_ARRAY => {
                map.iter()
                   .map(|(key, value)| Ok((key.clone(), Self::try_from(value)?)))
                   .collect::<Result<Vec<_>, RuntimeError>>()
                   .map(Self::Map)
                   .map_err(|_| not_hashable())
            },
            _ => Err(not_hashable()),
        }
    }
}

impl From<HashKey> for Value {
    fn from(key: HashKey) -> Self {
        match key {
            HashKey::Integer(i) => Self::Integer(i),
            HashKey::Float(f) => Self::Float(f.into_inner()),
            HashKey::Boolean(b) => Self::Boolean(b),
            HashKey::Str(s) => Self::Str(s),
            HashKey::Array(arr) => Self::Array(Rc::new(arr.into_iter().map(Self::from).collect())),
            HashKey::Map(pairs) => {
                let map: IndexMap<HashKey, Self> =
                    pairs.into_iter().map(|(key, value)| (key, Self::from(value))).collect();
                Self::Map(Rc::new(map))
            },
        }
    }
}

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len() && a.iter().all(|pair| b.contains(pair))
            },
            _ => false,
        }
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Integer(i) => {
                state.write_u8(0);
                i.hash(state);
            },
            Self::Float(f) => {
                state.write_u8(1);
                f.hash(state);
            },
            Self::Boolean(b) => {
                state.write_u8(2);
                b.hash(state);
            },
            Self::Str(s) => {
                state.write_u8(3);
                s.hash(state);
            },
            Self::Array(arr) => {
                state.write_u8(4);
                arr.hash(state);
            },
            Self::Map(pairs) => {
                state.write_u8(5);
                let combined = pairs.iter()
                                    .map(|pair| {
                                        let mut hasher = DefaultHasher::new();
                                        pair.hash(&mut hasher);
                                        hasher.finish()
                                    })
                                    .fold(0u64, u64::wrapping_add);
                combined.hash(state);
            },
        }
    }
}

impl std::fmt::Display for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value: Value = self.clone().into();
        write!(f, "{value}")
    }
}
