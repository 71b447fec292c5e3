use std::{fmt, rc::Rc, sync::Arc};

use indexmap::IndexMap;

use crate::{
    ast::Node,
    interpreter::{
        extension::registry::Extension,
        value::{
            function::{ErrorValue, Function, MacroValue},
            hash_key::HashKey,
        },
    },
    util::{num::format_float, text::quote},
};

/// Insertion ordered map used for map values.
pub type ValueMap = IndexMap<HashKey, Value>;

/// A runtime value.
///
/// Collections are reference counted and never modified in place once
/// shared: operations that change them produce a new value.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// An immutable string.
    Str(Rc<str>),
    /// The absence of a value, printed `nil`.
    Null,
    /// An error with the call stack it crossed.
    Error(Rc<ErrorValue>),
    /// An ordered list of values.
    Array(Rc<Vec<Self>>),
    /// A map from hashable keys to values, in insertion order.
    Map(Rc<ValueMap>),
    /// A user function and the environment it closes over.
    Function(Rc<Function>),
    /// A native function from the extension registry.
    Extension(Arc<Extension>),
    /// A macro, only found in the macro environment.
    Macro(Rc<MacroValue>),
    /// Unevaluated code produced by `quote`.
    Quote(Rc<Node>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(v))
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Self::Map(Rc::new(v))
    }
}

impl Value {
    /// Name of the kind of this value, as used in error messages.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::from(1.5).type_name(), "FLOAT");
    /// assert_eq!(Value::Null.type_name(), "NIL");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Str(_) => "STRING",
            Self::Null => "NIL",
            Self::Error(_) => "ERROR",
            Self::Array(_) => "ARRAY",
            Self::Map(_) => "MAP",
            Self::Function(_) => "FUNC",
            Self::Extension(_) => "EXTENSION",
            Self::Macro(_) => "MACRO",
            Self::Quote(_) => "QUOTE",
        }
    }

    /// Whether the value can be a map key or part of a memoization key.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::value::core::Value;
    ///
    /// assert!(Value::from(vec![Value::from(1), Value::from("a")]).is_hashable());
    /// assert!(!Value::Null.is_hashable());
    /// assert!(!Value::from(vec![Value::from(1); 9]).is_hashable());
    /// ```
    #[must_use]
    pub fn is_hashable(&self) -> bool {
        HashKey::try_from(self).is_ok()
    }

    /// Returns the number if the value is an integer or a float.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(crate::util::num::int_to_float(*i)),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text written by `print` and friends: strings without quotes,
    /// everything else as inspected.
    #[must_use]
    pub fn to_print_string(&self) -> String {
        match self {
            Self::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(_), Self::Float(_)) | (Self::Float(_), Self::Integer(_)) => {
                self.as_number() == other.as_number()
            },
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Error(a), Self::Error(b)) => a.error == b.error,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.id == b.id,
            (Self::Extension(a), Self::Extension(b)) => a.name == b.name,
            (Self::Macro(a), Self::Macro(b)) => Rc::ptr_eq(a, b),
            (Self::Quote(a), Self::Quote(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", format_float(*x)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{}", quote(s)),
            Self::Null => write!(f, "nil"),
            Self::Error(e) => write!(f, "{e}"),
            Self::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            },
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                write!(f, "}}")
            },
            Self::Function(function) => write!(f, "{function}"),
            Self::Extension(extension) => write!(f, "{extension}"),
            Self::Macro(m) => write!(f, "{m}"),
            Self::Quote(node) => write!(f, "quote({node})"),
        }
    }
}
