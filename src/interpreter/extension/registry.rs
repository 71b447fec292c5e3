use std::{
    any::Any,
    fmt,
    sync::{Arc, OnceLock},
};

use indexmap::IndexMap;

use crate::{
    error::{RegistryError, RuntimeError},
    interpreter::{
        evaluator::core::State,
        extension::{io, math},
        token::TokenKind,
        value::core::Value,
    },
};

/// Kind an extension argument must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// An integer.
    Integer,
    /// A float; integers are converted.
    Float,
    /// A string.
    Str,
    /// A boolean.
    Boolean,
    /// An array.
    Array,
    /// A map.
    Map,
    /// A user function.
    Func,
    /// Anything.
    Any,
}

impl ArgType {
    /// Name used in error messages, matching [`Value::type_name`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Str => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Array => "ARRAY",
            Self::Map => "MAP",
            Self::Func => "FUNC",
            Self::Any => "ANY",
        }
    }

    /// Checks `value` against this type, converting an integer where a float
    /// is expected.
    ///
    /// Returns `None` if the value does not fit.
    #[must_use]
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::Any, v)
            | (Self::Integer, v @ Value::Integer(_))
            | (Self::Float, v @ Value::Float(_))
            | (Self::Str, v @ Value::Str(_))
            | (Self::Boolean, v @ Value::Boolean(_))
            | (Self::Array, v @ Value::Array(_))
            | (Self::Map, v @ Value::Map(_))
            | (Self::Func, v @ Value::Function(_)) => Some(v.clone()),
            (Self::Float, Value::Integer(_)) => value.as_number().map(Value::Float),
            _ => None,
        }
    }
}

/// Native implementation of an extension.
///
/// Receives the evaluation state, the extension being called and the
/// arguments, already checked against the declared arity and types.
pub type Callback = fn(&mut State, &Extension, &[Value]) -> Result<Value, RuntimeError>;

/// A named native function callable from scripts.
#[derive(Clone)]
pub struct Extension {
    /// Name the extension is bound to in the root environment.
    pub name:        String,
    /// Minimum number of arguments.
    pub min_args:    usize,
    /// Maximum number of arguments, `None` for no limit.
    pub max_args:    Option<usize>,
    /// Declared type of the leading arguments; later arguments are not
    /// checked.
    pub arg_types:   Vec<ArgType>,
    /// The implementation.
    pub callback:    Callback,
    /// Output, input or time dependent: calls are never memoized, nor are the
    /// user functions that lead to them.
    pub no_cache:    bool,
    /// Data made available to the callback.
    pub client_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Extension {
    /// Creates an extension that may be memoized.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{
    ///     extension::registry::{ArgType, Extension, Registry},
    ///     value::core::Value,
    /// };
    ///
    /// let twice = Extension::new("twice", 1, Some(1), vec![ArgType::Integer], |_, _, args| {
    ///     match args {
    ///         [Value::Integer(i)] => Ok(Value::Integer(i * 2)),
    ///         _ => Ok(Value::Null),
    ///     }
    /// });
    /// let mut registry = Registry::new();
    /// registry.register(twice).unwrap();
    /// assert!(registry.get("twice").is_some());
    /// ```
    #[must_use]
    pub fn new(name: &str,
               min_args: usize,
               max_args: Option<usize>,
               arg_types: Vec<ArgType>,
               callback: Callback)
               -> Self {
        Self { name: name.to_string(),
               min_args,
               max_args,
               arg_types,
               callback,
               no_cache: false,
               client_data: None }
    }

    /// Marks the extension as not memoizable.
    #[must_use]
    pub const fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// Attaches data for the callback.
    #[must_use]
    pub fn with_client_data(mut self, data: Arc<dyn Any + Send + Sync>) -> Self {
        self.client_data = Some(data);
        self
    }

    /// Checks the arguments and converts them to the declared types.
    ///
    /// # Errors
    /// `WrongArgumentCount` or `WrongArgumentType`.
    pub fn check_args(&self, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
        let got = args.len();
        if got < self.min_args || self.max_args.is_some_and(|max| got > max) {
            return Err(RuntimeError::WrongArgumentCount { name: self.name.clone(),
                                                          got,
                                                          min: self.min_args,
                                                          max: self.max_args });
        }
        args.iter()
            .enumerate()
            .map(|(i, arg)| match self.arg_types.get(i) {
                None => Ok(arg.clone()),
                Some(ty) => {
                    ty.coerce(arg).ok_or_else(|| RuntimeError::WrongArgumentType { name:     self.name.clone(),
                                                                                   position: i + 1,
                                                                                   expected: ty.name(),
                                                                                   got:      arg.type_name(), })
                },
            })
            .collect()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut chars = self.name.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                    && TokenKind::lookup_ident(&self.name) == TokenKind::Ident;
        if !valid {
            return Err(RegistryError::InvalidName { name: self.name.clone() });
        }
        if let Some(max) = self.max_args
           && max < self.min_args
        {
            return Err(RegistryError::InvalidArity { name:    self.name.clone(),
                                                     details: format!("max {max} < min {}", self.min_args), });
        }
        if self.arg_types.len() < self.min_args {
            return Err(RegistryError::InvalidArity { name:    self.name.clone(),
                                                     details: format!("{} argument types for at least {} arguments",
                                                                      self.arg_types.len(),
                                                                      self.min_args), });
        }
        Ok(())
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
         .field("name", &self.name)
         .field("min_args", &self.min_args)
         .field("max_args", &self.max_args)
         .field("arg_types", &self.arg_types)
         .field("no_cache", &self.no_cache)
         .finish_non_exhaustive()
    }
}

/// `name(FLOAT, ..)`: the name and the declared signature.
impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.arg_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if i >= self.min_args {
                write!(f, "[{}]", ty.name())?;
            } else {
                write!(f, "{}", ty.name())?;
            }
        }
        if self.max_args.is_none() {
            if !self.arg_types.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "..")?;
        }
        write!(f, ")")
    }
}

/// Table of extensions by name, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    extensions: IndexMap<String, Arc<Extension>>,
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the math, I/O and time extensions.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for extension in math::extensions().into_iter().chain(io::extensions()) {
            if let Err(e) = registry.register(extension) {
                log::error!("{e}");
            }
        }
        registry
    }

    /// The process wide registry with the default extensions, built on first
    /// use and read-only afterwards.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::with_defaults())))
    }

    /// Adds an extension.
    ///
    /// # Errors
    /// - `AlreadyDefined` if the name is taken.
    /// - `InvalidName` if the name is not an identifier or is a keyword.
    /// - `InvalidArity` if the bounds or argument types disagree.
    pub fn register(&mut self, extension: Extension) -> Result<(), RegistryError> {
        extension.validate()?;
        if self.extensions.contains_key(&extension.name) {
            return Err(RegistryError::AlreadyDefined { name: extension.name });
        }
        log::debug!("registering extension {extension}");
        self.extensions.insert(extension.name.clone(), Arc::new(extension));
        Ok(())
    }

    /// Looks an extension up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Extension>> {
        self.extensions.get(name)
    }

    /// Extensions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Extension>> {
        self.extensions.values()
    }

    /// Number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether no extension is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}
