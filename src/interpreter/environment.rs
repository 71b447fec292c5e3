use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{error::RuntimeError, interpreter::value::core::Value};

/// Shared handle to a scope.
pub type Env = Rc<RefCell<Environment>>;

/// A lexical scope: bindings in insertion order and the enclosing scope.
///
/// Function calls get a new scope enclosing the function's captured one;
/// blocks run in the scope they appear in.
#[derive(Debug, Default)]
pub struct Environment {
    store: IndexMap<Rc<str>, Value>,
    outer: Option<Env>,
}

/// Whether `name` is a constant, i.e. matches `[A-Z][A-Z0-9_]*`.
///
/// # Example
/// ```
/// use grol::interpreter::environment::is_constant;
///
/// assert!(is_constant("PI"));
/// assert!(is_constant("MAX_2"));
/// assert!(!is_constant("Pi"));
/// assert!(!is_constant("_X"));
/// ```
#[must_use]
pub fn is_constant(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
    && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

impl Environment {
    /// Creates a scope with no enclosing scope.
    #[must_use]
    pub fn new_root() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates a scope nested in `outer`.
    #[must_use]
    pub fn enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self { store: IndexMap::new(),
                                    outer: Some(Rc::clone(outer)), }))
    }

    /// Looks `name` up in this scope and then outward.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Whether `name` is bound in this scope itself.
    #[must_use]
    pub fn has_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Binds `name` in this scope without any check.
    ///
    /// Used for parameters, `self` and the variadic `..`.
    pub fn define(&mut self, name: Rc<str>, value: Value) {
        self.store.insert(name, value);
    }

    /// Binds `name` in this scope.
    ///
    /// A constant that is already visible can only be bound again to an equal
    /// value.
    ///
    /// # Errors
    /// `ConstantReassignment` when a constant would change.
    pub fn set(&mut self, name: Rc<str>, value: Value) -> Result<(), RuntimeError> {
        if is_constant(&name)
           && let Some(old) = self.get(&name)
           && old != value
        {
            return Err(RuntimeError::ConstantReassignment { name: name.to_string(),
                                                            from: old.to_string(),
                                                            to:   value.to_string(), });
        }
        self.store.insert(name, value);
        Ok(())
    }

    /// Number of bindings in this scope only.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether this scope has no bindings of its own.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Bindings of this scope only, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.store.iter()
    }
}
