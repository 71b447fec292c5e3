use std::collections::HashMap;

use crate::interpreter::value::{core::Value, hash_key::HashKey};

/// Calls with more arguments than this are never memoized.
pub const MAX_ARGS: usize = 4;

/// A function identity and its arguments; unused slots are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    function: u64,
    args:     [Option<HashKey>; MAX_ARGS],
}

impl CacheKey {
    fn new(function: u64, args: &[Value]) -> Option<Self> {
        if args.len() > MAX_ARGS {
            return None;
        }
        let mut key = Self { function,
                             args: Default::default() };
        for (slot, arg) in key.args.iter_mut().zip(args) {
            *slot = Some(HashKey::try_from(arg).ok()?);
        }
        Some(key)
    }
}

/// Results of earlier calls of user functions.
///
/// A call can only be looked up or stored when it has at most [`MAX_ARGS`]
/// arguments, all hashable.
#[derive(Debug, Default)]
pub struct Cache {
    entries: HashMap<CacheKey, Value>,
    hits:    u64,
    misses:  u64,
}

impl Cache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored result of calling `function` with `args`.
    pub fn get(&mut self, function: u64, args: &[Value]) -> Option<Value> {
        let key = CacheKey::new(function, args)?;
        let found = self.entries.get(&key).cloned();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Stores a result. Calls that cannot be keyed are ignored.
    pub fn insert(&mut self, function: u64, args: &[Value], result: Value) {
        if let Some(key) = CacheKey::new(function, args) {
            self.entries.insert(key, result);
        }
    }

    /// Number of stored results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups that found a result.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that found nothing.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Drops every stored result.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
