use std::rc::Rc;

use crate::{error::RuntimeError, interpreter::evaluator::core::State};

/// One user function call in progress.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Name of the function, `None` for anonymous ones.
    pub name:      Option<Rc<str>>,
    /// Cleared when the call reached a non memoizable extension or builtin.
    pub cacheable: bool,
}

/// The user function calls in progress, outermost first.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    /// Number of calls in progress.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enters a call.
    pub fn push(&mut self, name: Option<Rc<str>>) {
        self.frames.push(Frame { name,
                                 cacheable: true });
    }

    /// Leaves the innermost call, returning its frame.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Prevents every call in progress from being memoized.
    pub fn mark_uncacheable(&mut self) {
        for frame in &mut self.frames {
            frame.cacheable = false;
        }
    }

    /// Names of the named calls in progress, innermost first.
    #[must_use]
    pub fn names(&self) -> Vec<Rc<str>> {
        self.frames.iter().rev().filter_map(|frame| frame.name.clone()).collect()
    }
}

impl State {
    /// Enters a user function call.
    ///
    /// # Errors
    /// `MaxDepthExceeded` when the call would nest deeper than the configured
    /// maximum.
    pub(super) fn push_frame(&mut self, name: Option<Rc<str>>) -> Result<(), RuntimeError> {
        if self.stack.depth() >= self.max_depth {
            return Err(RuntimeError::MaxDepthExceeded { depth: self.max_depth });
        }
        self.stack.push(name);
        Ok(())
    }

    /// Names of the named calls in progress, innermost first.
    #[must_use]
    pub fn stack_names(&self) -> Vec<Rc<str>> {
        self.stack.names()
    }

    /// Current call depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }
}
