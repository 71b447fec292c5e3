use std::{
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    ast::{FunctionLiteral, MacroLiteral, Node},
    error::RuntimeError,
    interpreter::environment::Env,
};

static NEXT_FUNCTION_ID: AtomicU64 = AtomicU64::new(1);

/// A user function: its literal, the environment it was created in and the
/// name it is known by.
pub struct Function {
    /// The parsed literal.
    pub literal: Rc<FunctionLiteral>,
    /// The captured environment.
    pub env:     Env,
    /// Name from the literal, or adopted from the first assignment.
    pub name:    Option<Rc<str>>,
    /// Identity used by the memoization cache.
    pub id:      u64,
}

impl Function {
    /// Creates a closure over `env` with a fresh identity.
    #[must_use]
    pub fn new(literal: Rc<FunctionLiteral>, env: Env) -> Self {
        let name = literal.name.as_ref().map(|token| token.literal_rc());
        Self { literal,
               env,
               name,
               id: NEXT_FUNCTION_ID.fetch_add(1, Ordering::Relaxed) }
    }

    /// The same closure known by `name`. The identity is kept, so cached
    /// results stay valid.
    #[must_use]
    pub fn with_name(&self, name: Rc<str>) -> Self {
        Self { literal: Rc::clone(&self.literal),
               env:     Rc::clone(&self.env),
               name:    Some(name),
               id:      self.id, }
    }

    /// Name used in error messages and stack traces.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("func")
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
         .field("name", &self.name)
         .field("id", &self.id)
         .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Node::Function(Rc::clone(&self.literal)))
    }
}

/// A macro bound in the macro environment.
pub struct MacroValue {
    /// The parsed literal.
    pub literal: Rc<MacroLiteral>,
    /// The environment the macro was defined in.
    pub env:     Env,
}

impl fmt::Debug for MacroValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroValue")
         .field("parameters", &self.literal.parameters)
         .finish_non_exhaustive()
    }
}

impl fmt::Display for MacroValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Node::Macro(Rc::clone(&self.literal)))
    }
}

/// Most stack entries kept in an error; the middle of deeper stacks is
/// elided.
pub const MAX_STACK: usize = 10;

/// A runtime error together with the names of the functions it crossed,
/// innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    /// What went wrong.
    pub error:          RuntimeError,
    /// Function names, innermost first.
    pub stack:          Vec<Rc<str>>,
    /// Whether the stack has been recorded.
    pub stack_captured: bool,
}

impl ErrorValue {
    /// Wraps an error with no stack yet.
    #[must_use]
    pub const fn new(error: RuntimeError) -> Self {
        Self { error,
               stack: Vec::new(),
               stack_captured: false }
    }

    /// Records `stack` unless a stack was already recorded closer to where
    /// the error happened.
    pub fn capture_stack(&mut self, stack: Vec<Rc<str>>) {
        if self.stack_captured {
            return;
        }
        self.stack = limit_stack(stack, MAX_STACK);
        self.stack_captured = true;
    }
}

/// Keeps the first and last `limit / 2` entries of a long stack.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use grol::interpreter::value::function::limit_stack;
///
/// let stack: Vec<Rc<str>> = (0..12).map(|i| Rc::from(format!("f{i}"))).collect();
/// let limited = limit_stack(stack, 4);
/// let names: Vec<&str> = limited.iter().map(|s| &**s).collect();
/// assert_eq!(names, ["f0", "f1", "... 8 more ...", "f10", "f11"]);
/// ```
#[must_use]
pub fn limit_stack(stack: Vec<Rc<str>>, limit: usize) -> Vec<Rc<str>> {
    if stack.len() <= limit {
        return stack;
    }
    let half = limit / 2;
    let mut limited = Vec::with_capacity(limit + 1);
    limited.extend_from_slice(&stack[..half]);
    limited.push(Rc::from(format!("... {} more ...", stack.len() - half * 2)));
    limited.extend_from_slice(&stack[stack.len() - half..]);
    limited
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stack.as_slice() {
            [] => write!(f, "<err: {}>", self.error),
            [name] => write!(f, "<err: {} in {name}>", self.error),
            names => {
                write!(f, "<err: {}, stack below:>", self.error)?;
                for name in names {
                    write!(f, "\n{name}")?;
                }
                Ok(())
            },
        }
    }
}

impl std::error::Error for ErrorValue {}
