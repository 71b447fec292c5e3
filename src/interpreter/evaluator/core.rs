use std::{
    error::Error,
    io::{self, BufRead, Write},
    mem,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use indexmap::IndexMap;

use crate::{
    ast::{Block, FunctionLiteral, Node},
    error::RuntimeError,
    interpreter::{
        environment::{Env, Environment, is_constant},
        evaluator::{memo::Cache, stack::CallStack, utils::expect_bool},
        extension::registry::Registry,
        parser::parse_program,
        token::TokenKind,
        value::{
            core::{Value, ValueMap},
            function::{ErrorValue, Function, MacroValue},
            hash_key::HashKey,
        },
    },
    util::alloc::vec_with_capacity,
};

/// Result type used by the evaluator.
///
/// The error side carries everything that stops the normal flow of
/// evaluation, so `?` propagates `return`, `break` and `continue` the same
/// way as errors.
pub type EvalResult<T> = Result<T, Unwind>;

/// Function calls allowed to nest before evaluation fails.
///
/// Low enough for the default thread stack; the command line raises it and
/// evaluates on a larger stack.
pub const DEFAULT_MAX_DEPTH: usize = 250;

/// Why evaluation of a construct stopped early.
#[derive(Debug, Clone)]
pub enum Unwind {
    /// `return`, caught at the function boundary.
    Return(Value),
    /// `break`, caught by the enclosing `for`.
    Break,
    /// `continue`, caught by the enclosing `for`.
    Continue,
    /// A runtime error, surfacing at the top.
    Error(Box<ErrorValue>),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Self::Error(Box::new(ErrorValue::new(error)))
    }
}

impl Unwind {
    /// Turns `break` and `continue` that escaped every loop into errors.
    #[must_use]
    pub fn escaped(self) -> Self {
        match self {
            Self::Break => RuntimeError::ControlOutsideLoop { keyword: "break" }.into(),
            Self::Continue => RuntimeError::ControlOutsideLoop { keyword: "continue" }.into(),
            other => other,
        }
    }

    /// The outcome of a whole program: `return` gives its value, everything
    /// else is an error.
    pub fn into_result(self) -> Result<Value, ErrorValue> {
        match self.escaped() {
            Self::Return(value) => Ok(value),
            Self::Error(e) => Err(*e),
            Self::Break | Self::Continue => {
                Err(ErrorValue::new(RuntimeError::ControlOutsideLoop { keyword: "loop control" }))
            },
        }
    }
}

/// Where `print` and friends write.
pub enum Output {
    /// The process standard output.
    Stdout(io::Stdout),
    /// An in-memory buffer, see [`State::take_output`].
    Buffer(Vec<u8>),
    /// Any other writer.
    Writer(Box<dyn Write>),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::Buffer(out) => out.write(buf),
            Self::Writer(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::Buffer(out) => out.flush(),
            Self::Writer(out) => out.flush(),
        }
    }
}

/// Stores the evaluation state.
///
/// This struct holds the environments, the memoization cache, the call stack
/// and the input and output of one interpreter. Independent states share
/// nothing but the read-only extension registry.
///
/// ## Usage
///
/// A `State` is created once and reused across inputs, so that definitions
/// made by one program are visible to the next.
///
/// ```
/// use grol::interpreter::{evaluator::core::State, value::core::Value};
///
/// let mut state = State::new();
/// state.eval_source("double = func(x) { 2 * x }").unwrap();
/// assert_eq!(state.eval_source("double(21)").unwrap(), Value::Integer(42));
/// ```
pub struct State {
    pub(super) env:       Env,
    root:                 Env,
    pub(super) macros:    Env,
    registry:             Arc<Registry>,
    pub(super) cache:     Cache,
    pub(super) stack:     CallStack,
    pub(super) max_depth: usize,
    out:                  Output,
    input:                Box<dyn BufRead>,
    seen_eof:             bool,
    pub(super) no_log:    bool,
    cancel:               Arc<AtomicBool>,
    deadline:             Option<Instant>,
    seeded:               usize,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Creates a state using the global extension registry, writing to
    /// standard output and reading from standard input.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    /// Creates a state whose root environment holds the extensions of
    /// `registry`.
    #[must_use]
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        let root = Environment::new_root();
        {
            let mut scope = root.borrow_mut();
            scope.define(Rc::from("nil"), Value::Null);
            scope.define(Rc::from("null"), Value::Null);
            scope.define(Rc::from("NaN"), Value::Float(f64::NAN));
            scope.define(Rc::from("Inf"), Value::Float(f64::INFINITY));
            scope.define(Rc::from("PI"), Value::Float(std::f64::consts::PI));
            scope.define(Rc::from("E"), Value::Float(std::f64::consts::E));
            for extension in registry.iter() {
                scope.define(Rc::from(extension.name.as_str()), Value::Extension(Arc::clone(extension)));
            }
        }
        let seeded = root.borrow().len();
        Self { env: Rc::clone(&root),
               root,
               macros: Environment::new_root(),
               registry,
               cache: Cache::new(),
               stack: CallStack::default(),
               max_depth: DEFAULT_MAX_DEPTH,
               out: Output::Stdout(io::stdout()),
               input: Box::new(io::BufReader::new(io::stdin())),
               seen_eof: false,
               no_log: false,
               cancel: Arc::new(AtomicBool::new(false)),
               deadline: None,
               seeded }
    }

    /// The registry the root environment was seeded from.
    #[must_use]
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Sends output to `out`.
    pub fn set_output(&mut self, out: Output) {
        self.out = out;
    }

    /// Collects output in memory until [`State::take_output`] is called.
    pub fn capture_output(&mut self) {
        self.out = Output::Buffer(Vec::new());
    }

    /// Returns and clears the output collected since
    /// [`State::capture_output`]. Empty when output is not captured.
    pub fn take_output(&mut self) -> String {
        match &mut self.out {
            Output::Buffer(buffer) => String::from_utf8_lossy(&mem::take(buffer)).into_owned(),
            _ => String::new(),
        }
    }

    /// Reads the input of `read()` from `input`.
    pub fn set_input(&mut self, input: Box<dyn BufRead>) {
        self.input = input;
        self.seen_eof = false;
    }

    /// Sets the maximum function call depth.
    pub const fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// The maximum function call depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// When set, `log(...)` writes to the output instead of the logger.
    pub const fn set_no_log(&mut self, no_log: bool) {
        self.no_log = no_log;
    }

    /// Flag that stops evaluation when set from any thread.
    ///
    /// The flag is cleared when the running program ends, so a cancelled
    /// state can evaluate the next program.
    #[must_use]
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Stops evaluation once `deadline` has passed. The deadline applies to
    /// the next program only.
    pub const fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    /// Stops evaluation `duration` from now, for the next program only.
    pub fn set_max_duration(&mut self, duration: Duration) {
        self.deadline = Instant::now().checked_add(duration);
    }

    /// The memoization cache.
    #[must_use]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Forgets every memoized result.
    pub fn reset_cache(&mut self) {
        self.cache.clear();
    }

    /// Looks a name up in the current environment.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.env.borrow().get(name)
    }

    /// Number of bindings made by programs at the top level, not counting the
    /// seeded constants and extensions.
    #[must_use]
    pub fn globals_len(&self) -> usize {
        self.root.borrow().len().saturating_sub(self.seeded)
    }

    /// Whether programs made no top-level binding yet.
    #[must_use]
    pub fn has_no_globals(&self) -> bool {
        self.globals_len() == 0
    }

    /// Fails if evaluation was cancelled or ran past its deadline.
    pub(super) fn check_interrupt(&self) -> Result<(), RuntimeError> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(RuntimeError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(RuntimeError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Writes `text` to the output.
    pub(crate) fn write_out(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|e| RuntimeError::Io { details: e.to_string() })
    }

    /// Flushes the output.
    ///
    /// # Errors
    /// `Io` if the output cannot be flushed.
    pub fn flush_output(&mut self) -> Result<(), RuntimeError> {
        self.out.flush().map_err(|e| RuntimeError::Io { details: e.to_string() })
    }

    /// Reads one line of input, with its newline. Returns the line and
    /// whether the end of the input was reached.
    ///
    /// # Errors
    /// `Io` if reading fails.
    pub fn read_line(&mut self) -> Result<(String, bool), RuntimeError> {
        let mut line = String::new();
        let read = self.input
                       .read_line(&mut line)
                       .map_err(|e| RuntimeError::Io { details: e.to_string() })?;
        let eof = read == 0 || !line.ends_with('\n');
        if eof {
            self.seen_eof = true;
        }
        Ok((line, eof))
    }

    /// Whether a read reached the end of input since the last call.
    pub const fn take_eof(&mut self) -> bool {
        mem::replace(&mut self.seen_eof, false)
    }

    /// Parses and evaluates `source`.
    ///
    /// # Errors
    /// The parse errors, or the runtime error with its call stack.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let mut state = State::new();
    /// assert_eq!(state.eval_source("5 + 5 + 5 + 5 - 10").unwrap(), Value::Integer(10));
    ///
    /// let err = state.eval_source("1 / 0").unwrap_err();
    /// assert_eq!(err.to_string(), "<err: division by zero>");
    /// ```
    pub fn eval_source(&mut self, source: &str) -> Result<Value, Box<dyn Error>> {
        let program = parse_program(source)?;
        Ok(self.eval_program(program)?)
    }

    /// Defines the macros of `program`, expands their uses and evaluates the
    /// result.
    ///
    /// A `return` at the top level ends the program with its value.
    ///
    /// # Errors
    /// The runtime error that stopped evaluation, with its call stack.
    pub fn eval_program(&mut self, program: Node) -> Result<Value, ErrorValue> {
        let program = self.define_macros(program);
        let result = match self.expand_macros(program) {
            Ok(program) => self.eval(&program),
            Err(e) => Err(e),
        };
        self.env = Rc::clone(&self.root);
        self.cancel.store(false, Ordering::Relaxed);
        self.deadline = None;
        match result {
            Ok(value) => Ok(value),
            Err(unwind) => unwind.into_result().inspect_err(|e| log::debug!("evaluation failed: {e}")),
        }
    }

    /// Like [`State::eval_program`] with errors turned into error values.
    pub fn eval_to_value(&mut self, program: Node) -> Value {
        self.eval_program(program)
            .unwrap_or_else(|e| Value::Error(Rc::new(e)))
    }

    /// Evaluates one node in the current environment.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Value> {
        log::trace!("eval {node}");
        match node {
            Node::Integer { value, .. } => Ok(Value::Integer(*value)),
            Node::Float { value, .. } => Ok(Value::Float(*value)),
            Node::Str { token } => Ok(Value::Str(token.literal_rc())),
            Node::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Node::Identifier { token } => Ok(self.eval_identifier(token.literal())?),
            Node::Comment { .. } => Ok(Value::Null),
            Node::Array { elements, .. } => self.eval_array_literal(elements),
            Node::Map { pairs, .. } => self.eval_map_literal(pairs),
            Node::Function(literal) => self.eval_function_literal(literal),
            Node::Macro(literal) => {
                Ok(Value::Macro(Rc::new(MacroValue { literal: Rc::clone(literal),
                                                     env:     Rc::clone(&self.env), })))
            },
            Node::Prefix { token, right } => self.eval_prefix(token, right),
            Node::Infix { token, left, right } => self.eval_infix(token, left, right),
            Node::Postfix { token, operand } => self.eval_increment(token, operand, false),
            Node::Index { left, index, .. } => self.eval_index(left, index),
            Node::Call { function,
                         arguments,
                         .. } => self.eval_call(function, arguments),
            Node::Builtin { token, arguments } => self.eval_builtin(token, arguments),
            Node::If { condition,
                       consequence,
                       alternative,
                       .. } => self.eval_if(condition, consequence, alternative.as_ref()),
            Node::For { condition, body, .. } => self.eval_for(condition, body),
            Node::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => Value::Null,
                };
                Err(Unwind::Return(value))
            },
            Node::Control { token } => match token.kind() {
                TokenKind::Break => Err(Unwind::Break),
                _ => Err(Unwind::Continue),
            },
            Node::Statements(block) => self.eval_block(block),
        }
    }

    /// Evaluates the statements of a block in the current environment and
    /// returns the value of the last one. Comments do not count.
    pub(super) fn eval_block(&mut self, block: &Block) -> EvalResult<Value> {
        let mut result = Value::Null;
        for statement in block.statements.iter().filter(|s| !s.is_comment()) {
            result = self.eval(statement)?;
        }
        Ok(result)
    }

    /// Evaluates `block` in `env`, restoring the current environment after.
    pub(super) fn eval_block_in(&mut self, env: Env, block: &Block) -> EvalResult<Value> {
        let saved = mem::replace(&mut self.env, env);
        let result = self.eval_block(block);
        self.env = saved;
        result
    }

    /// Looks `name` up for a read.
    ///
    /// Inside a call, reading a variable from outside the function's own
    /// scope makes the result depend on more than the arguments, so the calls
    /// in progress are not memoized. Functions, extensions, constants and
    /// `nil` cannot change and do not count.
    pub(super) fn eval_identifier(&mut self, name: &str) -> Result<Value, RuntimeError> {
        let value = self.get(name)
                        .ok_or_else(|| RuntimeError::UnknownIdentifier { name: name.to_string() })?;
        if self.stack.depth() > 0
           && !matches!(value, Value::Function(_) | Value::Extension(_))
           && !is_constant(name)
           && !matches!(name, "nil" | "null")
           && !self.env.borrow().has_local(name)
        {
            self.stack.mark_uncacheable();
        }
        Ok(value)
    }

    fn eval_array_literal(&mut self, elements: &[Node]) -> EvalResult<Value> {
        let mut values = vec_with_capacity(elements.len())?;
        for element in elements {
            values.push(self.eval(element)?);
        }
        Ok(Value::from(values))
    }

    fn eval_map_literal(&mut self, pairs: &[(Node, Node)]) -> EvalResult<Value> {
        let mut map: ValueMap = IndexMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            let key = HashKey::try_from(&self.eval(key)?)?;
            let value = self.eval(value)?;
            map.insert(key, value);
        }
        Ok(Value::from(map))
    }

    /// Creates the closure; a named literal is also bound to its name.
    fn eval_function_literal(&mut self, literal: &Rc<FunctionLiteral>) -> EvalResult<Value> {
        let function = Value::Function(Rc::new(Function::new(Rc::clone(literal), Rc::clone(&self.env))));
        if let Some(name) = &literal.name {
            self.env.borrow_mut().set(name.literal_rc(), function.clone())?;
        }
        Ok(function)
    }

    fn eval_if(&mut self,
               condition: &Node,
               consequence: &Block,
               alternative: Option<&Block>)
               -> EvalResult<Value> {
        let value = self.eval(condition)?;
        if expect_bool(&value)? {
            self.eval_block(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative)
        } else {
            Ok(Value::Null)
        }
    }

    /// Writes every top-level binding made by programs as a `name=value`
    /// line that evaluates back to the same binding.
    ///
    /// Seeded constants, extensions, macros, quotes and errors are skipped.
    ///
    /// # Errors
    /// Any error from `out`.
    ///
    /// # Returns
    /// The number of bindings written.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::evaluator::core::State;
    ///
    /// let mut state = State::new();
    /// state.eval_source(r#"x = 3; s = "a\tb"; m = {"k": [1.5, true]}"#).unwrap();
    ///
    /// let mut out = Vec::new();
    /// assert_eq!(state.save_globals(&mut out).unwrap(), 3);
    /// assert_eq!(String::from_utf8(out).unwrap(),
    ///            "x=3\ns=\"a\\tb\"\nm={\"k\":[1.5,true]}\n");
    /// ```
    pub fn save_globals(&self, out: &mut dyn Write) -> io::Result<usize> {
        let root = self.root.borrow();
        let mut written = 0;
        for (name, value) in root.iter().skip(self.seeded) {
            if matches!(value,
                        Value::Extension(_) | Value::Macro(_) | Value::Quote(_) | Value::Error(_))
            {
                continue;
            }
            writeln!(out, "{name}={value}")?;
            written += 1;
        }
        log::debug!("saved {written} globals");
        Ok(written)
    }
}
