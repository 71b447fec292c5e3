use std::{rc::Rc, sync::Arc};

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        environment::{Env, Environment},
        evaluator::core::{EvalResult, State, Unwind},
        extension::registry::Extension,
        token::TokenKind,
        value::{core::Value, function::Function},
    },
    util::alloc::vec_with_capacity,
};

impl State {
    pub(in crate::interpreter::evaluator) fn eval_call(&mut self,
                                                       function: &Node,
                                                       arguments: &[Node])
                                                       -> EvalResult<Value> {
        let callee = self.eval(function)?;
        let args = self.eval_arguments(arguments)?;
        self.apply(&callee, args)
    }

    /// Evaluates call arguments from left to right.
    ///
    /// When the last argument is `..` and holds an array, its elements are
    /// passed as separate arguments.
    fn eval_arguments(&mut self, arguments: &[Node]) -> EvalResult<Vec<Value>> {
        let mut values = vec_with_capacity(arguments.len())?;
        for (i, argument) in arguments.iter().enumerate() {
            let value = self.eval(argument)?;
            let spread = i + 1 == arguments.len()
                         && argument.as_identifier()
                                    .is_some_and(|token| token.kind() == TokenKind::DotDot);
            match value {
                Value::Array(extra) if spread => values.extend(extra.iter().cloned()),
                other => values.push(other),
            }
        }
        Ok(values)
    }

    /// Calls a function or extension value with evaluated arguments.
    ///
    /// # Errors
    /// - `NotCallable` if `callee` is neither.
    /// - `Cancelled` or `DeadlineExceeded` when evaluation was interrupted.
    /// - Any error raised by the call.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let mut state = State::new();
    /// let add = state.eval_source("func(a, b) { a + b }").unwrap();
    /// let sum = state.apply(&add, vec![Value::from(2), Value::from(3)]).unwrap();
    /// assert_eq!(sum, Value::Integer(5));
    /// ```
    pub fn apply(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        self.check_interrupt()?;
        match callee {
            Value::Function(function) => self.apply_function(function, args),
            Value::Extension(extension) => Ok(self.apply_extension(extension, &args)?),
            other => Err(RuntimeError::NotCallable { kind: other.type_name() }.into()),
        }
    }

    fn apply_extension(&mut self,
                       extension: &Arc<Extension>,
                       args: &[Value])
                       -> Result<Value, RuntimeError> {
        let args = extension.check_args(args)?;
        if extension.no_cache {
            self.stack.mark_uncacheable();
        }
        (extension.callback)(self, extension, &args)
    }

    /// Runs a user function.
    ///
    /// A memoized result is returned without running the body. Otherwise the
    /// body runs in a new scope enclosing the captured environment, and the
    /// result is memoized unless the call reached something that cannot be
    /// cached. An error leaving the function records the call stack.
    fn apply_function(&mut self, function: &Rc<Function>, args: Vec<Value>) -> EvalResult<Value> {
        if let Some(value) = self.cache.get(function.id, &args) {
            log::trace!("cache hit for {}", function.display_name());
            return Ok(value);
        }
        let env = Self::bind_arguments(function, &args)?;
        self.push_frame(function.name.clone())?;

        let result = self.eval_block_in(env, &function.literal.body);

        let result = match result {
            Ok(value) | Err(Unwind::Return(value)) => Ok(value),
            Err(unwind) => match unwind.escaped() {
                Unwind::Error(mut e) => {
                    e.capture_stack(self.stack_names());
                    Err(Unwind::Error(e))
                },
                other => Err(other),
            },
        };
        let frame = self.stack.pop();
        if let Ok(value) = &result
           && frame.is_some_and(|frame| frame.cacheable)
        {
            self.cache.insert(function.id, &args, value.clone());
        }
        result
    }

    /// Creates the scope of a call: `self`, the parameters and, for variadic
    /// functions, the extra arguments as the `..` array.
    fn bind_arguments(function: &Rc<Function>, args: &[Value]) -> Result<Env, RuntimeError> {
        let literal = &function.literal;
        let wanted = literal.parameters.len();
        if args.len() < wanted || (!literal.variadic && args.len() > wanted) {
            return Err(RuntimeError::WrongArgumentCount { name: function.display_name().to_string(),
                                                          got:  args.len(),
                                                          min:  wanted,
                                                          max:  (!literal.variadic).then_some(wanted), });
        }

        let env = Environment::enclosed(&function.env);
        {
            let mut scope = env.borrow_mut();
            scope.define(Rc::from("self"), Value::Function(Rc::clone(function)));
            for (parameter, arg) in literal.parameters.iter().zip(args) {
                scope.define(parameter.literal_rc(), arg.clone());
            }
            if literal.variadic {
                scope.define(Rc::from(".."), Value::from(args[wanted..].to_vec()));
            }
        }
        Ok(env)
    }
}
