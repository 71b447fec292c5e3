use indexmap::IndexMap;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, State},
            utils::join_print,
        },
        token::{TokenKind, TokenRef},
        value::{
            core::{Value, ValueMap},
            hash_key::HashKey,
        },
    },
    util::num::len_to_int,
};

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `AtLeast(n)` means any count of `n` or more is accepted.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    const fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Print | TokenKind::Log | TokenKind::Error => Self::AtLeast(1),
            TokenKind::Println | TokenKind::Puts => Self::AtLeast(0),
            _ => Self::Exact(1),
        }
    }

    fn check(self, name: &str, got: usize) -> Result<(), RuntimeError> {
        let (ok, min, max) = match self {
            Self::Exact(n) => (got == n, n, Some(n)),
            Self::AtLeast(n) => (got >= n, n, None),
        };
        if ok {
            return Ok(());
        }
        Err(RuntimeError::WrongArgumentCount { name: name.to_string(),
                                               got,
                                               min,
                                               max })
    }
}

impl State {
    /// Evaluates a call of a builtin that has its own token.
    ///
    /// `quote` takes its argument unevaluated; every other builtin evaluates
    /// its arguments first, left to right. The printing builtins and `log` write output, so
    /// the calls in progress are not memoized.
    pub(in crate::interpreter::evaluator) fn eval_builtin(&mut self,
                                                          token: &TokenRef,
                                                          arguments: &[Node])
                                                          -> EvalResult<Value> {
        let kind = token.kind();
        match kind {
            TokenKind::Quote => {
                Arity::of(kind).check(token.literal(), arguments.len())?;
                return self.eval_quote(&arguments[0]);
            },
            TokenKind::Unquote => return Err(RuntimeError::UnquoteOutsideQuote.into()),
            _ => {},
        }

        // `..` is passed as one array here; only calls of functions spread it.
        let args = arguments.iter()
                            .map(|argument| self.eval(argument))
                            .collect::<EvalResult<Vec<_>>>()?;
        Arity::of(kind).check(token.literal(), args.len())?;
        match kind {
            TokenKind::Len => Ok(Self::len(&args[0])?),
            TokenKind::First => Ok(Self::first(&args[0])?),
            TokenKind::Rest => Ok(Self::rest(&args[0])?),
            TokenKind::Error => Err(RuntimeError::User { message: join_print(&args) }.into()),
            TokenKind::Print | TokenKind::Println | TokenKind::Puts | TokenKind::Log => {
                self.stack.mark_uncacheable();
                self.print(kind, &args)?;
                Ok(Value::Null)
            },
            _ => Err(RuntimeError::NotCallable { kind: "BUILTIN" }.into()),
        }
    }

    fn print(&mut self, kind: TokenKind, args: &[Value]) -> Result<(), RuntimeError> {
        match kind {
            TokenKind::Print => self.write_out(&join_print(args)),
            TokenKind::Println => self.write_out(&(join_print(args) + "\n")),
            TokenKind::Puts => {
                for arg in args {
                    self.write_out(&(arg.to_print_string() + "\n"))?;
                }
                Ok(())
            },
            _ if self.no_log => self.write_out(&(join_print(args) + "\n")),
            _ => {
                log::info!(target: "grol", "{}", join_print(args));
                Ok(())
            },
        }
    }

    /// Number of characters of a string, or elements of an array or map.
    /// `len(nil)` is 0.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// assert_eq!(State::len(&Value::from("héllo")).unwrap(), Value::Integer(5));
    /// assert_eq!(State::len(&Value::Null).unwrap(), Value::Integer(0));
    /// assert!(State::len(&Value::from(1)).is_err());
    /// ```
    pub fn len(value: &Value) -> Result<Value, RuntimeError> {
        let len = match value {
            Value::Str(s) => s.chars().count(),
            Value::Array(arr) => arr.len(),
            Value::Map(map) => map.len(),
            Value::Null => 0,
            other => return Err(Self::not_a_sequence("len", other)),
        };
        Ok(Value::Integer(len_to_int(len)))
    }

    /// First element of an array, first character of a string, or first
    /// entry of a map as `{"key": k, "value": v}`. Empty sequences give `nil`.
    pub fn first(value: &Value) -> Result<Value, RuntimeError> {
        match value {
            Value::Array(arr) => Ok(arr.first().cloned().unwrap_or(Value::Null)),
            Value::Str(s) => Ok(s.chars()
                                 .next()
                                 .map_or(Value::Null, |c| Value::from(c.to_string()))),
            Value::Map(map) => Ok(map.first().map_or(Value::Null, |(key, value)| {
                                                 let mut entry: ValueMap = IndexMap::with_capacity(2);
                                                 entry.insert(HashKey::Str("key".into()), Value::from(key.clone()));
                                                 entry.insert(HashKey::Str("value".into()), value.clone());
                                                 Value::from(entry)
                                             })),
            other => Err(Self::not_a_sequence("first", other)),
        }
    }

    /// Everything but the first element, character or entry. Empty
    /// sequences give `nil`.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let arr = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
    /// assert_eq!(State::rest(&arr).unwrap().to_string(), "[2,3]");
    /// assert_eq!(State::rest(&Value::from("abc")).unwrap(), Value::from("bc"));
    /// assert_eq!(State::rest(&Value::from("")).unwrap(), Value::Null);
    /// ```
    pub fn rest(value: &Value) -> Result<Value, RuntimeError> {
        match value {
            Value::Array(arr) => Ok(arr.split_first()
                                       .map_or(Value::Null, |(_, tail)| Value::from(tail.to_vec()))),
            Value::Str(s) => {
                let mut chars = s.chars();
                Ok(chars.next()
                        .map_or(Value::Null, |_| Value::from(chars.as_str())))
            },
            Value::Map(map) if map.is_empty() => Ok(Value::Null),
            Value::Map(map) => {
                let tail: ValueMap = map.iter()
                                        .skip(1)
                                        .map(|(key, value)| (key.clone(), value.clone()))
                                        .collect();
                Ok(Value::from(tail))
            },
            other => Err(Self::not_a_sequence("rest", other)),
        }
    }

    fn not_a_sequence(name: &str, value: &Value) -> RuntimeError {
        RuntimeError::WrongArgumentType { name:     name.to_string(),
                                          position: 1,
                                          expected: "STRING, ARRAY or MAP",
                                          got:      value.type_name(), }
    }
}
