use std::rc::Rc;

use crate::{
    ast::{Node, modify::modify},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, State, Unwind},
        token::{Token, TokenKind},
        value::core::Value,
    },
    util::num::format_float,
};

impl State {
    /// Evaluates `quote(node)`.
    ///
    /// The node is kept as code, except for `unquote(e)` calls inside it:
    /// those are evaluated now and replaced by the code form of their value.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::evaluator::core::State;
    ///
    /// let mut state = State::new();
    /// let q = state.eval_source("x = 8; quote(x + unquote(x * 2))").unwrap();
    /// assert_eq!(q.to_string(), "quote(x+16)");
    /// ```
    pub(super) fn eval_quote(&mut self, node: &Node) -> EvalResult<Value> {
        let mut failure: Option<Unwind> = None;
        let quoted = modify(node.clone(), &mut |node| match node {
            Node::Builtin { token, arguments } if token.kind() == TokenKind::Unquote => {
                if failure.is_some() {
                    return (Node::Builtin { token, arguments }, false);
                }
                match self.unquote(&arguments) {
                    Ok(node) => (node, false),
                    Err(e) => {
                        failure = Some(e);
                        (Node::Builtin { token, arguments }, false)
                    },
                }
            },
            other => (other, true),
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(Value::Quote(Rc::new(quoted))),
        }
    }

    fn unquote(&mut self, arguments: &[Node]) -> EvalResult<Node> {
        if arguments.len() != 1 {
            return Err(RuntimeError::WrongArgumentCount { name: "unquote".to_string(),
                                                          got:  arguments.len(),
                                                          min:  1,
                                                          max:  Some(1), }.into());
        }
        let value = self.eval(&arguments[0])?;
        Ok(Self::value_to_node(&value)?)
    }

    /// Converts a value back into code that evaluates to it.
    ///
    /// `nil` becomes the `nil` identifier and a quote gives back its code.
    ///
    /// # Errors
    /// `CannotUnquote` for functions, extensions, macros and errors.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let v = Value::from(vec![Value::from(1.5), Value::from("a"), Value::Null]);
    /// let node = State::value_to_node(&v).unwrap();
    /// assert_eq!(node.to_string(), r#"[1.5,"a",nil]"#);
    /// ```
    pub fn value_to_node(value: &Value) -> Result<Node, RuntimeError> {
        let node = match value {
            Value::Integer(i) => Node::integer(*i),
            Value::Float(f) => Node::Float { token: Token::intern(TokenKind::Float, &format_float(*f)),
                                             value: *f, },
            Value::Boolean(b) => Node::boolean(*b),
            Value::Str(s) => Node::Str { token: Token::intern(TokenKind::Str, s) },
            Value::Null => Node::identifier("nil"),
            Value::Array(elements) => {
                let elements = elements.iter()
                                       .map(Self::value_to_node)
                                       .collect::<Result<Vec<_>, _>>()?;
                Node::Array { token: Token::of(TokenKind::LBracket),
                              elements }
            },
            Value::Map(map) => {
                let pairs = map.iter()
                               .map(|(key, value)| {
                                   Ok((Self::value_to_node(&Value::from(key.clone()))?,
                                       Self::value_to_node(value)?))
                               })
                               .collect::<Result<Vec<_>, RuntimeError>>()?;
                Node::Map { token: Token::of(TokenKind::LBrace),
                            pairs }
            },
            Value::Quote(node) => Node::clone(node),
            other => {
                log::warn!("cannot turn {} back into code", other.type_name());
                return Err(RuntimeError::CannotUnquote { kind: other.type_name() });
            },
        };
        Ok(node)
    }
}
