use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, State},
        token::{TokenKind, TokenRef},
        value::core::Value,
    },
};

impl State {
    /// Applies a prefix operator to a value.
    ///
    /// Supported operators:
    /// - `!`: boolean negation.
    /// - `-`: numeric negation; integers wrap on overflow.
    /// - `+`: returns numbers unchanged.
    ///
    /// # Errors
    /// `UnsupportedPrefix` for any other operator or operand kind.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, token::TokenKind, value::core::Value};
    ///
    /// let v = State::apply_prefix(TokenKind::Minus, &Value::Integer(5)).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = State::apply_prefix(TokenKind::Bang, &Value::Boolean(false)).unwrap();
    /// assert_eq!(v, Value::Boolean(true));
    ///
    /// assert!(State::apply_prefix(TokenKind::Bang, &Value::Integer(0)).is_err());
    /// ```
    pub fn apply_prefix(op: TokenKind, value: &Value) -> Result<Value, RuntimeError> {
        match (op, value) {
            (TokenKind::Bang, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (TokenKind::Minus, Value::Integer(i)) => Ok(Value::Integer(i.wrapping_neg())),
            (TokenKind::Minus, Value::Float(f)) => Ok(Value::Float(-f)),
            (TokenKind::Plus, Value::Integer(_) | Value::Float(_)) => Ok(value.clone()),
            _ => Err(RuntimeError::UnsupportedPrefix { op:      op.fixed_literal()
                                                                   .unwrap_or_default()
                                                                   .to_string(),
                                                       operand: value.type_name(), }),
        }
    }

    pub(super) fn eval_prefix(&mut self, token: &TokenRef, right: &Node) -> EvalResult<Value> {
        if matches!(token.kind(), TokenKind::Incr | TokenKind::Decr) {
            return match right.as_identifier() {
                Some(target) => self.eval_increment(token, target, true),
                None => Err(RuntimeError::NotAssignable { target: right.to_string() }.into()),
            };
        }
        let value = self.eval(right)?;
        Ok(Self::apply_prefix(token.kind(), &value)?)
    }

    /// `++x`, `--x`, `x++` and `x--`.
    ///
    /// The new value is stored like an assignment, so constants cannot be
    /// incremented. The prefix forms return the new value, the postfix forms
    /// the old one.
    pub(super) fn eval_increment(&mut self,
                                 token: &TokenRef,
                                 target: &TokenRef,
                                 prefix: bool)
                                 -> EvalResult<Value> {
        let old = self.eval_identifier(target.literal())?;
        let increment = token.kind() == TokenKind::Incr;
        let new = match &old {
            Value::Integer(i) if increment => Value::Integer(i.wrapping_add(1)),
            Value::Integer(i) => Value::Integer(i.wrapping_sub(1)),
            Value::Float(f) if increment => Value::Float(f + 1.0),
            Value::Float(f) => Value::Float(f - 1.0),
            other => {
                return Err(RuntimeError::UnsupportedPrefix { op:      token.literal().to_string(),
                                                             operand: other.type_name(), }.into());
            },
        };
        self.env
            .borrow_mut()
            .set(target.literal_rc(), new.clone())?;
        Ok(if prefix { new } else { old })
    }
}
