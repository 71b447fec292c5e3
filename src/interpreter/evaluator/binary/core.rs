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
    /// Evaluates an infix node.
    ///
    /// Assignment and the logical operators control how their operands are
    /// evaluated. Every other operator evaluates both sides, left first.
    pub(in crate::interpreter::evaluator) fn eval_infix(&mut self,
                                                        token: &TokenRef,
                                                        left: &Node,
                                                        right: &Node)
                                                        -> EvalResult<Value> {
        match token.kind() {
            TokenKind::Assign | TokenKind::Define => self.eval_assign(left, right),
            TokenKind::And | TokenKind::Or => self.eval_logic(token.kind(), left, right),
            op => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Ok(Self::apply_infix(op, &left, &right)?)
            },
        }
    }

    /// Applies an infix operator to two values.
    ///
    /// `==` and `!=` compare any two values structurally; an integer equals
    /// the float of the same value. Arithmetic routes to the integer, float
    /// or collection handlers depending on the operand kinds.
    ///
    /// # Parameters
    /// - `op`: The operator kind.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// The resulting value.
    ///
    /// # Errors
    /// - `DivisionByZero` for integer `/` or `%` by zero.
    /// - `UnsupportedOperation` when the operator is not defined for the
    ///   operand kinds.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, token::TokenKind, value::core::Value};
    ///
    /// let v = State::apply_infix(TokenKind::Plus, &Value::Integer(3), &Value::Integer(4));
    /// assert_eq!(v.unwrap(), Value::Integer(7));
    ///
    /// let v = State::apply_infix(TokenKind::Slash, &Value::Integer(1), &Value::Float(4.0));
    /// assert_eq!(v.unwrap(), Value::Float(0.25));
    ///
    /// let v = State::apply_infix(TokenKind::Eq, &Value::from("a"), &Value::Integer(1));
    /// assert_eq!(v.unwrap(), Value::Boolean(false));
    /// ```
    pub fn apply_infix(op: TokenKind, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
        match op {
            TokenKind::Eq => return Ok(Value::Boolean(left == right)),
            TokenKind::NotEq => return Ok(Value::Boolean(left != right)),
            _ => {},
        }
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Self::integer_op(op, *a, *b),
            (Value::Float(_), Value::Integer(_) | Value::Float(_))
            | (Value::Integer(_), Value::Float(_)) => {
                match (left.as_number(), right.as_number()) {
                    (Some(a), Some(b)) => Self::float_op(op, a, b),
                    _ => Err(Self::unsupported(op, left, right)),
                }
            },
            (Value::Str(a), Value::Str(b)) if op == TokenKind::Plus => Self::concat_str(a, b),
            (Value::Array(a), _) if op == TokenKind::Plus => Self::concat_array(a, right),
            (Value::Map(a), Value::Map(b)) if op == TokenKind::Plus => Ok(Self::merge_maps(a, b)),
            _ => Err(Self::unsupported(op, left, right)),
        }
    }

    /// Error for an operator that is not defined on the operand kinds.
    pub(super) fn unsupported(op: TokenKind, left: &Value, right: &Value) -> RuntimeError {
        RuntimeError::UnsupportedOperation { op:    op.fixed_literal().unwrap_or_default().to_string(),
                                             left:  left.type_name(),
                                             right: right.type_name(), }
    }
}
