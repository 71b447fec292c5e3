use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::State, token::TokenKind, value::core::Value},
};

impl State {
    /// Integer arithmetic and comparisons.
    ///
    /// `+`, `-` and `*` wrap on overflow. `/` truncates toward zero and `%`
    /// takes the sign of the dividend, so `-21 % 5 == -1`.
    ///
    /// # Errors
    /// - `DivisionByZero` for `/` or `%` by zero.
    /// - `UnsupportedOperation` for operators that are not arithmetic or
    ///   comparisons.
    pub(super) fn integer_op(op: TokenKind, a: i64, b: i64) -> Result<Value, RuntimeError> {
        let value = match op {
            TokenKind::Plus => Value::Integer(a.wrapping_add(b)),
            TokenKind::Minus => Value::Integer(a.wrapping_sub(b)),
            TokenKind::Asterisk => Value::Integer(a.wrapping_mul(b)),
            TokenKind::Slash | TokenKind::Percent if b == 0 => {
                return Err(RuntimeError::DivisionByZero);
            },
            TokenKind::Slash => Value::Integer(a.wrapping_div(b)),
            TokenKind::Percent => Value::Integer(a.wrapping_rem(b)),
            TokenKind::Lt => Value::Boolean(a < b),
            TokenKind::LtEq => Value::Boolean(a <= b),
            TokenKind::Gt => Value::Boolean(a > b),
            TokenKind::GtEq => Value::Boolean(a >= b),
            _ => return Err(Self::unsupported(op, &Value::Integer(a), &Value::Integer(b))),
        };
        Ok(value)
    }

    /// Float arithmetic and comparisons, following IEEE-754: division by zero
    /// gives an infinity or `NaN`, and `%` is the remainder of truncated
    /// division.
    ///
    /// # Errors
    /// `UnsupportedOperation` for operators that are not arithmetic or
    /// comparisons.
    pub(super) fn float_op(op: TokenKind, a: f64, b: f64) -> Result<Value, RuntimeError> {
        let value = match op {
            TokenKind::Plus => Value::Float(a + b),
            TokenKind::Minus => Value::Float(a - b),
            TokenKind::Asterisk => Value::Float(a * b),
            TokenKind::Slash => Value::Float(a / b),
            TokenKind::Percent => Value::Float(a % b),
            TokenKind::Lt => Value::Boolean(a < b),
            TokenKind::LtEq => Value::Boolean(a <= b),
            TokenKind::Gt => Value::Boolean(a > b),
            TokenKind::GtEq => Value::Boolean(a >= b),
            _ => return Err(Self::unsupported(op, &Value::Float(a), &Value::Float(b))),
        };
        Ok(value)
    }
}
