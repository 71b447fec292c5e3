use crate::{
    ast::Node,
    interpreter::{
        evaluator::{
            core::{EvalResult, State},
            utils::expect_bool,
        },
        token::TokenKind,
        value::core::Value,
    },
};

impl State {
    /// Evaluates `&&` and `||`.
    ///
    /// The right operand is only evaluated when the left one does not decide
    /// the result. Both operands must be booleans.
    pub(super) fn eval_logic(&mut self,
                             op: TokenKind,
                             left: &Node,
                             right: &Node)
                             -> EvalResult<Value> {
        let left = expect_bool(&self.eval(left)?)?;
        match (op, left) {
            (TokenKind::And, false) => Ok(Value::Boolean(false)),
            (TokenKind::Or, true) => Ok(Value::Boolean(true)),
            _ => Ok(Value::Boolean(expect_bool(&self.eval(right)?)?)),
        }
    }
}
