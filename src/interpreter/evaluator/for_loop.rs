use crate::{
    ast::{Block, Node},
    interpreter::{
        evaluator::{
            core::{EvalResult, State, Unwind},
            utils::expect_bool,
        },
        value::core::Value,
    },
};

impl State {
    /// Evaluates a `for` loop.
    ///
    /// The condition is evaluated before every iteration and must be a
    /// boolean. The body runs in the enclosing scope, so names it assigns
    /// stay visible after the loop. `break` ends the loop and `continue` goes
    /// on to the next condition check. Each iteration first checks for
    /// cancellation and the deadline.
    ///
    /// # Returns
    /// The value of the last completed body evaluation, or `nil` if the body
    /// never completed.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::{evaluator::core::State, value::core::Value};
    ///
    /// let mut state = State::new();
    /// let v = state.eval_source("i = 0; for i < 5 { i++; if i == 3 { break }; i }").unwrap();
    /// assert_eq!(v, Value::Integer(2));
    /// ```
    pub(super) fn eval_for(&mut self, condition: &Node, body: &Block) -> EvalResult<Value> {
        let mut result = Value::Null;
        loop {
            self.check_interrupt()?;
            if !expect_bool(&self.eval(condition)?)? {
                break;
            }
            match self.eval_block(body) {
                Ok(value) => result = value,
                Err(Unwind::Break) => break,
                Err(Unwind::Continue) => {},
                Err(other) => return Err(other),
            }
        }
        Ok(result)
    }
}
