use crate::{
    ast::{Node, Priority},
    interpreter::{
        parser::core::{ParseResult, Parser},
        token::TokenKind,
    },
};

impl Parser<'_> {
    /// Parses a single statement.
    ///
    /// A statement is a comment, or an expression optionally followed by a
    /// `;`. On success the current token is the last token of the statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Node> {
        if matches!(self.cur.kind(), TokenKind::LineComment | TokenKind::BlockComment) {
            return self.parse_comment();
        }
        let expression = self.parse_expression(Priority::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Ok(expression)
    }
}
