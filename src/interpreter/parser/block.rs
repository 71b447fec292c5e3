use std::rc::Rc;

use crate::{
    ast::Block,
    error::ParseError,
    interpreter::{
        parser::core::{ParseResult, Parser},
        token::TokenKind,
    },
};

impl Parser<'_> {
    /// Parses a block delimited by braces.
    ///
    /// The current token is the opening `{`; on success it is the closing
    /// `}`.
    ///
    /// Grammar: `block := "{" statement* "}"`
    ///
    /// # Errors
    /// - `UnexpectedToken` if the input ends before the closing brace.
    /// - Propagates any errors from the statements.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let token = Rc::clone(&self.cur);
        let mut statements = Vec::new();
        self.next_token();

        while !self.cur_is(TokenKind::RBrace) {
            match self.cur.kind() {
                TokenKind::Eol => return Err(self.need_more_input()),
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedToken { expected: "}".to_string(),
                                                             found:    self.cur.to_string(),
                                                             line:     self.cur_line, });
                },
                TokenKind::Semicolon => {
                    self.next_token();
                    continue;
                },
                _ => {},
            }
            statements.push(self.parse_statement()?);
            self.next_token();
        }

        Ok(Block::new(token, statements))
    }
}
