use std::rc::Rc;

use crate::{
    ast::{Node, Priority},
    error::ParseError,
    interpreter::{
        parser::core::{ParseResult, Parser},
        token::{TokenKind, TokenRef},
    },
};

impl Parser<'_> {
    /// Parses a comma separated list of expressions up to `end`.
    ///
    /// The current token is the opening delimiter; on success it is `end`.
    /// Comments between elements are dropped and a trailing comma is
    /// accepted.
    ///
    /// Grammar (simplified): `list := expression ("," expression)* ","?`
    pub(super) fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Node>> {
        let mut list = Vec::new();

        self.skip_peek_comments()?;
        if self.peek_is(end) {
            self.next_token();
            return Ok(list);
        }
        self.next_token();
        list.push(self.parse_expression(Priority::Lowest)?);

        loop {
            self.skip_peek_comments()?;
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
            self.skip_peek_comments()?;
            if self.peek_is(end) {
                break;
            }
            self.next_token();
            list.push(self.parse_expression(Priority::Lowest)?);
        }
        self.expect_peek(end)?;

        Ok(list)
    }

    /// Parses `(a, b, ..)`. The current token is `(`; on success it is `)`.
    ///
    /// A trailing `..` is only accepted when `allow_variadic` is set.
    ///
    /// # Returns
    /// The parameter names and whether the list ended with `..`.
    pub(super) fn parse_parameters(&mut self,
                                   allow_variadic: bool)
                                   -> ParseResult<(Vec<TokenRef>, bool)> {
        let mut parameters = Vec::new();
        let mut variadic = false;

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Ok((parameters, variadic));
        }

        loop {
            self.next_token();
            match self.cur.kind() {
                TokenKind::Ident => parameters.push(Rc::clone(&self.cur)),
                TokenKind::DotDot if allow_variadic => {
                    variadic = true;
                    self.expect_peek(TokenKind::RParen)?;
                    return Ok((parameters, variadic));
                },
                TokenKind::Eol => return Err(self.need_more_input()),
                _ => {
                    return Err(ParseError::InvalidParameter { token: self.cur.to_string(),
                                                              line:  self.cur_line, });
                },
            }
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }
        self.expect_peek(TokenKind::RParen)?;

        Ok((parameters, variadic))
    }

    /// Moves past comments sitting at the current token.
    pub(super) fn skip_cur_comments(&mut self) -> ParseResult<()> {
        while matches!(self.cur.kind(), TokenKind::LineComment | TokenKind::BlockComment) {
            self.check_comment_terminated()?;
            self.next_token();
        }
        Ok(())
    }

    /// Moves past comments so that the next token is not a comment.
    pub(super) fn skip_peek_comments(&mut self) -> ParseResult<()> {
        while matches!(self.peek.kind(), TokenKind::LineComment | TokenKind::BlockComment) {
            self.next_token();
            self.check_comment_terminated()?;
        }
        Ok(())
    }
}
