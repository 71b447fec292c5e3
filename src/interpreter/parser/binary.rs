use std::rc::Rc;

use crate::{
    ast::{Node, Priority},
    error::ParseError,
    interpreter::{
        parser::core::{ParseResult, Parser},
        token::{Category, TokenKind},
    },
};

impl Parser<'_> {
    /// Parses the operator at the current token, with `left` already parsed.
    ///
    /// Binary operators are left associative: the right operand is parsed
    /// with the operator's own priority. Assignment is right associative.
    ///
    /// # Errors
    /// - `InvalidAssignmentTarget` when assigning to anything but an
    ///   identifier or an index expression.
    /// - `InvalidIncrementTarget` for a postfix operator after anything but
    ///   an identifier.
    pub(super) fn parse_infix(&mut self, left: Node) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);

        match token.kind() {
            TokenKind::LParen => {
                let arguments = self.parse_expression_list(TokenKind::RParen)?;
                Ok(Node::Call { token,
                                function: Box::new(left),
                                arguments })
            },
            TokenKind::LBracket => {
                self.next_token();
                let index = self.parse_expression(Priority::Lowest)?;
                self.expect_peek(TokenKind::RBracket)?;
                Ok(Node::Index { token,
                                 left: Box::new(left),
                                 index: Box::new(index) })
            },
            TokenKind::Dot => self.parse_field_access(left),
            TokenKind::Incr | TokenKind::Decr => {
                let Some(operand) = left.as_identifier() else {
                    return Err(ParseError::InvalidIncrementTarget { target: left.to_string(),
                                                                    line:   self.cur_line, });
                };
                Ok(Node::Postfix { token,
                                   operand: Rc::clone(operand) })
            },
            TokenKind::Assign | TokenKind::Define => {
                if !matches!(left, Node::Identifier { .. } | Node::Index { .. }) {
                    return Err(ParseError::InvalidAssignmentTarget { target: left.to_string(),
                                                                     line:   self.cur_line, });
                }
                self.next_token();
                let right = self.parse_expression(Priority::Lowest)?;
                Ok(Node::Infix { token,
                                 left: Box::new(left),
                                 right: Box::new(right) })
            },
            kind => {
                let precedence = Priority::of(kind);
                self.next_token();
                let right = self.parse_expression(precedence)?;
                Ok(Node::Infix { token,
                                 left: Box::new(left),
                                 right: Box::new(right) })
            },
        }
    }

    /// `left.name`, the same as `left["name"]`.
    fn parse_field_access(&mut self, left: Node) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        let is_name = matches!(self.peek.kind().category(),
                               Category::Keyword | Category::Builtin)
                      || self.peek_is(TokenKind::Ident);
        if !is_name {
            if self.peek_is(TokenKind::Eol) {
                return Err(self.need_more_input());
            }
            return Err(ParseError::UnexpectedToken { expected: "identifier".to_string(),
                                                     found:    self.peek.to_string(),
                                                     line:     self.cur_line, });
        }
        self.next_token();
        let index = Self::field_name(&self.cur);
        Ok(Node::Index { token,
                         left: Box::new(left),
                         index: Box::new(index) })
    }
}
