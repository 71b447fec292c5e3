use std::rc::Rc;

use crate::{
    ast::{Block, FunctionLiteral, MacroLiteral, Node, Priority},
    error::ParseError,
    interpreter::{
        parser::core::{ParseResult, Parser},
        token::{Category, Token, TokenKind},
    },
    util::num::{Number, parse_float, parse_integer},
};

impl Parser<'_> {
    /// Parses the expression starting at the current token.
    ///
    /// Comments in front of an expression are skipped.
    ///
    /// # Errors
    /// - `NoPrefixParse` if no expression can start with the current token.
    /// - `UnexpectedEndOfInput` at the end of the input.
    pub(super) fn parse_prefix(&mut self) -> ParseResult<Node> {
        self.skip_cur_comments()?;
        let token = Rc::clone(&self.cur);

        match token.kind() {
            TokenKind::Ident | TokenKind::DotDot => Ok(Node::Identifier { token }),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => match parse_float(token.literal()) {
                Some(value) => Ok(Node::Float { token, value }),
                None => Err(ParseError::InvalidNumber { literal: token.literal().to_string(),
                                                        line:    self.cur_line, }),
            },
            TokenKind::Str => Ok(Node::Str { token }),
            TokenKind::True | TokenKind::False => {
                Ok(Node::Boolean { value: token.kind() == TokenKind::True,
                                   token })
            },
            TokenKind::Bang | TokenKind::Minus | TokenKind::Plus => {
                self.next_token();
                let right = self.parse_expression(Priority::Prefix)?;
                Ok(Node::Prefix { token,
                                  right: Box::new(right) })
            },
            TokenKind::Incr | TokenKind::Decr => self.parse_prefix_increment(),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::LBracket => {
                let elements = self.parse_expression_list(TokenKind::RBracket)?;
                Ok(Node::Array { token, elements })
            },
            TokenKind::LBrace => self.parse_map_literal(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Func => self.parse_function_literal(),
            TokenKind::Macro => self.parse_macro_literal(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break | TokenKind::Continue => Ok(Node::Control { token }),
            TokenKind::Eol => Err(self.need_more_input()),
            TokenKind::Eof => Err(ParseError::UnexpectedEndOfInput { line: self.cur_line }),
            TokenKind::Illegal => Err(self.illegal_token_error()),
            kind if kind.category() == Category::Builtin => self.parse_builtin_call(),
            _ => Err(ParseError::NoPrefixParse { token: token.to_string(),
                                                 line:  self.cur_line, }),
        }
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        match parse_integer(token.literal()) {
            Some(Number::Integer(value)) => Ok(Node::Integer { token, value }),
            Some(Number::Float(value)) => {
                log::debug!("integer literal {} too large, using a float", token.literal());
                Ok(Node::Float { token, value })
            },
            None => Err(ParseError::InvalidNumber { literal: token.literal().to_string(),
                                                    line:    self.cur_line, }),
        }
    }

    /// `++x` and `--x`; the operand must be an identifier.
    fn parse_prefix_increment(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        self.next_token();
        let operand = self.parse_expression(Priority::Prefix)?;
        if operand.as_identifier().is_none() {
            return Err(ParseError::InvalidIncrementTarget { target: operand.to_string(),
                                                            line:   self.cur_line, });
        }
        Ok(Node::Prefix { token,
                          right: Box::new(operand) })
    }

    /// `( expression )`
    fn parse_grouped(&mut self) -> ParseResult<Node> {
        self.next_token();
        let expression = self.parse_expression(Priority::Lowest)?;
        self.skip_peek_comments()?;
        self.expect_peek(TokenKind::RParen)?;
        Ok(expression)
    }

    /// `{ key: value, ... }`
    fn parse_map_literal(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        let mut pairs = Vec::new();

        loop {
            self.skip_peek_comments()?;
            if self.peek_is(TokenKind::RBrace) {
                break;
            }
            self.next_token();
            let key = self.parse_expression(Priority::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Priority::Lowest)?;
            pairs.push((key, value));

            self.skip_peek_comments()?;
            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.expect_peek(TokenKind::RBrace)?;

        Ok(Node::Map { token, pairs })
    }

    /// Parses an `if` expression with optional `else` and chained `else if`.
    ///
    /// Syntax:
    /// ```text
    ///     if <condition> { ... }
    ///     else if <condition> { ... }
    ///     else { ... }
    /// ```
    fn parse_if(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        self.next_token();
        let condition = self.parse_expression(Priority::Lowest)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if self.peek_is(TokenKind::If) {
                self.next_token();
                let nested = self.parse_if()?;
                Some(Block::new(Rc::clone(nested.token()), vec![nested]))
            } else {
                self.expect_peek(TokenKind::LBrace)?;
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(Node::If { token,
                      condition: Box::new(condition),
                      consequence,
                      alternative })
    }

    /// `for <condition> { ... }`
    fn parse_for(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        self.next_token();
        let condition = self.parse_expression(Priority::Lowest)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Node::For { token,
                       condition: Box::new(condition),
                       body })
    }

    /// `func [name](params) { ... }`
    fn parse_function_literal(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        let name = if self.peek_is(TokenKind::Ident) {
            self.next_token();
            Some(Rc::clone(&self.cur))
        } else {
            None
        };
        self.expect_peek(TokenKind::LParen)?;
        let (parameters, variadic) = self.parse_parameters(true)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Node::Function(Rc::new(FunctionLiteral { token,
                                                    name,
                                                    parameters,
                                                    variadic,
                                                    body })))
    }

    /// `macro(params) { ... }`
    fn parse_macro_literal(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        self.expect_peek(TokenKind::LParen)?;
        let (parameters, _) = self.parse_parameters(false)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Node::Macro(Rc::new(MacroLiteral { token,
                                              parameters,
                                              body })))
    }

    /// `return` with or without a value.
    fn parse_return(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        if matches!(self.peek.kind(),
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof | TokenKind::Eol)
        {
            return Ok(Node::Return { token, value: None });
        }
        self.next_token();
        let value = self.parse_expression(Priority::Lowest)?;

        Ok(Node::Return { token,
                          value: Some(Box::new(value)) })
    }

    /// `len(x)`, `quote(e)`, `println(...)` and the other builtins that have
    /// their own token.
    fn parse_builtin_call(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        self.expect_peek(TokenKind::LParen)?;
        let arguments = self.parse_expression_list(TokenKind::RParen)?;

        Ok(Node::Builtin { token, arguments })
    }

    /// Turns the current comment token into a statement.
    pub(super) fn parse_comment(&mut self) -> ParseResult<Node> {
        let token = Rc::clone(&self.cur);
        self.check_comment_terminated()?;
        Ok(Node::Comment { token,
                           same_line: !self.cur_had_newline })
    }

    /// Fails if the current block comment has no closing `*/`.
    pub(super) fn check_comment_terminated(&mut self) -> ParseResult<()> {
        if self.cur.kind() != TokenKind::BlockComment {
            return Ok(());
        }
        let literal = self.cur.literal();
        if literal.len() >= 4 && literal.ends_with("*/") {
            return Ok(());
        }
        if self.line_mode() {
            self.set_continuation_needed();
        }
        Err(ParseError::UnterminatedComment { line: self.cur_line })
    }

    /// Creates the string key used by `a.name`.
    pub(super) fn field_name(name: &Token) -> Node {
        Node::Str { token: Token::intern(TokenKind::Str, name.literal()) }
    }
}
