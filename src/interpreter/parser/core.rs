use std::{mem, rc::Rc};

use crate::{
    ast::{Block, Node, Priority},
    error::{ParseError, ParseErrors},
    interpreter::{
        lexer::{LexError, LexMode, Lexer},
        token::{Token, TokenKind, TokenRef},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// How deeply expressions may nest before parsing gives up.
pub const MAX_NESTING: usize = 128;

/// Parses a complete program.
///
/// # Errors
/// Returns every syntax error found in the source.
///
/// # Example
/// ```
/// use grol::interpreter::parser::parse_program;
///
/// let program = parse_program("x = 3; x * (2 + 1)").unwrap();
/// assert_eq!(program.format(true), "x=3;x*(2+1)");
///
/// let errors = parse_program("x = ;").unwrap_err();
/// assert_eq!(errors.0.len(), 1);
/// ```
pub fn parse_program(source: &str) -> Result<Node, ParseErrors> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(ParseErrors(parser.into_errors()))
    }
}

/// Pratt parser over the interned token stream.
///
/// The parser keeps the current and the next token, together with the
/// whitespace information the lexer recorded for the next one. In line mode
/// it reports [`Parser::continuation_needed`] when the input stops in the
/// middle of a construct.
pub struct Parser<'src> {
    lexer:                          Lexer<'src>,
    pub(super) cur:                 TokenRef,
    pub(super) peek:                TokenRef,
    pub(super) cur_line:            usize,
    peek_line:                      usize,
    pub(super) cur_had_newline:     bool,
    pub(super) peek_had_whitespace: bool,
    pub(super) peek_had_newline:    bool,
    cur_error:                      Option<LexError>,
    peek_error:                     Option<LexError>,
    errors:                         Vec<ParseError>,
    continuation_needed:            bool,
    depth:                          usize,
}

impl<'src> Parser<'src> {
    /// Creates a parser and reads the first two tokens.
    #[must_use]
    pub fn new(lexer: Lexer<'src>) -> Self {
        let eof = Token::of(TokenKind::Eof);
        let mut parser = Self { lexer,
                                cur: Rc::clone(&eof),
                                peek: eof,
                                cur_line: 1,
                                peek_line: 1,
                                cur_had_newline: false,
                                peek_had_whitespace: false,
                                peek_had_newline: false,
                                cur_error: None,
                                peek_error: None,
                                errors: Vec::new(),
                                continuation_needed: false,
                                depth: 0 };
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Errors collected so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consumes the parser, returning its errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Whether a line-mode input ended inside an unfinished construct.
    #[must_use]
    pub const fn continuation_needed(&self) -> bool {
        self.continuation_needed
    }

    /// Parses statements until the end of the input.
    ///
    /// After a syntax error the parser skips to the next statement boundary
    /// and carries on, so one call reports every error. Parsing stops early
    /// when more input is needed in line mode.
    pub fn parse_program(&mut self) -> Node {
        let token = Token::of(TokenKind::Eof);
        let mut statements = Vec::new();

        while !self.at_end() {
            if self.cur_is(TokenKind::Semicolon) {
                self.next_token();
                continue;
            }
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    if self.continuation_needed {
                        log::debug!("continuation needed at line {}", self.cur_line);
                        break;
                    }
                    log::debug!("parse error: {error}");
                    self.errors.push(error);
                    self.synchronize();
                },
            }
            self.next_token();
        }
        if self.unterminated_string() {
            self.continuation_needed = true;
        }

        Node::Statements(Block::new(token, statements))
    }

    /// Parses an expression whose operators bind tighter than `precedence`.
    ///
    /// `(` and `[` only continue an expression when they directly follow it,
    /// so `(3)\n(4)` is two expressions. A postfix `++` or `--` must be on the
    /// same line as its operand.
    ///
    /// # Errors
    /// `NestedTooDeeply` past [`MAX_NESTING`] levels, or any syntax error.
    pub fn parse_expression(&mut self, precedence: Priority) -> ParseResult<Node> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestedTooDeeply { line: self.cur_line });
        }
        self.depth += 1;
        let result = self.parse_operators(precedence);
        self.depth -= 1;
        result
    }

    fn parse_operators(&mut self, precedence: Priority) -> ParseResult<Node> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < Priority::of(self.peek.kind()) {
            match self.peek.kind() {
                TokenKind::LParen | TokenKind::LBracket if self.peek_had_whitespace => break,
                TokenKind::Incr | TokenKind::Decr if self.peek_had_newline => break,
                _ => {},
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    /// Advances to the next token.
    pub(super) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        let next_error = if next.kind() == TokenKind::Illegal { self.lexer.last_error() } else { None };

        self.cur = mem::replace(&mut self.peek, next);
        self.cur_line = mem::replace(&mut self.peek_line, self.lexer.line());
        self.cur_had_newline = self.peek_had_newline;
        self.cur_error = mem::replace(&mut self.peek_error, next_error);
        self.peek_had_whitespace = self.lexer.had_whitespace();
        self.peek_had_newline = self.lexer.had_newline();
    }

    pub(super) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind() == kind
    }

    pub(super) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind() == kind
    }

    pub(super) fn at_end(&self) -> bool {
        matches!(self.cur.kind(), TokenKind::Eof | TokenKind::Eol)
    }

    /// Moves to the next token if it has the expected kind.
    pub(super) fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_is(kind) {
            self.next_token();
            return Ok(());
        }
        if self.peek_is(TokenKind::Eol) {
            return Err(self.need_more_input());
        }
        Err(ParseError::UnexpectedToken { expected: kind.fixed_literal().unwrap_or("?").to_string(),
                                          found:    self.peek.to_string(),
                                          line:     self.peek_line, })
    }

    /// Records that the input stopped too early.
    ///
    /// In line mode this is not an error: the caller is told to supply the
    /// next line and try again.
    pub(super) fn need_more_input(&mut self) -> ParseError {
        if self.lexer.mode() == LexMode::Line {
            self.continuation_needed = true;
        }
        ParseError::UnexpectedEndOfInput { line: self.cur_line }
    }

    /// Error for the current `Illegal` token.
    pub(super) fn illegal_token_error(&self) -> ParseError {
        let line = self.cur_line;
        match self.cur_error {
            Some(LexError::UnterminatedString) => ParseError::UnterminatedString { line },
            Some(LexError::InvalidEscape) => ParseError::InvalidEscape { line },
            _ => ParseError::IllegalToken { literal: self.cur.literal().to_string(),
                                            line },
        }
    }

    /// Whether a string was left open at the end of a line-mode input.
    fn unterminated_string(&self) -> bool {
        self.lexer.unterminated_string()
    }

    /// Whether end of input means more lines may follow.
    pub(super) fn line_mode(&self) -> bool {
        self.lexer.mode() == LexMode::Line
    }

    /// Marks that more input is needed without producing an error.
    pub(super) const fn set_continuation_needed(&mut self) {
        self.continuation_needed = true;
    }

    /// Skips the rest of a broken statement.
    fn synchronize(&mut self) {
        while !self.at_end()
              && !matches!(self.peek.kind(),
                           TokenKind::Semicolon | TokenKind::Eof | TokenKind::Eol)
              && !self.peek_had_newline
        {
            self.next_token();
        }
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }
}
