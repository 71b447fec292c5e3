use logos::Logos;

use crate::interpreter::token::{Token, TokenKind, TokenRef};

/// Per-lexer state carried by `logos`.
#[derive(Debug, Clone, Copy)]
pub struct LexerExtras {
    /// Current source line, starting at 1.
    pub line: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1 }
    }
}

/// Failures the raw scanner can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexError {
    /// No rule matched.
    #[default]
    Illegal,
    /// A string reached the end of input before its closing quote.
    UnterminatedString,
    /// A string contained an unknown or malformed escape.
    InvalidEscape,
}

/// Raw scanner output before keyword lookup and interning.
///
/// Whitespace and newlines are kept as tokens so the [`Lexer`] can record
/// whether the next real token was preceded by them.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum RawToken {
    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r\f]+")]
    Whitespace,
    /// `\n`
    #[token("\n", |lex| { lex.extras.line += 1; })]
    Newline,
    /// Float literal tokens, such as `3.14`, `.5`, `2.0` or `2.1e-10`.
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,
    /// Integer literal tokens, such as `42`, `0x2A`, `0b101010` or `1_000`.
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    Int,
    /// Identifier tokens; keywords are recognised afterwards.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    /// `"..."` with escapes resolved.
    #[token("\"", lex_string)]
    Str(String),
    /// `` `...` `` taken verbatim.
    #[token("`", lex_raw_string)]
    RawStr(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*")]
    LineComment,
    /// ```text
    /// /* Block comments, possibly unterminated. */
    /// ```
    #[token("/*", lex_block_comment)]
    BlockComment,
    /// `=`
    #[token("=")]
    Assign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `!`
    #[token("!")]
    Bang,
    /// `*`
    #[token("*")]
    Asterisk,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `<`
    #[token("<")]
    Lt,
    /// `>`
    #[token(">")]
    Gt,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `<=`
    #[token("<=")]
    LtEq,
    /// `>=`
    #[token(">=")]
    GtEq,
    /// `==`
    #[token("==")]
    Eq,
    /// `!=`
    #[token("!=")]
    NotEq,
    /// `++`
    #[token("++")]
    Incr,
    /// `--`
    #[token("--")]
    Decr,
    /// `..`
    #[token("..")]
    DotDot,
    /// `&&`
    #[token("&&")]
    And,
    /// `||`
    #[token("||")]
    Or,
    /// `:=`
    #[token(":=")]
    Define,
}

/// Scans a double quoted string after its opening quote.
fn lex_string(lex: &mut logos::Lexer<RawToken>) -> Result<String, LexError> {
    let rest = lex.remainder();
    let mut out = String::new();
    let mut chars = rest.char_indices();
    let mut newlines = 0;

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(i + 1);
                lex.extras.line += newlines;
                return Ok(out);
            },
            '\\' => {
                let Some((_, escape)) = chars.next() else {
                    break;
                };
                let resolved = match escape {
                    'n' => Some('\n'),
                    't' => Some('\t'),
                    'r' => Some('\r'),
                    '0' => Some('\0'),
                    '"' => Some('"'),
                    '\\' => Some('\\'),
                    'x' => read_hex(&mut chars, 2),
                    'u' => read_hex(&mut chars, 4),
                    'U' => read_hex(&mut chars, 8),
                    _ => None,
                };
                let Some(resolved) = resolved else {
                    lex.bump(skip_to_quote(rest));
                    return Err(LexError::InvalidEscape);
                };
                out.push(resolved);
            },
            '\n' => {
                newlines += 1;
                out.push(c);
            },
            _ => out.push(c),
        }
    }

    lex.bump(rest.len());
    lex.extras.line += newlines;
    Err(LexError::UnterminatedString)
}

/// Reads exactly `digits` hexadecimal digits as a character.
fn read_hex(chars: &mut std::str::CharIndices<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).map(|(_, c)| c).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

/// Offset just past the closing quote of a string with a bad escape, so
/// scanning resumes after it.
fn skip_to_quote(rest: &str) -> usize {
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return i + 1,
            _ => escaped = false,
        }
    }
    rest.len()
}

/// Scans a backtick string after its opening backtick.
fn lex_raw_string(lex: &mut logos::Lexer<RawToken>) -> Result<String, LexError> {
    let rest = lex.remainder();
    if let Some(end) = rest.find('`') {
        let contents = rest[..end].to_string();
        lex.extras.line += contents.matches('\n').count();
        lex.bump(end + 1);
        return Ok(contents);
    }
    lex.extras.line += rest.matches('\n').count();
    lex.bump(rest.len());
    Err(LexError::UnterminatedString)
}

/// Scans a block comment after `/*`. An unterminated comment runs to the end
/// of the input; the parser decides whether that is an error.
fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.extras.line += rest[..len].matches('\n').count();
    lex.bump(len);
}

/// Whether end of input means the end of the program or the end of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// The whole program is available; the stream ends with `Eof`.
    Complete,
    /// Input arrives line by line; the stream ends with `Eol`.
    Line,
}

/// Produces interned tokens from source text.
///
/// Besides the tokens themselves the lexer records, for the token it just
/// returned, whether whitespace or a newline preceded it. The parser uses
/// this to tell `f (x)` (two expressions) from `f(x)` (a call).
///
/// # Example
/// ```
/// use grol::interpreter::{lexer::Lexer, token::TokenKind};
///
/// let mut lexer = Lexer::new("x := 0x10 // sixteen");
/// let kinds: Vec<TokenKind> = std::iter::from_fn(|| {
///     let token = lexer.next_token();
///     (token.kind() != TokenKind::Eof).then(|| token.kind())
/// }).collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Ident, TokenKind::Define, TokenKind::Int, TokenKind::LineComment]);
/// ```
pub struct Lexer<'src> {
    inner:          logos::Lexer<'src, RawToken>,
    mode:           LexMode,
    had_whitespace: bool,
    had_newline:    bool,
    unterminated:   bool,
    finished:       bool,
    last_error:     Option<LexError>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over a complete program.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_mode(source, LexMode::Complete)
    }

    /// Creates a lexer in the given mode.
    #[must_use]
    pub fn with_mode(source: &'src str, mode: LexMode) -> Self {
        Self { inner: RawToken::lexer_with_extras(source, LexerExtras::default()),
               mode,
               had_whitespace: false,
               had_newline: false,
               unterminated: false,
               finished: false,
               last_error: None }
    }

    /// The mode this lexer was created with.
    #[must_use]
    pub const fn mode(&self) -> LexMode {
        self.mode
    }

    /// Line of the most recently scanned token.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.inner.extras.line
    }

    /// Whether whitespace (including newlines) preceded the last token.
    #[must_use]
    pub const fn had_whitespace(&self) -> bool {
        self.had_whitespace
    }

    /// Whether a newline preceded the last token.
    #[must_use]
    pub const fn had_newline(&self) -> bool {
        self.had_newline
    }

    /// Whether a string was left open at the end of a line-mode input.
    #[must_use]
    pub const fn unterminated_string(&self) -> bool {
        self.unterminated
    }

    /// Why the most recent `Illegal` token was produced.
    #[must_use]
    pub const fn last_error(&self) -> Option<LexError> {
        self.last_error
    }

    /// Returns the next token. Once the input is exhausted every call returns
    /// `Eof` (complete mode) or `Eol` (line mode).
    pub fn next_token(&mut self) -> TokenRef {
        self.had_whitespace = false;
        self.had_newline = false;

        loop {
            if self.finished {
                return self.end_token();
            }
            let Some(raw) = self.inner.next() else {
                self.finished = true;
                return self.end_token();
            };
            let slice = self.inner.slice();
            let token = match raw {
                Ok(RawToken::Whitespace) => {
                    self.had_whitespace = true;
                    continue;
                },
                Ok(RawToken::Newline) => {
                    self.had_whitespace = true;
                    self.had_newline = true;
                    continue;
                },
                Ok(RawToken::Ident) => Token::intern(TokenKind::lookup_ident(slice), slice),
                Ok(RawToken::Int) => Token::intern(TokenKind::Int, slice),
                Ok(RawToken::Float) => Token::intern(TokenKind::Float, slice),
                Ok(RawToken::Str(contents) | RawToken::RawStr(contents)) => {
                    Token::intern(TokenKind::Str, &contents)
                },
                Ok(RawToken::LineComment) => Token::intern(TokenKind::LineComment, slice),
                Ok(RawToken::BlockComment) => Token::intern(TokenKind::BlockComment, slice),
                Ok(raw) => Token::of(fixed_kind(&raw)),
                Err(LexError::UnterminatedString) if self.mode == LexMode::Line => {
                    log::debug!("unterminated string at line {}, needs continuation", self.line());
                    self.unterminated = true;
                    self.finished = true;
                    return self.end_token();
                },
                Err(error) => {
                    self.last_error = Some(error);
                    Token::intern(TokenKind::Illegal, slice)
                },
            };
            return token;
        }
    }

    fn end_token(&self) -> TokenRef {
        match self.mode {
            LexMode::Complete => Token::of(TokenKind::Eof),
            LexMode::Line => Token::of(TokenKind::Eol),
        }
    }
}

/// Maps operator and delimiter tokens to their kind.
const fn fixed_kind(raw: &RawToken) -> TokenKind {
    match raw {
        RawToken::Assign => TokenKind::Assign,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Asterisk => TokenKind::Asterisk,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Incr => TokenKind::Incr,
        RawToken::Decr => TokenKind::Decr,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Define => TokenKind::Define,
        _ => TokenKind::Illegal,
    }
}
