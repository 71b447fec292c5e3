use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

/// Shared handle to an interned token.
///
/// Two handles obtained for the same `(kind, literal)` pair point to the same
/// allocation, so identity can be checked with [`Rc::ptr_eq`].
pub type TokenRef = Rc<Token>;

/// Closed set of token kinds.
///
/// Every kind belongs to exactly one category, see [`TokenKind::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Special.
    /// Input the lexer could not recognise.
    Illegal,
    /// End of a line in line mode.
    Eol,
    /// End of the input.
    Eof,

    // Literals.
    /// Identifier such as `fact`.
    Ident,
    /// Integer literal such as `42`, `0x1F` or `1_000`.
    Int,
    /// Float literal such as `3.14`, `.5` or `1e9`.
    Float,
    /// String literal; the literal holds the unescaped contents.
    Str,
    /// `// ...`
    LineComment,
    /// `/* ... */`
    BlockComment,

    // Single character operators and delimiters.
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    Bang,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `.`
    Dot,

    // Two character operators.
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `++`
    Incr,
    /// `--`
    Decr,
    /// `..`
    DotDot,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `:=`, same as `=`.
    Define,

    // Keywords.
    /// `func`
    Func,
    /// `true`
    True,
    /// `false`
    False,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
    /// `for`
    For,
    /// `break`
    Break,
    /// `continue`
    Continue,

    // Builtins.
    /// `macro`
    Macro,
    /// `quote`
    Quote,
    /// `unquote`
    Unquote,
    /// `len`
    Len,
    /// `first`
    First,
    /// `rest`
    Rest,
    /// `print`
    Print,
    /// `println`
    Println,
    /// `puts`
    Puts,
    /// `log`
    Log,
    /// `error`
    Error,
}

/// Category a [`TokenKind`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Illegal, end of line and end of file.
    Special,
    /// Identifiers, numbers, strings and comments.
    Literal,
    /// Single character operators and delimiters.
    SingleChar,
    /// Two character operators.
    DoubleChar,
    /// Language keywords.
    Keyword,
    /// Names of built-in functions that are lexed as their own tokens.
    Builtin,
}

/// Keywords and builtins, looked up after an identifier has been scanned.
const KEYWORDS: &[(&str, TokenKind)] = &[("func", TokenKind::Func),
                                         ("true", TokenKind::True),
                                         ("false", TokenKind::False),
                                         ("if", TokenKind::If),
                                         ("else", TokenKind::Else),
                                         ("return", TokenKind::Return),
                                         ("for", TokenKind::For),
                                         ("break", TokenKind::Break),
                                         ("continue", TokenKind::Continue),
                                         ("macro", TokenKind::Macro),
                                         ("quote", TokenKind::Quote),
                                         ("unquote", TokenKind::Unquote),
                                         ("len", TokenKind::Len),
                                         ("first", TokenKind::First),
                                         ("rest", TokenKind::Rest),
                                         ("print", TokenKind::Print),
                                         ("println", TokenKind::Println),
                                         ("puts", TokenKind::Puts),
                                         ("log", TokenKind::Log),
                                         ("error", TokenKind::Error)];

impl TokenKind {
    /// Returns the category of this kind.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Illegal | Self::Eol | Self::Eof => Category::Special,
            Self::Ident | Self::Int | Self::Float | Self::Str | Self::LineComment | Self::BlockComment => {
                Category::Literal
            },
            Self::Assign
            | Self::Plus
            | Self::Minus
            | Self::Bang
            | Self::Asterisk
            | Self::Slash
            | Self::Percent
            | Self::Lt
            | Self::Gt
            | Self::Comma
            | Self::Semicolon
            | Self::LParen
            | Self::RParen
            | Self::LBrace
            | Self::RBrace
            | Self::LBracket
            | Self::RBracket
            | Self::Colon
            | Self::Dot => Category::SingleChar,
            Self::LtEq
            | Self::GtEq
            | Self::Eq
            | Self::NotEq
            | Self::Incr
            | Self::Decr
            | Self::DotDot
            | Self::And
            | Self::Or
            | Self::Define => Category::DoubleChar,
            Self::Func
            | Self::True
            | Self::False
            | Self::If
            | Self::Else
            | Self::Return
            | Self::For
            | Self::Break
            | Self::Continue => Category::Keyword,
            Self::Macro
            | Self::Quote
            | Self::Unquote
            | Self::Len
            | Self::First
            | Self::Rest
            | Self::Print
            | Self::Println
            | Self::Puts
            | Self::Log
            | Self::Error => Category::Builtin,
        }
    }

    /// Returns the fixed text of kinds whose literal never varies.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::token::TokenKind;
    ///
    /// assert_eq!(TokenKind::DotDot.fixed_literal(), Some(".."));
    /// assert_eq!(TokenKind::Ident.fixed_literal(), None);
    /// ```
    #[must_use]
    pub fn fixed_literal(self) -> Option<&'static str> {
        let text = match self {
            Self::Illegal
            | Self::Ident
            | Self::Int
            | Self::Float
            | Self::Str
            | Self::LineComment
            | Self::BlockComment => return None,
            Self::Eol | Self::Eof => "",
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Bang => "!",
            Self::Asterisk => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Incr => "++",
            Self::Decr => "--",
            Self::DotDot => "..",
            Self::And => "&&",
            Self::Or => "||",
            Self::Define => ":=",
            _ => return KEYWORDS.iter().find(|(_, kind)| *kind == self).map(|(word, _)| *word),
        };
        Some(text)
    }

    /// Whether tokens of this kind carry a value from the source: strings,
    /// numbers, comments and illegal input.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self,
                 Self::Illegal | Self::Int | Self::Float | Self::Str | Self::LineComment | Self::BlockComment)
    }

    /// Maps an identifier to its keyword or builtin kind, or `Ident`.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::token::TokenKind;
    ///
    /// assert_eq!(TokenKind::lookup_ident("func"), TokenKind::Func);
    /// assert_eq!(TokenKind::lookup_ident("println"), TokenKind::Println);
    /// assert_eq!(TokenKind::lookup_ident("funky"), TokenKind::Ident);
    /// ```
    #[must_use]
    pub fn lookup_ident(ident: &str) -> Self {
        KEYWORDS.iter()
                .find(|(word, _)| *word == ident)
                .map_or(Self::Ident, |(_, kind)| *kind)
    }
}

/// A lexical token: a kind and its literal text.
///
/// Tokens are immutable and interned; create them through [`Token::intern`]
/// or [`Token::of`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Token {
    kind:    TokenKind,
    literal: Rc<str>,
}

thread_local! {
    static INTERNER: RefCell<HashMap<(TokenKind, Rc<str>), TokenRef>> = RefCell::new(HashMap::new());
}

impl Token {
    /// Returns the unique token for `(kind, literal)`, creating it on first
    /// use.
    ///
    /// String, number, comment and illegal tokens are not kept: each call
    /// returns a new token, so building strings at run time does not grow the
    /// table.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use grol::interpreter::token::{Token, TokenKind};
    ///
    /// let a = Token::intern(TokenKind::Ident, "x");
    /// let b = Token::intern(TokenKind::Ident, "x");
    /// assert!(Rc::ptr_eq(&a, &b));
    ///
    /// let s = Token::intern(TokenKind::Str, "x");
    /// assert!(!Rc::ptr_eq(&s, &Token::intern(TokenKind::Str, "x")));
    /// ```
    #[must_use]
    pub fn intern(kind: TokenKind, literal: &str) -> TokenRef {
        if kind.is_literal() {
            return Rc::new(Self { kind,
                                  literal: Rc::from(literal) });
        }
        INTERNER.with(|interner| {
                    let mut interner = interner.borrow_mut();
                    if let Some(token) = interner.get(&(kind, Rc::from(literal))) {
                        return Rc::clone(token);
                    }
                    let literal: Rc<str> = Rc::from(literal);
                    let token = Rc::new(Self { kind,
                                               literal: Rc::clone(&literal) });
                    interner.insert((kind, literal), Rc::clone(&token));
                    token
                })
    }

    /// Returns the token of a kind with a fixed literal, such as `+` or `func`.
    /// Kinds without a fixed literal get an empty one.
    #[must_use]
    pub fn of(kind: TokenKind) -> TokenRef {
        Self::intern(kind, kind.fixed_literal().unwrap_or(""))
    }

    /// The kind of the token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The literal text of the token.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The literal as a shared string.
    #[must_use]
    pub fn literal_rc(&self) -> Rc<str> {
        Rc::clone(&self.literal)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Eol => write!(f, "EOL"),
            _ => write!(f, "{}", self.literal),
        }
    }
}
