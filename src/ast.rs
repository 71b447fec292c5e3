use std::rc::Rc;

use crate::interpreter::token::{Token, TokenKind, TokenRef};

/// Generic structural rewriting of the tree.
///
/// Used by quasi-quotation and macro expansion to replace nodes while
/// keeping the rest of the tree intact.
pub mod modify;
/// Pretty printing.
///
/// Turns a tree back into source text, either on a single line or indented
/// over several lines, adding parentheses only where precedence needs them.
pub mod print;

/// Binding power of operators, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Anything that is not an operator.
    Lowest,
    /// `=` and `:=`, right associative.
    Assign,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==` and `!=`
    Equals,
    /// `<`, `>`, `<=` and `>=`
    LessGreater,
    /// `+` and `-`
    Sum,
    /// `*`, `/` and `%`
    Product,
    /// `-x`, `!x`, `++x`
    Prefix,
    /// Calls, indexing, `.` access and postfix `++`/`--`.
    Call,
}

impl Priority {
    /// Returns the binding power of a token when it appears after an
    /// expression.
    ///
    /// # Example
    /// ```
    /// use grol::{ast::Priority, interpreter::token::TokenKind};
    ///
    /// assert!(Priority::of(TokenKind::Asterisk) > Priority::of(TokenKind::Plus));
    /// assert_eq!(Priority::of(TokenKind::Comma), Priority::Lowest);
    /// ```
    #[must_use]
    pub const fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Assign | TokenKind::Define => Self::Assign,
            TokenKind::Or => Self::Or,
            TokenKind::And => Self::And,
            TokenKind::Eq | TokenKind::NotEq => Self::Equals,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Self::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Self::Product,
            TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Dot
            | TokenKind::Incr
            | TokenKind::Decr => Self::Call,
            _ => Self::Lowest,
        }
    }
}

/// A sequence of statements, used for programs and `{ ... }` bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The opening `{`, or the end token for a whole program.
    pub token:      TokenRef,
    /// The statements in source order.
    pub statements: Vec<Node>,
}

impl Block {
    /// Creates a block.
    #[must_use]
    pub const fn new(token: TokenRef, statements: Vec<Node>) -> Self {
        Self { token, statements }
    }
}

/// `func name(a, b, ..) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    /// The `func` token.
    pub token:      TokenRef,
    /// Optional name given right after `func`.
    pub name:       Option<TokenRef>,
    /// Parameter identifiers, not including a trailing `..`.
    pub parameters: Vec<TokenRef>,
    /// Whether the parameter list ends with `..`.
    pub variadic:   bool,
    /// The function body.
    pub body:       Block,
}

/// `macro(a, b) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct MacroLiteral {
    /// The `macro` token.
    pub token:      TokenRef,
    /// Parameter identifiers.
    pub parameters: Vec<TokenRef>,
    /// The macro body.
    pub body:       Block,
}

/// A node of the abstract syntax tree.
///
/// Every variant carries the interned token that introduced it. The language
/// is expression oriented: `if`, `for` and function literals are expressions
/// and a program is a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Integer literal; the token keeps the source spelling.
    Integer {
        /// The literal token.
        token: TokenRef,
        /// The converted value.
        value: i64,
    },
    /// Float literal.
    Float {
        /// The literal token.
        token: TokenRef,
        /// The converted value.
        value: f64,
    },
    /// String literal; the token literal is the unescaped contents.
    Str {
        /// The literal token.
        token: TokenRef,
    },
    /// `true` or `false`.
    Boolean {
        /// The keyword token.
        token: TokenRef,
        /// The value.
        value: bool,
    },
    /// A name, including `..` inside variadic functions.
    Identifier {
        /// The identifier token.
        token: TokenRef,
    },
    /// A line or block comment kept for printing.
    Comment {
        /// The comment token, including its delimiters.
        token:     TokenRef,
        /// Whether the comment followed other code on the same line.
        same_line: bool,
    },
    /// `[a, b, c]`
    Array {
        /// The `[` token.
        token:    TokenRef,
        /// The elements.
        elements: Vec<Self>,
    },
    /// `{k: v, ...}`; pairs keep their source order.
    Map {
        /// The `{` token.
        token: TokenRef,
        /// Key and value expressions.
        pairs: Vec<(Self, Self)>,
    },
    /// A function literal.
    Function(Rc<FunctionLiteral>),
    /// A macro literal.
    Macro(Rc<MacroLiteral>),
    /// `-x`, `!x`, `+x`, `++x`, `--x`
    Prefix {
        /// The operator token.
        token: TokenRef,
        /// The operand.
        right: Box<Self>,
    },
    /// `a op b`, including assignment.
    Infix {
        /// The operator token.
        token: TokenRef,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// `x++` or `x--`
    Postfix {
        /// The operator token.
        token:   TokenRef,
        /// The identifier being changed.
        operand: TokenRef,
    },
    /// `a[i]`, also produced by `a.name`.
    Index {
        /// The `[` token.
        token: TokenRef,
        /// The indexed expression.
        left:  Box<Self>,
        /// The index expression.
        index: Box<Self>,
    },
    /// `f(a, b)`
    Call {
        /// The `(` token.
        token:     TokenRef,
        /// The callee.
        function:  Box<Self>,
        /// The arguments.
        arguments: Vec<Self>,
    },
    /// Call of a builtin that has its own token, such as `len(x)` or
    /// `quote(e)`.
    Builtin {
        /// The builtin token.
        token:     TokenRef,
        /// The arguments.
        arguments: Vec<Self>,
    },
    /// `if cond { ... } else { ... }`
    If {
        /// The `if` token.
        token:       TokenRef,
        /// The condition.
        condition:   Box<Self>,
        /// Evaluated when the condition is true.
        consequence: Block,
        /// Evaluated when the condition is false; `else if` is a block
        /// holding a single `If`.
        alternative: Option<Block>,
    },
    /// `for cond { ... }`
    For {
        /// The `for` token.
        token:     TokenRef,
        /// The loop condition.
        condition: Box<Self>,
        /// The loop body.
        body:      Block,
    },
    /// `return` or `return value`
    Return {
        /// The `return` token.
        token: TokenRef,
        /// The returned expression.
        value: Option<Box<Self>>,
    },
    /// `break` or `continue`
    Control {
        /// The keyword token.
        token: TokenRef,
    },
    /// A whole program.
    Statements(Block),
}

impl Node {
    /// Returns the token that introduced this node.
    #[must_use]
    pub fn token(&self) -> &TokenRef {
        match self {
            Self::Integer { token, .. }
            | Self::Float { token, .. }
            | Self::Str { token }
            | Self::Boolean { token, .. }
            | Self::Identifier { token }
            | Self::Comment { token, .. }
            | Self::Array { token, .. }
            | Self::Map { token, .. }
            | Self::Prefix { token, .. }
            | Self::Infix { token, .. }
            | Self::Postfix { token, .. }
            | Self::Index { token, .. }
            | Self::Call { token, .. }
            | Self::Builtin { token, .. }
            | Self::If { token, .. }
            | Self::For { token, .. }
            | Self::Return { token, .. }
            | Self::Control { token } => token,
            Self::Function(function) => &function.token,
            Self::Macro(literal) => &literal.token,
            Self::Statements(block) => &block.token,
        }
    }

    /// Binding power of the node when printed as an operand.
    #[must_use]
    pub fn priority(&self) -> Priority {
        match self {
            Self::Infix { token, .. } => Priority::of(token.kind()),
            Self::Prefix { .. } => Priority::Prefix,
            Self::If { .. } | Self::For { .. } | Self::Return { .. } | Self::Statements(_) => {
                Priority::Lowest
            },
            _ => Priority::Call,
        }
    }

    /// Creates an identifier node.
    #[must_use]
    pub fn identifier(name: &str) -> Self {
        Self::Identifier { token: Token::intern(TokenKind::Ident, name) }
    }

    /// Creates an integer literal node.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Integer { token: Token::intern(TokenKind::Int, &value.to_string()),
                        value }
    }

    /// Creates a boolean literal node.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        let kind = if value { TokenKind::True } else { TokenKind::False };
        Self::Boolean { token: Token::of(kind),
                        value }
    }

    /// Returns the identifier name if this node is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&TokenRef> {
        match self {
            Self::Identifier { token } => Some(token),
            _ => None,
        }
    }

    /// Whether this node is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment { .. })
    }
}
