/// Broad category of a [`RuntimeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A name or callee could not be resolved.
    Resolution,
    /// An operation was applied to values of the wrong kind.
    Type,
    /// A call had the wrong number of arguments.
    Arity,
    /// Any other failure during evaluation.
    Runtime,
    /// Evaluation was cancelled or ran past its deadline.
    Cancellation,
    /// A memory or depth limit was reached.
    Resource,
}

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Tried to use an undefined identifier.
    UnknownIdentifier {
        /// The name of the identifier.
        name: String,
    },
    /// Tried to call something that is not a function.
    NotCallable {
        /// Kind of the value that was called.
        kind: &'static str,
    },
    /// A binary operator is not defined for the operand kinds.
    UnsupportedOperation {
        /// The operator.
        op:    String,
        /// Kind of the left operand.
        left:  &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },
    /// A prefix operator is not defined for the operand kind.
    UnsupportedPrefix {
        /// The operator.
        op:      String,
        /// Kind of the operand.
        operand: &'static str,
    },
    /// `if` and `for` conditions must be booleans.
    ConditionNotBoolean {
        /// The printed condition value.
        value: String,
    },
    /// The value cannot be used as a map key.
    NotHashable {
        /// Kind of the rejected value.
        kind: &'static str,
    },
    /// Indexing is not defined for this kind.
    IndexNotSupported {
        /// Kind of the indexed value.
        kind: &'static str,
    },
    /// A call had the wrong number of arguments.
    WrongArgumentCount {
        /// Name of the callee.
        name: String,
        /// Number of arguments passed.
        got:  usize,
        /// Minimum number of arguments.
        min:  usize,
        /// Maximum number of arguments, `None` when unbounded.
        max:  Option<usize>,
    },
    /// An argument had the wrong kind.
    WrongArgumentType {
        /// Name of the callee.
        name:     String,
        /// One-based position of the argument.
        position: usize,
        /// The expected kind.
        expected: &'static str,
        /// The kind that was passed.
        got:      &'static str,
    },
    /// An argument had the right kind but an unusable value.
    InvalidArgument {
        /// Name of the callee.
        name:    String,
        /// Details about why the argument is invalid.
        details: String,
    },
    /// Integer division or remainder by zero.
    DivisionByZero,
    /// Array index assignment outside the array.
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// The length of the array.
        len:   usize,
    },
    /// Attempted to bind a constant to a different value.
    ConstantReassignment {
        /// The name of the constant.
        name: String,
        /// The bound value, printed.
        from: String,
        /// The rejected value, printed.
        to:   String,
    },
    /// The left side of an assignment cannot be written.
    NotAssignable {
        /// The printed form of the target.
        target: String,
    },
    /// `break` or `continue` used outside of a loop.
    ControlOutsideLoop {
        /// The keyword used.
        keyword: &'static str,
    },
    /// A macro body did not evaluate to a quote.
    MacroResultNotQuote {
        /// Kind of the value that was returned.
        kind: &'static str,
    },
    /// `unquote` evaluated outside of `quote`.
    UnquoteOutsideQuote,
    /// The value produced by `unquote` has no code representation.
    CannotUnquote {
        /// Kind of the value.
        kind: &'static str,
    },
    /// Raised by the script itself with `error(...)`.
    User {
        /// The message given to `error`.
        message: String,
    },
    /// Reading input or writing output failed.
    Io {
        /// Description of the failure.
        details: String,
    },
    /// The cancellation signal was raised.
    Cancelled,
    /// The evaluation deadline has passed.
    DeadlineExceeded,
    /// Function calls nested deeper than the configured maximum.
    MaxDepthExceeded {
        /// The configured maximum.
        depth: usize,
    },
    /// A collection would not fit in memory.
    AllocationFailed {
        /// Number of elements requested.
        requested: usize,
    },
}

impl RuntimeError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownIdentifier { .. } | Self::NotCallable { .. } => ErrorKind::Resolution,
            Self::UnsupportedOperation { .. }
            | Self::UnsupportedPrefix { .. }
            | Self::ConditionNotBoolean { .. }
            | Self::NotHashable { .. }
            | Self::IndexNotSupported { .. }
            | Self::WrongArgumentType { .. } => ErrorKind::Type,
            Self::WrongArgumentCount { .. } => ErrorKind::Arity,
            Self::Cancelled | Self::DeadlineExceeded => ErrorKind::Cancellation,
            Self::MaxDepthExceeded { .. } | Self::AllocationFailed { .. } => ErrorKind::Resource,
            _ => ErrorKind::Runtime,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name } => write!(f, "identifier not found: {name}"),
            Self::NotCallable { kind } => write!(f, "not a function: {kind}"),
            Self::UnsupportedOperation { op, left, right } => {
                write!(f, "unknown operator: {left} {op} {right}")
            },
            Self::UnsupportedPrefix { op, operand } => write!(f, "unknown operator: {op}{operand}"),
            Self::ConditionNotBoolean { value } => write!(f, "condition is not a boolean: {value}"),
            Self::NotHashable { kind } => write!(f, "{kind} not usable as map key"),
            Self::IndexNotSupported { kind } => write!(f, "index operator not supported: {kind}"),
            Self::WrongArgumentCount { name, got, min, max } => match max {
                Some(max) if max == min => {
                    write!(f, "wrong number of arguments for {name}. got={got}, want={min}")
                },
                Some(max) => write!(f,
                                    "wrong number of arguments for {name}. got={got}, want between {min} and {max}"),
                None => write!(f,
                               "wrong number of arguments for {name}. got={got}, want at least={min}"),
            },
            Self::WrongArgumentType { name, position, expected, got } => write!(f,
                                                                                "wrong type of argument {position} for {name}: got={got}, want {expected}"),
            Self::InvalidArgument { name, details } => {
                write!(f, "invalid argument for {name}: {details}")
            },
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of range for array of length {len}")
            },
            Self::ConstantReassignment { name, from, to } => {
                write!(f, "attempt to change constant {name} from {from} to {to}")
            },
            Self::NotAssignable { target } => write!(f, "cannot assign to {target}"),
            Self::ControlOutsideLoop { keyword } => write!(f, "{keyword} outside of a loop"),
            Self::MacroResultNotQuote { kind } => {
                write!(f, "macro must return a quote, got {kind}")
            },
            Self::UnquoteOutsideQuote => write!(f, "unquote outside of quote"),
            Self::CannotUnquote { kind } => write!(f, "cannot convert {kind} back into code"),
            Self::User { message } => write!(f, "{message}"),
            Self::Io { details } => write!(f, "io error: {details}"),
            Self::Cancelled => write!(f, "evaluation cancelled"),
            Self::DeadlineExceeded => write!(f, "evaluation deadline exceeded"),
            Self::MaxDepthExceeded { depth } => write!(f, "max depth {depth} exceeded"),
            Self::AllocationFailed { requested } => write!(f,
                                                           "requested {requested} elements would exceed available memory"),
        }
    }
}

impl std::error::Error for RuntimeError {}
