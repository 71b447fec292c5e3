#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The next token was not the one the grammar requires.
    UnexpectedToken {
        /// The token that was expected.
        expected: String,
        /// The token encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// No expression can start with this token.
    NoPrefixParse {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The lexer could not recognise the input.
    IllegalToken {
        /// The offending text.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A numeric literal could not be converted.
    InvalidNumber {
        /// The literal text.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A string literal contains an escape sequence that is not supported.
    InvalidEscape {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A string literal reached the end of input before its closing quote.
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A block comment reached the end of input before `*/`.
    UnterminatedComment {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The input ended in the middle of a construct.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Only identifiers and index expressions can be assigned to.
    InvalidAssignmentTarget {
        /// The printed form of the target.
        target: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// `++` and `--` only apply to identifiers.
    InvalidIncrementTarget {
        /// The printed form of the operand.
        target: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Expressions are nested deeper than the parser allows.
    NestedTooDeeply {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A parameter list contained something other than identifiers and a
    /// trailing `..`.
    InvalidParameter {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ParseError {
    /// Returns the line the error was reported on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::NoPrefixParse { line, .. }
            | Self::IllegalToken { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidEscape { line }
            | Self::UnterminatedString { line }
            | Self::UnterminatedComment { line }
            | Self::UnexpectedEndOfInput { line }
            | Self::NestedTooDeeply { line }
            | Self::InvalidAssignmentTarget { line, .. }
            | Self::InvalidIncrementTarget { line, .. }
            | Self::InvalidParameter { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found, line } => write!(f,
                                                                      "Error on line {line}: expected next token to be `{expected}`, got `{found}` instead."),
            Self::NoPrefixParse { token, line } => {
                write!(f, "Error on line {line}: no prefix parse function for `{token}` found.")
            },
            Self::IllegalToken { literal, line } => {
                write!(f, "Error on line {line}: illegal token `{literal}`.")
            },
            Self::InvalidNumber { literal, line } => {
                write!(f, "Error on line {line}: could not parse `{literal}` as a number.")
            },
            Self::InvalidEscape { line } => {
                write!(f, "Error on line {line}: invalid escape sequence in string.")
            },
            Self::UnterminatedString { line } => {
                write!(f, "Error on line {line}: unterminated string.")
            },
            Self::UnterminatedComment { line } => {
                write!(f, "Error on line {line}: unterminated block comment.")
            },
            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: unexpected end of input.")
            },
            Self::NestedTooDeeply { line } => {
                write!(f, "Error on line {line}: expressions nested too deeply.")
            },
            Self::InvalidAssignmentTarget { target, line } => {
                write!(f, "Error on line {line}: cannot assign to `{target}`.")
            },
            Self::InvalidIncrementTarget { target, line } => write!(f,
                                                                    "Error on line {line}: `{target}` cannot be incremented or decremented."),
            Self::InvalidParameter { token, line } => {
                write!(f, "Error on line {line}: unexpected `{token}` in parameter list.")
            },
        }
    }
}

impl std::error::Error for ParseError {}

/// Every error collected while parsing one program.
///
/// The parser does not stop at the first mistake, so a failed parse reports
/// all of them together, one per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    /// Returns `true` if no error was collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}
