#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents the errors raised while registering extensions.
pub enum RegistryError {
    /// An extension with this name was already registered.
    AlreadyDefined {
        /// The name of the extension.
        name: String,
    },
    /// The name is not a valid identifier.
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// The declared bounds or argument types do not agree.
    InvalidArity {
        /// The name of the extension.
        name:    String,
        /// What is inconsistent.
        details: String,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyDefined { name } => write!(f, "extension {name} already defined"),
            Self::InvalidName { name } => write!(f, "invalid extension name {name:?}"),
            Self::InvalidArity { name, details } => {
                write!(f, "invalid arity for extension {name}: {details}")
            },
        }
    }
}

impl std::error::Error for RegistryError {}
