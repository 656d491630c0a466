// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Value outside its permitted range
    OutOfRange(String),
    /// Configuration could not be loaded or is inconsistent
    ConfigFail(String),
    /// File system operation failed
    FsFail(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
