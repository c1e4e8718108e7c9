//! Error types for jexpr evaluation

use thiserror::Error;

/// Main error type for evaluation.
///
/// `Clone` is required so a failed [`Deferred`](crate::Deferred) can hand the
/// same error to every awaiter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The head of an application did not evaluate to a callable.
    ///
    /// `head` is the unevaluated head expression, rendered for display.
    #[error("{head} is not a function")]
    NotCallable {
        /// The head expression as written
        head: String,
    },

    /// Type mismatch inside a builtin
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type
        expected: String,
        /// Actual type received
        got: String,
    },

    /// Wrong number of arguments passed to a fixed-arity builtin
    #[error("{name} expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// Builtin name
        name: String,
        /// Declared arity
        expected: usize,
        /// Number of arguments received
        got: usize,
    },

    /// A special form received operands it cannot interpret
    #[error("malformed {keyword}: {message}")]
    MalformedForm {
        /// Keyword of the offending form
        keyword: String,
        /// What was wrong
        message: String,
    },

    /// Evaluation nested deeper than the configured limit
    #[error("evaluation depth {depth} exceeds maximum {max}")]
    DepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// A rule tried to suspend while running in blocking mode
    #[error("evaluation suspended in blocking mode")]
    Suspended,

    /// Value could not be converted (e.g. a closure serialized to JSON)
    #[error("Value error: {0}")]
    ValueError(String),

    /// Error raised by host code; displayed verbatim.
    #[error("{0}")]
    Host(String),
}

impl EvalError {
    /// Create a host error with the given message.
    pub fn host(message: impl Into<String>) -> Self {
        EvalError::Host(message.into())
    }

    /// Create a type error.
    pub fn type_error(expected: impl Into<String>, got: impl Into<String>) -> Self {
        EvalError::TypeError {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a malformed-form error.
    pub fn malformed(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::MalformedForm {
            keyword: keyword.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for jexpr operations
pub type Result<T> = std::result::Result<T, EvalError>;
