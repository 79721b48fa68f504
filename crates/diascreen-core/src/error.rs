//! Error types for DiaScreen

use std::fmt;

/// Result type alias using DiaScreen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for DiaScreen operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or out-of-range input fields
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Classifier or threshold could not be loaded
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Degenerate derived feature or classifier output
    #[error("computation error: {0}")]
    Computation(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new model-unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a new computation error
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// The constraint a single field violated
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Field absent from the input
    Missing,

    /// Field present with the wrong JSON type
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// Numeric field outside its exclusive bounds
    OutOfRange { lower: f64, upper: f64 },

    /// Enumerated field with a value outside the allowed set
    NotAllowed { allowed: &'static [&'static str] },
}

impl Violation {
    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::WrongType { .. } => "wrong_type",
            Self::OutOfRange { .. } => "out_of_range",
            Self::NotAllowed { .. } => "not_allowed",
        }
    }
}

/// A violation attributed to a named input field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    field: &'static str,
    violation: Violation,
}

impl FieldError {
    pub fn new(field: &'static str, violation: Violation) -> Self {
        Self { field, violation }
    }

    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn violation(&self) -> &Violation {
        &self.violation
    }

    /// Human-readable description of the violated constraint
    pub fn constraint(&self) -> String {
        match &self.violation {
            Violation::Missing => "field is required".to_string(),
            Violation::WrongType { expected, found } => {
                format!("expected {}, got {}", expected, found)
            }
            Violation::OutOfRange { lower, upper } => {
                format!("must satisfy {} < {} < {}", lower, self.field, upper)
            }
            Violation::NotAllowed { allowed } => {
                let quoted: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
                format!("must be one of {}", quoted.join(", "))
            }
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint())
    }
}

/// All field violations found in one input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection holding one violation
    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn push(&mut self, field: &'static str, violation: Violation) {
        self.errors.push(FieldError::new(field, violation));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any violation names the given field
    pub fn contains_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
