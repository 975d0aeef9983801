use std::fmt;

/// Raised when space parameters, sample sizes or index bounds are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ValidationError: {}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Raised when the space cannot be written out. The underlying
/// `ValidationError` or `std::io::Error` stays reachable through `source()`.
#[derive(Debug)]
pub struct MaterializeError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl MaterializeError {
    pub fn with_source<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message,
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for MaterializeError {
    fn from(e: std::io::Error) -> Self {
        MaterializeError::with_source(format!("I/O error: {}", e), e)
    }
}

impl From<ValidationError> for MaterializeError {
    fn from(e: ValidationError) -> Self {
        MaterializeError::with_source(e.to_string(), e)
    }
}

impl fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MaterializeError: {}", self.message)
    }
}

impl std::error::Error for MaterializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Raised when a space profile cannot be read or parsed.
#[derive(Debug)]
pub struct ProfileError {
    message: String,
}

impl ProfileError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(e: std::io::Error) -> Self {
        ProfileError {
            message: format!("I/O error: {}", e),
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ProfileError: {}", self.message)
    }
}

impl std::error::Error for ProfileError {}
