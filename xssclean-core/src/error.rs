use thiserror::Error;

/// Errors raised at the fallible edges of the sanitizer.
///
/// The filter pipeline itself never fails; these cover configuration and
/// JSON documents handed to [`crate::XssSanitizer::clean_json`].
#[derive(Error, Debug)]
pub enum XssError {
    #[error("Invalid sanitizer configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl XssError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, XssError>;
