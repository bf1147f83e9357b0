// xssclean - Multi-pass XSS input filter
//
// This library scrubs untrusted request data before it reaches templates,
// storage or logs. Text is normalized and then filtered against fixed
// denylists; image uploads get a clean/dirty verdict instead.

// Re-export core functionality
pub use xssclean_core::*;

// Re-export the JSON value type accepted by `XssSanitizer::clean`
pub use serde_json::{Map, Value};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CleanMode,
        Cleaned,
        CleansePolicy,
        Map,
        Result,
        Value,
        XssConfig,
        XssError,
        XssSanitizer,
    };
}
