use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an input is being filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanMode {
    /// Untrusted text; the cleaned value is returned
    #[default]
    Text,
    /// Uploaded image payload; only a verdict is returned. PHP short tags
    /// and `xmlns` attributes are tolerated since image metadata carries them.
    Image,
}

impl CleanMode {
    pub fn is_image(&self) -> bool {
        matches!(self, CleanMode::Image)
    }
}

impl From<bool> for CleanMode {
    fn from(is_image: bool) -> Self {
        if is_image {
            CleanMode::Image
        } else {
            CleanMode::Text
        }
    }
}

/// Result of [`crate::XssSanitizer::clean`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cleaned {
    /// Text mode: the input with every string leaf filtered
    Value(Value),
    /// Image mode: `true` when filtering found nothing to remove
    Verdict(bool),
}

impl Cleaned {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Cleaned::Value(value) => Some(value),
            Cleaned::Verdict(_) => None,
        }
    }

    pub fn verdict(&self) -> Option<bool> {
        match self {
            Cleaned::Verdict(clean) => Some(*clean),
            Cleaned::Value(_) => None,
        }
    }
}
