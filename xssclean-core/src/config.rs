//! Sanitizer configuration

use crate::error::{Result, XssError};
use serde::{Deserialize, Serialize};

/// Default cap on rounds for every fixed-point pass.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Default cap on container nesting walked by the recursive cleaner.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// XSS filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XssConfig {
    /// Maximum rounds for the iterating passes (invisible characters,
    /// tag scrubbing, evil attributes) before the best-effort result is kept
    pub max_passes: usize,

    /// Maximum nesting depth of objects and arrays; deeper subtrees are
    /// replaced with `null`
    pub max_depth: usize,

    /// Clean every retrieved input unless a call explicitly opts out
    pub filter_all_inputs: bool,
}

impl XssConfig {
    pub fn new() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            max_depth: DEFAULT_MAX_DEPTH,
            filter_all_inputs: false,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_filter_all_inputs(mut self, enable: bool) -> Self {
        self.filter_all_inputs = enable;
        self
    }

    /// Reject caps that would disable the iterating passes.
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(XssError::config("max_passes must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(XssError::config("max_depth must be at least 1"));
        }
        Ok(())
    }

    /// Cleanse policy derived from this configuration.
    pub fn policy(&self) -> CleansePolicy {
        CleansePolicy::new(self.filter_all_inputs)
    }
}

impl Default for XssConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides whether a retrieved input should go through the filter.
///
/// An explicit per-call flag always wins; without one the global
/// `filter_all_inputs` setting applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleansePolicy {
    filter_all_inputs: bool,
}

impl CleansePolicy {
    pub fn new(filter_all_inputs: bool) -> Self {
        Self { filter_all_inputs }
    }

    pub fn should_clean(&self, explicit: Option<bool>) -> bool {
        explicit.unwrap_or(self.filter_all_inputs)
    }
}
