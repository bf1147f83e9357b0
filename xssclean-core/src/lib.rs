//! # xssclean core
//!
//! Multi-pass XSS input filter for untrusted request data.
//!
//! ## Features
//!
//! - ✅ **Normalization** - Control characters, entities, percent escapes and tabs
//! - ✅ **Denylist Scrubbing** - Never-allowed strings, evil attributes, naughty elements
//! - ✅ **Tag Neutralization** - Dangerous `href`/`src` values and script tags removed
//! - ✅ **Image Mode** - Boolean verdict for uploaded image payloads
//! - ✅ **Structured Input** - Recursive cleaning of JSON values, shape preserved
//! - ✅ **Bounded** - Every fixed-point pass and the recursion depth are capped
//!
//! ## Quick Start
//!
//! ```rust
//! use xssclean_core::XssSanitizer;
//!
//! let sanitizer = XssSanitizer::new();
//!
//! let clean = sanitizer.clean_str("<script>alert(1)</script>");
//! assert_eq!(clean, "[removed]alert&#40;1&#41;[removed]");
//!
//! // Plain text is left alone
//! assert_eq!(sanitizer.clean_str("hello world"), "hello world");
//! ```
//!
//! ## Structured Input
//!
//! ```rust
//! use serde_json::json;
//! use xssclean_core::{CleanMode, XssSanitizer};
//!
//! let sanitizer = XssSanitizer::new();
//! let form = json!({ "comment": "x=document.cookie", "page": 2 });
//!
//! let cleaned = sanitizer.clean(form, CleanMode::Text).into_value().unwrap();
//! assert_eq!(cleaned, json!({ "comment": "x=[removed]", "page": 2 }));
//! ```
//!
//! ## Image Uploads
//!
//! ```rust
//! use xssclean_core::XssSanitizer;
//!
//! let sanitizer = XssSanitizer::new();
//!
//! assert!(sanitizer.is_image_clean(b"GIF89a\x01\x00\x01\x00"));
//! assert!(!sanitizer.is_image_clean(b"GIF89a<?php system($_GET['c']); ?>"));
//! ```
//!
//! ## Cleanse Policy
//!
//! ```rust
//! use serde_json::json;
//! use xssclean_core::{XssConfig, XssSanitizer};
//!
//! let config = XssConfig::new().with_filter_all_inputs(true);
//! let sanitizer = XssSanitizer::with_config(config).unwrap();
//!
//! // Global policy applies unless the caller overrides it
//! assert_eq!(sanitizer.clean_if(json!("<xss>"), None), json!("[removed]"));
//! assert_eq!(sanitizer.clean_if(json!("<xss>"), Some(false)), json!("<xss>"));
//! ```

pub mod config;
pub mod error;
pub mod mode;
pub mod passes;
pub mod sanitizer;
pub mod tables;

pub use config::{CleansePolicy, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PASSES, XssConfig};
pub use error::{Result, XssError};
pub use mode::{CleanMode, Cleaned};
pub use sanitizer::XssSanitizer;
