//! Fuzz target for the XSS sanitizer.
//!
//! Feeds arbitrary text, bytes and nested JSON through every entry point.
//! The filter must never panic, whatever caps it is configured with.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};
use xssclean_core::{CleanMode, XssConfig, XssSanitizer};

/// Arbitrary JSON-like tree for fuzzing.
#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<FuzzValue>),
    Object(Vec<(String, FuzzValue)>),
}

impl FuzzValue {
    fn into_json(self) -> Value {
        match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Number(n) => Value::from(n),
            FuzzValue::Text(s) => Value::String(s),
            FuzzValue::List(items) => {
                Value::Array(items.into_iter().map(FuzzValue::into_json).collect())
            }
            FuzzValue::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Arbitrary sanitizer input for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Untrusted text
    text: String,
    /// Raw upload bytes
    bytes: Vec<u8>,
    /// Structured request data
    value: FuzzValue,
    /// Small caps so deep or slow inputs hit the limits
    max_passes: u8,
    max_depth: u8,
}

fuzz_target!(|data: FuzzInput| {
    let config = XssConfig::new()
        .with_max_passes(usize::from(data.max_passes).max(1))
        .with_max_depth(usize::from(data.max_depth).max(1));
    let Ok(sanitizer) = XssSanitizer::with_config(config) else {
        return;
    };

    // Test 1: Text mode scalar pipeline
    let _ = sanitizer.clean_str(&data.text);

    // Test 2: Image mode over text and raw bytes
    let _ = sanitizer.is_clean(&data.text);
    let _ = sanitizer.is_image_clean(&data.bytes);

    // Test 3: Structured input in both modes
    let value = data.value.into_json();
    let _ = sanitizer.clean(value.clone(), CleanMode::Image);
    let cleaned = sanitizer.clean_value(value);

    // Test 4: JSON documents, valid or not
    if let Ok(json) = std::str::from_utf8(&data.bytes) {
        let _ = sanitizer.clean_json(json);
    }
    let _ = sanitizer.clean_json(&cleaned.to_string());
});
