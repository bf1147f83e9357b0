use super::until_stable;
use once_cell::sync::Lazy;
use regex::Regex;

// %00-%08, %0B, %0C, %0E, %0F, %10-%1F
static URL_ENCODED_CONTROLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)%0[0-8bcef]|%1[0-9a-f]").unwrap());

// Every control character except tab, newline and carriage return, plus DEL.
static RAW_CONTROLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]+").unwrap());

/// Strip control characters so they cannot be spliced into keywords
/// (`java\0script`).
///
/// Runs until nothing is removed, since removing `%%0000` style sequences
/// can expose a new encoded control character.
pub fn remove_invisible_characters(input: &str, url_encoded: bool, max_passes: usize) -> String {
    until_stable(input.to_string(), max_passes, |s| {
        let mut next = s.to_string();
        if url_encoded {
            next = URL_ENCODED_CONTROLS.replace_all(&next, "").into_owned();
        }
        next = RAW_CONTROLS.replace_all(&next, "").into_owned();
        (next != s).then_some(next)
    })
    .into_value("invisible_characters")
}
