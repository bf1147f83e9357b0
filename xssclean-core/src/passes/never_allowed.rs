use crate::tables::{NEVER_ALLOWED_REGEX, NEVER_ALLOWED_STR, REMOVED};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static NEVER_ALLOWED: Lazy<Vec<Regex>> = Lazy::new(|| {
    NEVER_ALLOWED_REGEX
        .iter()
        .map(|source| Regex::new(&format!("(?is){source}")).unwrap())
        .collect()
});

// The closing quote is matched by hand, see `strip_base64_data_uris`.
static BASE64_DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)(["'])?data\s*:.*?base64.*?,"#).unwrap());

/// Replace strings and patterns that are never allowed anywhere.
pub fn never_allowed(input: &str) -> String {
    let mut out = input.to_string();

    for (needle, replacement) in NEVER_ALLOWED_STR {
        if out.contains(needle) {
            out = out.replace(needle, replacement);
        }
    }

    for pattern in NEVER_ALLOWED.iter() {
        if let Cow::Owned(replaced) = pattern.replace_all(&out, REMOVED) {
            out = replaced;
        }
    }

    strip_base64_data_uris(&out)
}

/// `data:...base64,` URIs, together with the closing quote when it directly
/// follows the comma and matches the opening one.
fn strip_base64_data_uris(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    while let Some(caps) = BASE64_DATA_URI.captures_at(input, last) {
        let Some(found) = caps.get(0) else { break };
        let mut end = found.end();
        if let Some(quote) = caps.get(1) {
            if input[end..].starts_with(quote.as_str()) {
                end += quote.len();
            }
        }
        out.push_str(&input[last..found.start()]);
        out.push_str(REMOVED);
        last = end;
    }

    out.push_str(&input[last..]);
    out
}
