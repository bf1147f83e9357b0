use crate::mode::CleanMode;
use crate::tables::EXPLODED_WORDS;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static PHP_OPEN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\?(php)").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// One pattern per keyword: its letters with optional whitespace in between,
// followed by a non-word character so "dealer to" never becomes "dealerto".
static EXPLODED: Lazy<Vec<Regex>> = Lazy::new(|| {
    EXPLODED_WORDS
        .iter()
        .map(|word| {
            let letters: Vec<String> = word
                .chars()
                .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
                .collect();
            Regex::new(&format!(r"(?is)({})(\W)", letters.join(r"\s*"))).unwrap()
        })
        .collect()
});

/// Tabs become spaces so `ja\tvascript` is caught by the word compactor.
pub fn convert_tabs(input: &str) -> String {
    if input.contains('\t') {
        input.replace('\t', " ")
    } else {
        input.to_string()
    }
}

/// Escape PHP tags. Images only get `<?php` escaped because binary data
/// routinely contains `<?` and `?>` byte pairs.
pub fn replace_php_tags(input: &str, mode: CleanMode) -> String {
    match mode {
        CleanMode::Image => PHP_OPEN_TAG.replace_all(input, "&lt;?${1}").into_owned(),
        CleanMode::Text => input.replace("<?", "&lt;?").replace("?>", "?&gt;"),
    }
}

/// Collapse keywords written with whitespace between their letters
/// (`j a v a s c r i p t`).
pub fn compact_exploded_words(input: &str) -> String {
    let mut out = input.to_string();

    for pattern in EXPLODED.iter() {
        let compacted = pattern.replace_all(&out, |caps: &Captures| {
            format!("{}{}", WHITESPACE.replace_all(&caps[1], ""), &caps[2])
        });
        if let Cow::Owned(compacted) = compacted {
            out = compacted;
        }
    }

    out
}
