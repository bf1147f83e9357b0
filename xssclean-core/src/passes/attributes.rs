use super::until_stable;
use crate::mode::CleanMode;
use crate::tables::{EVIL_ATTRIBUTES, IMAGE_SAFE_ATTRIBUTES};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use tracing::trace;

// Tag name, then everything up to the next bracket outside a quoted value.
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(/?[^\s<>="'/]+)((?:[^<>"']|"[^"]*"|'[^']*')*)"#).unwrap()
});

static TEXT_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| evil_attribute_pattern(CleanMode::Text));
static IMAGE_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| evil_attribute_pattern(CleanMode::Image));

/// `name=value` for every evil name, quoted values tried before unquoted
/// ones so a quoted value is removed whole rather than up to its first space.
fn evil_attribute_pattern(mode: CleanMode) -> Regex {
    let names: Vec<&str> = EVIL_ATTRIBUTES
        .iter()
        .copied()
        .filter(|name| !(mode.is_image() && IMAGE_SAFE_ATTRIBUTES.contains(name)))
        .collect();

    Regex::new(&format!(
        r#"(?is)\b(?:{})\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#,
        names.join("|")
    ))
    .unwrap()
}

fn attributes(mode: CleanMode) -> &'static Regex {
    match mode {
        CleanMode::Text => &TEXT_ATTRIBUTES,
        CleanMode::Image => &IMAGE_ATTRIBUTES,
    }
}

fn strip_round(input: &str, evil: &Regex) -> Option<String> {
    let mut removed = 0usize;
    let out = TAG.replace_all(input, |caps: &Captures| {
        match evil.replace_all(&caps[2], "") {
            Cow::Borrowed(_) => caps[0].to_string(),
            Cow::Owned(rest) => {
                removed += 1;
                format!("<{}{}", &caps[1], rest)
            }
        }
    });

    if removed == 0 {
        return None;
    }
    trace!(tags = removed, "Evil attributes removed");
    Some(out.into_owned())
}

/// Remove event handlers, `style`, `formaction` and (outside image mode)
/// `xmlns` attributes from every tag.
///
/// Values run to the next whitespace or `>` when unquoted, or to the
/// matching quote. Rounds repeat until one removes nothing.
pub fn remove_evil_attributes(input: &str, mode: CleanMode, max_passes: usize) -> String {
    let evil = attributes(mode);
    until_stable(input.to_string(), max_passes, |s| strip_round(s, evil))
        .into_value("evil_attributes")
}
