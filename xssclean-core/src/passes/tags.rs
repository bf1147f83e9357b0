use super::{FixedPoint, until_stable};
use crate::tables::{IMAGE_EXTRA_TOKEN, LINK_EXTRA_TOKEN, REMOVED, url_value_pattern};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a\s+([^>]*?)(>|$)").unwrap());

static IMAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<img\s+([^>]*?)(\s?/?>|$)").unwrap());

static SCRIPT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(/*)(script|xss)(.*?)>").unwrap());

static LINK_DANGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&url_value_pattern(LINK_EXTRA_TOKEN)).unwrap());

static IMAGE_DANGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&url_value_pattern(IMAGE_EXTRA_TOKEN)).unwrap());

static ATTRIBUTE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s*([a-z\-]+)\s*=\s*("[^"]*"|'[^']*'|[^\s"'<>`]+)"#).unwrap()
});

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// A `name=value` pair kept by [`attribute_pairs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePair {
    /// The pair as written, leading whitespace included, comments removed
    pub raw: String,
    /// Lowercased attribute name
    pub name: String,
    /// Value without its surrounding quotes
    pub value: String,
}

/// Well-formed attribute pairs of a tag fragment.
///
/// Values may be double-quoted, single-quoted or unquoted; bare attributes
/// and malformed fragments are dropped. `/* */` comments are removed so
/// they cannot split a keyword.
pub fn attribute_pairs(fragment: &str) -> Vec<AttributePair> {
    ATTRIBUTE_PAIR
        .captures_iter(fragment)
        .map(|caps| {
            let value = COMMENT.replace_all(&caps[2], "");
            AttributePair {
                raw: COMMENT.replace_all(&caps[0], "").into_owned(),
                name: caps[1].to_ascii_lowercase(),
                value: unquote(&value).to_string(),
            }
        })
        .collect()
}

/// Concatenation of the well-formed pairs in `fragment`.
pub fn filter_attributes(fragment: &str) -> String {
    attribute_pairs(fragment)
        .into_iter()
        .map(|pair| pair.raw)
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Rewrite the attributes of every `tag` match, dropping malformed
/// fragments and the `target` attribute when its value looks dangerous.
fn scrub_tag(input: &str, tag: &Regex, target: &str, danger: &Regex) -> String {
    tag.replace_all(input, |caps: &Captures| {
        let whole = &caps[0];
        let (Some(outer), Some(inner)) = (caps.get(0), caps.get(1)) else {
            return whole.to_string();
        };
        if inner.as_str().is_empty() {
            return whole.to_string();
        }

        let fragment = inner.as_str().replace(|c: char| c == '<' || c == '>', "");
        let kept: String = attribute_pairs(&fragment)
            .into_iter()
            .filter(|pair| !(pair.name == target && danger.is_match(&pair.value)))
            .map(|pair| pair.raw)
            .collect();

        let start = inner.start() - outer.start();
        let end = inner.end() - outer.start();
        format!("{}{}{}", &whole[..start], kept, &whole[end..])
    })
    .into_owned()
}

fn replace_link_tags(input: &str) -> String {
    scrub_tag(input, &LINK_TAG, "href", &LINK_DANGER)
}

fn replace_image_tags(input: &str) -> String {
    scrub_tag(input, &IMAGE_TAG, "src", &IMAGE_DANGER)
}

fn replace_script_tags(input: &str) -> String {
    SCRIPT_TAG.replace_all(input, REMOVED).into_owned()
}

/// One round of link, image and script tag scrubbing.
fn scrub_round(input: &str) -> String {
    let next = replace_link_tags(input);
    let next = replace_image_tags(&next);
    replace_script_tags(&next)
}

fn settle_disallowed_tags(input: &str, max_passes: usize) -> FixedPoint {
    until_stable(input.to_string(), max_passes, |s| Some(scrub_round(s)))
}

/// Scrub `<a>`, `<img>` and `<script>`/`<xss>` tags until nothing changes.
///
/// Removing one malformed tag can reveal another, so whole rounds repeat
/// until one leaves the input as it was, at most `max_passes` times.
pub fn remove_disallowed_tags(input: &str, max_passes: usize) -> String {
    settle_disallowed_tags(input, max_passes).into_value("disallowed_tags")
}
