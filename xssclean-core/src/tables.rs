//! Fixed threat catalogue consulted by the filter passes.
//!
//! Regex entries are pattern sources; the passes compile them once.

/// Replacement marker for removed content.
pub const REMOVED: &str = "[removed]";

/// Literal substrings that are never allowed, with their replacement.
/// Applied in order.
pub const NEVER_ALLOWED_STR: &[(&str, &str)] = &[
    ("document.cookie", REMOVED),
    ("document.write", REMOVED),
    (".parentNode", REMOVED),
    (".innerHTML", REMOVED),
    ("window.location", REMOVED),
    ("-moz-binding", REMOVED),
    ("<!--", "&lt;!--"),
    ("-->", "--&gt;"),
    ("<![CDATA[", "&lt;![CDATA["),
    ("<comment>", "&lt;comment&gt;"),
];

/// Case-insensitive patterns replaced with [`REMOVED`]. The base64 data URI
/// rule needs a closing-quote check and lives in the pass itself.
pub const NEVER_ALLOWED_REGEX: &[&str] = &[
    r"javascript\s*:",
    r"expression\s*(\(|&#40;)",
    r"vbscript\s*:",
    r"Redirect\s+302",
];

/// Attribute names stripped from every tag. `on\w*` covers all event handlers.
pub const EVIL_ATTRIBUTES: &[&str] = &[r"on\w*", "style", "xmlns", "formaction"];

/// Attributes tolerated in image mode (XMP metadata uses namespaces).
pub const IMAGE_SAFE_ATTRIBUTES: &[&str] = &["xmlns"];

/// Elements whose tags get their angle brackets entity-encoded.
pub const NAUGHTY_ELEMENTS: &[&str] = &[
    "alert",
    "applet",
    "audio",
    "basefont",
    "base",
    "behavior",
    "bgsound",
    "blink",
    "body",
    "embed",
    "expression",
    "form",
    "frameset",
    "frame",
    "head",
    "html",
    "ilayer",
    "iframe",
    "input",
    "isindex",
    "layer",
    "link",
    "meta",
    "object",
    "plaintext",
    "style",
    "script",
    "textarea",
    "title",
    "video",
    "xml",
    "xss",
];

/// Function names whose call parentheses get entity-encoded.
pub const DANGEROUS_FUNCTIONS: &[&str] = &[
    "alert",
    "cmd",
    "passthru",
    "eval",
    "exec",
    "expression",
    "system",
    "fopen",
    "fsockopen",
    "file",
    "file_get_contents",
    "readfile",
    "unlink",
];

/// Keywords re-compacted when split up by whitespace.
pub const EXPLODED_WORDS: &[&str] = &[
    "javascript",
    "expression",
    "vbscript",
    "script",
    "base64",
    "applet",
    "alert",
    "document",
    "write",
    "cookie",
    "window",
];

/// Tokens shared by the `href` and `src` checks.
const URL_VALUE_TOKENS: &[&str] = &[
    r"alert\(",
    r"alert&#40;",
    r"javascript:",
    r"livescript:",
    r"mocha:",
    r"charset=",
    r"window\.",
    r"document\.",
    r"\.cookie",
    r"<script",
    r"<xss",
];

/// Build the dangerous-value alternation for a link (`data:`) or an image
/// (`base64,`).
pub fn url_value_pattern(extra: &str) -> String {
    let mut tokens: Vec<&str> = URL_VALUE_TOKENS.to_vec();
    tokens.push(extra);
    format!(r"(?is)(?:{})", tokens.join("|"))
}

/// Extra token for `<a href>` values.
pub const LINK_EXTRA_TOKEN: &str = r"data\s*:";

/// Extra token for `<img src>` values.
pub const IMAGE_EXTRA_TOKEN: &str = r"base64\s*,";

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_patterns_compile() {
        for source in NEVER_ALLOWED_REGEX {
            assert!(Regex::new(source).is_ok(), "{source}");
        }
        assert!(Regex::new(&url_value_pattern(LINK_EXTRA_TOKEN)).is_ok());
        assert!(Regex::new(&url_value_pattern(IMAGE_EXTRA_TOKEN)).is_ok());
    }

    #[test]
    fn test_image_safe_attributes_are_evil_in_text() {
        for name in IMAGE_SAFE_ATTRIBUTES {
            assert!(EVIL_ATTRIBUTES.contains(name));
        }
    }
}
