use crate::tables::{DANGEROUS_FUNCTIONS, NAUGHTY_ELEMENTS};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NAUGHTY_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)<(/*\s*)({})([^><]*)([><]*)",
        NAUGHTY_ELEMENTS.join("|")
    ))
    .unwrap()
});

static FUNCTION_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)({})(\s*)\((.*?)\)",
        DANGEROUS_FUNCTIONS.join("|")
    ))
    .unwrap()
});

/// Entity-encode the brackets of naughty element tags: `<blink>` becomes
/// `&lt;blink&gt;`.
///
/// Trailing brackets are encoded too so `<<` sequences cannot rebuild a tag.
pub fn sanitize_naughty_html(input: &str) -> String {
    NAUGHTY_TAG
        .replace_all(input, |caps: &Captures| {
            let mut out = format!("&lt;{}{}{}", &caps[1], &caps[2], &caps[3]);
            for c in caps[4].chars() {
                match c {
                    '>' => out.push_str("&gt;"),
                    _ => out.push_str("&lt;"),
                }
            }
            out
        })
        .into_owned()
}

/// Neutralise calls to dangerous functions by encoding their parentheses:
/// `eval('x')` becomes `eval&#40;'x'&#41;`.
pub fn sanitize_scripts(input: &str) -> String {
    FUNCTION_CALL
        .replace_all(input, "${1}${2}&#40;${3}&#41;")
        .into_owned()
}
