use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};
use std::time::{SystemTime, UNIX_EPOCH};

// `&name=value` query pairs; protected so they are not read as entities.
static QUERY_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&([a-z_0-9\-]+)=([a-z_0-9\-]+)").unwrap());

static NAMED_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(&#?[0-9a-z]{2,})([\x00-\x20])*;?").unwrap());

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(&#x?)([0-9a-f]+);?").unwrap());

static QUOTED_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)[a-z]+=(?:"[^"]*"|'[^']*')"#).unwrap());

// A tag opener runs to the next angle bracket or the end of input.
static TAG_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\w+[^<>]*").unwrap());

static PERCENT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:%[0-9A-Fa-f]{2})+").unwrap());

static BARE_HEX_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&#x(0*[0-9a-f]{2,5})").unwrap());

static BARE_DECIMAL_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#([0-9]{2,4})").unwrap());

/// Per-call placeholder for the `&` of protected query pairs.
fn query_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let salt: u64 = rand::thread_rng().gen_range(0..2_000_000_000);
    format!("xss{nanos:x}{salt:x}")
}

/// Add the missing `;` to entities so they can be decoded later, leaving
/// `&key=value` query pairs untouched.
pub fn validate_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let token = query_token();
    let protected = QUERY_PAIR.replace_all(input, format!("{token}${{1}}=${{2}}").as_str());
    let terminated = NAMED_ENTITY.replace_all(&protected, "${1};${2}");
    let terminated = NUMERIC_ENTITY.replace_all(&terminated, "${1}${2};");

    terminated.replace(&token, "&")
}

/// Raw percent-decoding: `+` stays a plus sign.
///
/// Escapes are decoded run by run; bytes that do not form valid UTF-8 keep
/// their original `%XX` text while the rest of the run is still decoded.
pub fn url_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }
    PERCENT_RUN
        .replace_all(input, |caps: &Captures| decode_escapes(&caps[0]))
        .into_owned()
}

/// Decode a run made only of `%XX` escapes.
fn decode_escapes(run: &str) -> String {
    let bytes = urlencoding::decode_binary(run.as_bytes());
    let mut out = String::with_capacity(run.len());
    let mut offset = 0;

    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        offset += chunk.valid().len();
        let invalid = chunk.invalid().len();
        // every decoded byte came from exactly three characters of `run`
        out.push_str(&run[offset * 3..(offset + invalid) * 3]);
        offset += invalid;
    }

    out
}

/// Decode entities inside tags so the later passes see the real payload.
///
/// Brackets and backslashes inside quoted attribute values are escaped
/// first, so characters decoded there cannot forge tag boundaries. Entities
/// in free text are left alone.
pub fn convert_to_ascii(input: &str) -> String {
    let escaped = QUOTED_ATTRIBUTE.replace_all(input, |caps: &Captures| {
        let mut out = String::with_capacity(caps[0].len());
        for c in caps[0].chars() {
            match c {
                '>' => out.push_str("&gt;"),
                '<' => out.push_str("&lt;"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out
    });

    TAG_OPENER
        .replace_all(&escaped, |caps: &Captures| entity_decode(&caps[0]))
        .into_owned()
}

/// Entity decoder that also accepts numeric references without the
/// terminating semicolon, as browsers do.
pub fn entity_decode(fragment: &str) -> String {
    if !fragment.contains('&') {
        return fragment.to_string();
    }

    let decoded = html_escape::decode_html_entities(fragment);
    let decoded = BARE_HEX_ENTITY.replace_all(&decoded, |caps: &Captures| {
        decode_code_point(&caps[0], &caps[1], 16)
    });
    let decoded = BARE_DECIMAL_ENTITY.replace_all(&decoded, |caps: &Captures| {
        decode_code_point(&caps[0], &caps[1], 10)
    });

    decoded.into_owned()
}

fn decode_code_point(whole: &str, digits: &str, radix: u32) -> String {
    match u32::from_str_radix(digits, radix).ok().and_then(char::from_u32) {
        Some(c) => c.to_string(),
        None => whole.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_semicolons_added() {
        assert_eq!(validate_entities("&#60"), "&#60;");
        assert_eq!(validate_entities("&#x3C"), "&#x3C;");
        assert_eq!(validate_entities("a &lt b"), "a &lt; b");
    }

    #[test]
    fn test_well_formed_entities_unchanged() {
        let input = "&lt;p&gt; &amp; &#60; &#x3C;";
        assert_eq!(validate_entities(input), input);
    }

    #[test]
    fn test_query_pairs_protected() {
        let url = "http://example.com/?a=1&copy=2&lang=en";
        assert_eq!(validate_entities(url), url);
    }

    #[test]
    fn test_url_decode_keeps_plus() {
        assert_eq!(url_decode("a+b%20c%3Cd"), "a+b c<d");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_url_decode_multibyte() {
        assert_eq!(url_decode("caf%C3%A9"), "caf\u{e9}");
    }

    #[test]
    fn test_url_decode_invalid_bytes_kept_as_escapes() {
        assert_eq!(url_decode("%FF%FE"), "%FF%FE");
        assert_eq!(url_decode("%3Cscript%3E%FF"), "<script>%FF");
        assert_eq!(url_decode("%ff%3C%C3%41"), "%ff<%C3A");
    }

    #[test]
    fn test_url_decode_invalid_escape_does_not_shield_others() {
        assert_eq!(
            url_decode("GIF89a%3C%3Fphp echo 1; %3F%3E%FF"),
            "GIF89a<?php echo 1; ?>%FF"
        );
    }

    #[test]
    fn test_tag_entities_decoded() {
        assert_eq!(
            convert_to_ascii(r#"<a href="&#106;&#97;vascript:x">"#),
            r#"<a href="javascript:x">"#
        );
        assert_eq!(convert_to_ascii("<img src=&#x6A&#x61va>"), "<img src=java>");
    }

    #[test]
    fn test_free_text_entities_kept() {
        let text = "5 &lt; 6 &amp; 7 &#62; 3";
        assert_eq!(convert_to_ascii(text), text);
    }

    #[test]
    fn test_quoted_brackets_do_not_split_tag() {
        // the bracket inside the title must not end the tag before href
        assert_eq!(
            convert_to_ascii(r#"<a title="x>y" href="&#106;s">"#),
            r#"<a title="x>y" href="js">"#
        );
        assert_eq!(convert_to_ascii(r#"<p title="c\d">"#), r#"<p title="c\\d">"#);
    }

    #[test]
    fn test_entity_decode_without_ampersand() {
        assert_eq!(entity_decode("<b class=x"), "<b class=x");
    }

    #[test]
    fn test_invalid_code_point_kept() {
        assert_eq!(decode_code_point("&#xD800", "D800", 16), "&#xD800");
        assert_eq!(decode_code_point("&#60", "60", 10), "<");
    }
}
