use crate::config::XssConfig;
use crate::error::Result;
use crate::mode::{CleanMode, Cleaned};
use crate::passes;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Multi-pass XSS input filter.
///
/// Untrusted text is normalized (control characters, entities, percent
/// escapes, tabs) and then scrubbed by a fixed sequence of denylist passes.
/// In image mode no text is returned; instead the sanitizer reports whether
/// the scrubbing passes left the normalized payload untouched.
///
/// The sanitizer holds only its configuration and can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct XssSanitizer {
    config: XssConfig,
}

/// Output of one run of the scalar pipeline.
struct Run {
    /// Input after the normalizing passes, before anything is removed
    converted: String,
    cleaned: String,
}

impl XssSanitizer {
    /// Create a sanitizer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sanitizer with a custom configuration
    pub fn with_config(config: XssConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            max_passes = config.max_passes,
            max_depth = config.max_depth,
            filter_all_inputs = config.filter_all_inputs,
            "XSS sanitizer configured"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &XssConfig {
        &self.config
    }

    /// Filter `value` in the given mode.
    ///
    /// Text mode returns the value with every string leaf cleaned and its
    /// shape preserved. Image mode returns `true` when no string leaf was
    /// altered by the scrubbing passes.
    pub fn clean(&self, value: Value, mode: CleanMode) -> Cleaned {
        match mode {
            CleanMode::Text => Cleaned::Value(self.clean_value(value)),
            CleanMode::Image => Cleaned::Verdict(self.verdict(&value, 0)),
        }
    }

    /// Clean a single string.
    pub fn clean_str(&self, input: &str) -> String {
        self.run(input, CleanMode::Text).cleaned
    }

    /// Clean every string leaf of `value`.
    pub fn clean_value(&self, value: Value) -> Value {
        self.walk(value, 0)
    }

    /// Whether text passes the image-mode check unaltered.
    pub fn is_clean(&self, input: &str) -> bool {
        let run = self.run(input, CleanMode::Image);
        run.converted == run.cleaned
    }

    /// Whether an uploaded image payload is free of script markers.
    ///
    /// Bytes that are not valid UTF-8 are replaced before filtering, so
    /// binary data does not by itself fail the check.
    pub fn is_image_clean(&self, data: &[u8]) -> bool {
        self.is_clean(&String::from_utf8_lossy(data))
    }

    /// Parse a JSON document, clean its string leaves and serialize it again.
    pub fn clean_json(&self, json: &str) -> Result<String> {
        let value: Value = serde_json::from_str(json)?;
        Ok(serde_json::to_string(&self.clean_value(value))?)
    }

    /// Clean `value` if the cleanse policy asks for it.
    ///
    /// `explicit` overrides the configured `filter_all_inputs` flag.
    pub fn clean_if(&self, value: Value, explicit: Option<bool>) -> Value {
        if self.config.policy().should_clean(explicit) {
            self.clean_value(value)
        } else {
            value
        }
    }

    /// Apply [`clean_if`](Self::clean_if) to every entry of an input map.
    pub fn clean_all(&self, inputs: Map<String, Value>, explicit: Option<bool>) -> Map<String, Value> {
        if !self.config.policy().should_clean(explicit) {
            return inputs;
        }
        inputs
            .into_iter()
            .map(|(key, value)| (key, self.clean_value(value)))
            .collect()
    }

    fn walk(&self, value: Value, depth: usize) -> Value {
        match value {
            Value::String(s) => Value::String(self.clean_str(&s)),
            Value::Array(_) | Value::Object(_) if depth >= self.config.max_depth => {
                warn!(depth, "Input nested too deeply; subtree dropped");
                Value::Null
            }
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.walk(item, depth + 1))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, self.walk(item, depth + 1)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn verdict(&self, value: &Value, depth: usize) -> bool {
        match value {
            Value::String(s) => self.is_clean(s),
            Value::Array(_) | Value::Object(_) if depth >= self.config.max_depth => {
                warn!(depth, "Input nested too deeply; rejecting payload");
                false
            }
            Value::Array(items) => items.iter().all(|item| self.verdict(item, depth + 1)),
            Value::Object(map) => map.values().all(|item| self.verdict(item, depth + 1)),
            _ => true,
        }
    }

    fn run(&self, input: &str, mode: CleanMode) -> Run {
        let max_passes = self.config.max_passes;

        let s = passes::remove_invisible_characters(input, true, max_passes);
        let s = passes::validate_entities(&s);
        let s = passes::url_decode(&s);
        let s = passes::convert_to_ascii(&s);
        let s = passes::remove_invisible_characters(&s, true, max_passes);
        let converted = passes::convert_tabs(&s);
        trace!(len = converted.len(), "Input normalized");

        let s = passes::never_allowed(&converted);
        let s = passes::replace_php_tags(&s, mode);
        let s = passes::compact_exploded_words(&s);
        let s = passes::remove_disallowed_tags(&s, max_passes);
        let s = passes::remove_evil_attributes(&s, mode, max_passes);
        let s = passes::sanitize_naughty_html(&s);
        let s = passes::sanitize_scripts(&s);
        let cleaned = passes::never_allowed(&s);

        if cleaned != converted {
            debug!(
                ?mode,
                before = converted.len(),
                after = cleaned.len(),
                "Input altered by XSS filter"
            );
        }

        Run { converted, cleaned }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clean(input: &str) -> String {
        XssSanitizer::new().clean_str(input)
    }

    #[test]
    fn test_script_tags_removed() {
        assert_eq!(
            clean("<script>alert(1)</script>"),
            "[removed]alert&#40;1&#41;[removed]"
        );
        let out = clean(r#"<SCRIPT type="text/javascript">go()</ScRiPt>"#);
        assert!(out.starts_with("[removed]go()"));
        assert!(!out.to_lowercase().contains("<script"));
    }

    #[test]
    fn test_document_cookie_removed() {
        assert_eq!(clean("x=document.cookie"), "x=[removed]");
        assert_eq!(clean("document.write('a')"), "[removed]('a')");
    }

    #[test]
    fn test_tab_split_javascript() {
        let input = "ja\tva\tscript:alert('x')";
        let out = clean(input);
        assert_ne!(out, input);
        assert_eq!(out, "[removed]alert&#40;'x'&#41;");
    }

    #[test]
    fn test_javascript_link() {
        assert_eq!(clean(r#"<a href="javascript:alert(1)">x</a>"#), "<a >x</a>");
    }

    #[test]
    fn test_onerror_removed_src_kept() {
        assert_eq!(clean("<img src=xss.png onerror=alert(1)>"), "<img src=xss.png >");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "hello world, dealer to dealer";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_encoded_attacks() {
        assert_eq!(
            clean(r#"<a href="&#106;avascript:alert(1)">x</a>"#),
            "<a >x</a>"
        );
        assert_eq!(
            clean("%3Cscript%3Ealert(1)%3C/script%3E"),
            "[removed]alert&#40;1&#41;[removed]"
        );
        assert_eq!(clean("java\0script:alert(1)"), "[removed]alert&#40;1&#41;");
        assert_eq!(clean("java%00script:alert(1)"), "[removed]alert&#40;1&#41;");
    }

    #[test]
    fn test_invalid_escape_does_not_hide_payload() {
        assert_eq!(
            clean("%3Cscript%3Ealert(1)%3C/script%3E%FF"),
            "[removed]alert&#40;1&#41;[removed]%FF"
        );
        let sanitizer = XssSanitizer::new();
        assert!(!sanitizer.is_image_clean(b"GIF89a%3C%3Fphp echo 1; %3F%3E%FF"));
        assert!(!sanitizer.is_image_clean(b"GIF89a%3C%3Fphp echo 1; %3F%3E"));
    }

    #[test]
    fn test_large_event_handler_removed() {
        let input = format!(
            "<img src=x onerror=\"location='//evil.example/'+{}\">",
            "A".repeat(200 * 1024)
        );
        let out = clean(&input);
        assert!(!out.contains("onerror"));
        assert!(out.starts_with("<img src=x"));
    }

    #[test]
    fn test_idempotent() {
        let payloads = [
            "<script>alert(1)</script>",
            r#"<a href="javascript:alert(1)">x</a>"#,
            "<img src=xss.png onerror=alert(1)>",
            r#"<div style="color:red" onclick='x()'>hi</div>"#,
            "<iframe src=x></iframe>",
            "ja\tva\tscript:alert('x')",
            "plain & simple text",
        ];
        for payload in payloads {
            let once = clean(payload);
            assert_eq!(clean(&once), once, "{payload}");
        }
    }

    #[test]
    fn test_image_payload_clean() {
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        jpeg.extend_from_slice(b"JFIF\0\x01\x01");
        jpeg.extend_from_slice(
            br#"<rdf:RDF xmlns="http://www.w3.org/1999/02/22-rdf-syntax-ns#"></rdf:RDF>"#,
        );
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        assert!(XssSanitizer::new().is_image_clean(&jpeg));
    }

    #[test]
    fn test_image_payload_with_script_rejected() {
        let payload = b"GIF89a<?php echo 1; ?><script>alert(1)</script>";
        assert!(!XssSanitizer::new().is_image_clean(payload));
        assert!(!XssSanitizer::new().is_clean("<?php phpinfo(); ?>"));
    }

    #[test]
    fn test_xmlns_removed_in_text_mode() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">"#;
        assert!(XssSanitizer::new().is_clean(svg));
        assert_eq!(clean(svg), "<svg >");
    }

    #[test]
    fn test_clean_preserves_shape() {
        let input = json!({
            "name": "<script>x</script>",
            "tags": ["ok", "document.cookie"],
            "count": 3,
            "active": true,
            "none": null
        });
        let cleaned = XssSanitizer::new()
            .clean(input, CleanMode::Text)
            .into_value()
            .unwrap();
        assert_eq!(
            cleaned,
            json!({
                "name": "[removed]x[removed]",
                "tags": ["ok", "[removed]"],
                "count": 3,
                "active": true,
                "none": null
            })
        );
    }

    #[test]
    fn test_image_verdict_over_containers() {
        let sanitizer = XssSanitizer::new();
        let clean_list = json!(["abc", 1, {"k": "plain"}]);
        let dirty_list = json!(["abc", {"k": "<?php x"}]);
        assert_eq!(sanitizer.clean(clean_list, CleanMode::Image), Cleaned::Verdict(true));
        assert_eq!(sanitizer.clean(dirty_list, CleanMode::Image), Cleaned::Verdict(false));
    }

    #[test]
    fn test_depth_cap() {
        let sanitizer = XssSanitizer::with_config(XssConfig::new().with_max_depth(1)).unwrap();
        assert_eq!(
            sanitizer.clean_value(json!(["a", ["b"]])),
            json!(["a", null])
        );
        assert_eq!(
            sanitizer.clean(json!([["b"]]), CleanMode::Image),
            Cleaned::Verdict(false)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(XssSanitizer::with_config(XssConfig::new().with_max_passes(0)).is_err());
    }

    #[test]
    fn test_clean_json() {
        let sanitizer = XssSanitizer::new();
        assert_eq!(
            sanitizer.clean_json(r#"{"a":"<xss>","b":[1,"x"]}"#).unwrap(),
            r#"{"a":"[removed]","b":[1,"x"]}"#
        );
        assert!(sanitizer.clean_json("{not json").is_err());
    }

    #[test]
    fn test_cleanse_policy() {
        let dirty = Value::from("<script>");
        let off = XssSanitizer::new();
        assert_eq!(off.clean_if(dirty.clone(), None), dirty);
        assert_eq!(off.clean_if(dirty.clone(), Some(true)), json!("[removed]"));

        let on = XssSanitizer::with_config(XssConfig::new().with_filter_all_inputs(true)).unwrap();
        assert_eq!(on.clean_if(dirty.clone(), None), json!("[removed]"));
        assert_eq!(on.clean_if(dirty.clone(), Some(false)), dirty);

        let mut inputs = Map::new();
        inputs.insert("q".to_string(), dirty);
        inputs.insert("page".to_string(), json!(2));
        let cleaned = on.clean_all(inputs, None);
        assert_eq!(cleaned["q"], json!("[removed]"));
        assert_eq!(cleaned["page"], json!(2));
    }
}
