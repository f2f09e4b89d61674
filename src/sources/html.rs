// HTML string helpers for scraped pages.
// Regex based; tailored to the Scholar markup rather than general HTML.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity regex")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws regex"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).expect("attribute regex")
});

/// Remove every `<...>` tag.
pub fn strip_tags(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Decode named entities Scholar emits plus numeric character references.
/// Unknown entities are left untouched.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "hellip" => Some('…'),
                    "ndash" => Some('–'),
                    "mdash" => Some('—'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Collapse whitespace runs into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Visible text of an HTML fragment.
pub fn text(fragment: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(fragment)))
}

/// Value of attribute `name` in an opening tag, entity-decoded.
pub fn attr(tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .map(|caps| decode_entities(&caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_strips_and_decodes() {
        let fragment = "<a href=\"#\">Deep&nbsp;learning &amp;\n <b>more</b></a>";
        assert_eq!(text(fragment), "Deep learning & more");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("Caf&#233; &#x27;x&#39;"), "Café 'x'");
        assert_eq!(decode_entities("&unknown; stays"), "&unknown; stays");
    }

    #[test]
    fn test_attr_decodes_query_separators() {
        let tag = r#"<a href="/citations?view_op=view_citation&amp;user=abc" class="gsc_a_at">"#;
        assert_eq!(
            attr(tag, "href").as_deref(),
            Some("/citations?view_op=view_citation&user=abc")
        );
        assert_eq!(attr(tag, "class").as_deref(), Some("gsc_a_at"));
        assert_eq!(attr(tag, "data-clk"), None);
    }

    #[test]
    fn test_attr_matches_whole_attribute_names() {
        let tag = r#"<a data-href="/wrong" href="/right" data-clk="x">"#;
        assert_eq!(attr(tag, "href").as_deref(), Some("/right"));
        assert_eq!(attr(tag, "clk"), None);
        assert_eq!(attr(tag, "data-clk").as_deref(), Some("x"));
    }
}
