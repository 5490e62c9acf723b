//! Selection of the representative body text of an email.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::email::{Part, RawEmail};
use crate::errors::Result;

/// Text substituted when no usable body can be produced.
pub const EMPTY_BODY: &str = "empty";

/// Returns the text of the first `text/plain` or `text/html` part in pre-order.
///
/// A `text/plain` part that cannot be decoded falls back to its raw payload, and a `text/html`
/// part that cannot be converted becomes [`EMPTY_BODY`]. `None` is returned only when the email
/// has no textual part at all.
pub fn extract_body(email: &RawEmail) -> Option<String> {
    for node in email.walk() {
        let RawEmail::Leaf(part) = node else {
            continue;
        };
        match part.content_type() {
            "text/plain" => return Some(plain_to_text(part)),
            "text/html" => {
                let text = html_to_text(part).unwrap_or_else(|e| {
                    warn!(error = %e, "Failed to convert HTML part, substituting placeholder");
                    EMPTY_BODY.to_string()
                });
                return Some(text);
            }
            _ => {}
        }
    }
    None
}

fn plain_to_text(part: &Part) -> String {
    part.decode().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to decode text part, using raw payload");
        part.raw_payload().into_owned()
    })
}

/// Decodes an HTML part and reduces it to its visible text.
///
/// # Errors
///
/// Fails when the payload cannot be decoded.
pub fn html_to_text(part: &Part) -> Result<String> {
    let html = part.decode()?;
    Ok(strip_markup(&html).replace("\n\n", ""))
}

struct MarkupPatterns {
    invisible: Regex,
    tag: Regex,
}

fn patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        invisible: Regex::new(
            r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<![^>]*>|<\?[^>]*>",
        )
        .expect("valid pattern"),
        // A `>` inside a quoted attribute value does not close the tag.
        tag: Regex::new(r#"</?[A-Za-z](?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("valid pattern"),
    })
}

/// Removes tags, comments, declarations, and script/style contents, then decodes character
/// references.
///
/// All HTML5 named references are recognized, including the legacy ones written without a
/// trailing semicolon (`&amp`, `&nbsp`). Text nodes are joined without separators.
pub fn strip_markup(html: &str) -> String {
    let patterns = patterns();
    let visible = patterns.invisible.replace_all(html, "");
    let text = patterns.tag.replace_all(&visible, "");
    htmlize::unescape(text.as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_plain_part_wins() {
        let email = RawEmail::multipart(
            "multipart/alternative",
            vec![
                Part::from_text("text/plain", "plain").into(),
                Part::from_text("text/html", "<b>html</b>").into(),
            ],
        );
        assert_eq!(Some("plain".to_string()), extract_body(&email));
    }

    #[test]
    fn test_first_html_part_wins() {
        let email = RawEmail::multipart(
            "multipart/alternative",
            vec![
                Part::from_text("text/html", "<b>html</b>").into(),
                Part::from_text("text/plain", "plain").into(),
            ],
        );
        assert_eq!(Some("html".to_string()), extract_body(&email));
    }

    #[test]
    fn test_nested_parts_are_searched_depth_first() {
        let email = RawEmail::multipart(
            "multipart/mixed",
            vec![
                Part::new("image/png", "", vec![0x89, b'P', b'N', b'G']).into(),
                RawEmail::multipart(
                    "multipart/alternative",
                    vec![Part::from_text("text/plain", "inner").into()],
                ),
                Part::from_text("text/plain", "outer").into(),
            ],
        );
        assert_eq!(Some("inner".to_string()), extract_body(&email));
    }

    #[test]
    fn test_no_textual_part() {
        let email = RawEmail::multipart(
            "multipart/mixed",
            vec![Part::new("application/pdf", "", b"%PDF".to_vec()).into()],
        );
        assert_eq!(None, extract_body(&email));
    }

    #[test]
    fn test_plain_decode_failure_uses_raw_payload() {
        let email: RawEmail = Part::new("text/plain", "x-bogus", b"raw words".to_vec()).into();
        assert_eq!(Some("raw words".to_string()), extract_body(&email));
    }

    #[test]
    fn test_html_decode_failure_uses_placeholder() {
        let email: RawEmail = Part::new("text/html", "x-bogus", b"<p>hi</p>".to_vec()).into();
        assert_eq!(Some(EMPTY_BODY.to_string()), extract_body(&email));
    }

    #[test]
    fn test_strip_markup() {
        let html = "<!DOCTYPE html><html><head><style>p { color: red; }</style>\
                    <script type=\"text/javascript\">var x = 1;</script></head>\
                    <body><!-- hidden --><p class=\"a\">Hello</p><p>World &amp; you</p></body></html>";
        assert_eq!("HelloWorld & you", strip_markup(html));
    }

    #[test]
    fn test_strip_markup_keeps_bare_angle_brackets() {
        assert_eq!("1 < 2 and 3 > 2", strip_markup("1 < 2 and 3 > 2"));
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!("A B", strip_markup("&#65;&#x20;&#X42;"));
        assert_eq!("&unknown;", strip_markup("&unknown;"));
    }

    #[test]
    fn test_decode_named_entities() {
        let html = "<p>don&rsquo;t miss caf&eacute; deals&nbsp;now &amp more &ldquo;free&rdquo;</p>";
        assert_eq!(
            "don\u{2019}t miss caf\u{e9} deals\u{a0}now & more \u{201c}free\u{201d}",
            strip_markup(html)
        );
    }

    #[test]
    fn test_quoted_attribute_with_angle_bracket() {
        assert_eq!(
            "link text",
            strip_markup(r#"<a title="a>b" data-x='c>d' href="x">link text</a>"#)
        );
    }

    #[test]
    fn test_html_to_text_removes_blank_lines() {
        let part = Part::from_text("text/html", "<p>one</p>\n\n<p>two</p>\n");
        assert_eq!("onetwo\n", html_to_text(&part).unwrap());
    }
}
