use std::borrow::Cow;

use mailparse::ParsedMail;
use tracing::debug;

use crate::errors::{MailvecError, Result};

const DEFAULT_CHARSET: &str = "us-ascii";

/// A single non-multipart body part.
///
/// `body` holds the payload with its transfer encoding (base64, quoted-printable) already undone,
/// but still in the character set named by `charset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    content_type: String,
    charset: String,
    body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    ///
    /// # Arguments
    ///
    /// * `content_type` - MIME type such as `text/plain`. It is stored lowercased.
    /// * `charset` - Charset label of `body`.
    /// * `body` - Payload bytes.
    pub fn new<C, S, B>(content_type: C, charset: S, body: B) -> Self
    where
        C: AsRef<str>,
        S: Into<String>,
        B: Into<Vec<u8>>,
    {
        Self {
            content_type: content_type.as_ref().trim().to_ascii_lowercase(),
            charset: charset.into(),
            body: body.into(),
        }
    }

    /// Creates a UTF-8 part from a string.
    pub fn from_text<C, T>(content_type: C, text: T) -> Self
    where
        C: AsRef<str>,
        T: Into<String>,
    {
        Self::new(content_type, "utf-8", text.into().into_bytes())
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decodes the payload into text using the declared charset.
    ///
    /// Malformed byte sequences are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// [`MailvecError::UnknownCharset`] is returned when no decoder exists for the charset label.
    pub fn decode(&self) -> Result<String> {
        let charset = charset::Charset::for_label(self.charset.trim().as_bytes())
            .ok_or_else(|| MailvecError::unknown_charset(self.charset.as_str()))?;
        let (text, had_errors) = charset.decode_without_bom_handling(&self.body);
        if had_errors {
            debug!(charset = %self.charset, "Replaced malformed sequences while decoding");
        }
        Ok(text.into_owned())
    }

    /// Renders the payload as-is, without consulting the charset.
    pub fn raw_payload(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// A parsed email as a tree of body parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawEmail {
    /// A container node (`multipart/*` or an attached `message/rfc822`).
    Multipart {
        content_type: String,
        parts: Vec<RawEmail>,
    },

    /// A node carrying a payload.
    Leaf(Part),
}

impl RawEmail {
    /// Parses an RFC 5322 message.
    ///
    /// # Errors
    ///
    /// [`MailvecError::ParseError`] is returned when the header block cannot be parsed.
    pub fn parse<B>(raw: B) -> Result<Self>
    where
        B: AsRef<[u8]>,
    {
        let mail = mailparse::parse_mail(raw.as_ref())?;
        Ok(Self::from_parsed(&mail))
    }

    /// Creates a container node.
    pub fn multipart<C>(content_type: C, parts: Vec<RawEmail>) -> Self
    where
        C: AsRef<str>,
    {
        Self::Multipart {
            content_type: content_type.as_ref().trim().to_ascii_lowercase(),
            parts,
        }
    }

    fn from_parsed(mail: &ParsedMail) -> Self {
        let content_type = mail.ctype.mimetype.to_ascii_lowercase();
        if content_type.starts_with("multipart/") {
            return Self::Multipart {
                content_type,
                parts: mail.subparts.iter().map(Self::from_parsed).collect(),
            };
        }
        let body = match mail.get_body_raw() {
            Ok(body) => body,
            Err(e) => {
                debug!(%content_type, error = %e, "Failed to undo transfer encoding");
                vec![]
            }
        };
        if content_type == "message/rfc822" {
            if let Ok(inner) = mailparse::parse_mail(&body) {
                return Self::Multipart {
                    content_type,
                    parts: vec![Self::from_parsed(&inner)],
                };
            }
        }
        let charset = if mail.ctype.charset.is_empty() {
            DEFAULT_CHARSET.to_string()
        } else {
            mail.ctype.charset.clone()
        };
        Self::Leaf(Part {
            content_type,
            charset,
            body,
        })
    }

    pub fn content_type(&self) -> &str {
        match self {
            Self::Multipart { content_type, .. } => content_type,
            Self::Leaf(part) => part.content_type(),
        }
    }

    /// Iterates over every node of the tree, depth-first, parents before children.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

impl From<Part> for RawEmail {
    fn from(part: Part) -> Self {
        Self::Leaf(part)
    }
}

/// Pre-order iterator returned by [`RawEmail::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a RawEmail>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a RawEmail;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let RawEmail::Multipart { parts, .. } = node {
            self.stack.extend(parts.iter().rev());
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_part() {
        let raw = b"From: a@example.com\r\nSubject: hi\r\n\r\nHello there\r\n";
        let email = RawEmail::parse(raw).unwrap();
        match &email {
            RawEmail::Leaf(part) => {
                assert_eq!("text/plain", part.content_type());
                assert_eq!("Hello there", part.decode().unwrap().trim_end());
            }
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn test_parse_multipart_structure() {
        let raw = concat!(
            "Content-Type: multipart/alternative; boundary=\"XX\"\r\n",
            "\r\n",
            "--XX\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "\r\n",
            "plain body\r\n",
            "--XX\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>html body</p>\r\n",
            "--XX--\r\n",
        );
        let email = RawEmail::parse(raw).unwrap();
        let types: Vec<_> = email.walk().map(|node| node.content_type()).collect();
        assert_eq!(
            vec!["multipart/alternative", "text/plain", "text/html"],
            types
        );
    }

    #[test]
    fn test_parse_base64_body() {
        let raw = concat!(
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "aGVsbG8gd29ybGQ=\r\n",
        );
        let email = RawEmail::parse(raw).unwrap();
        match &email {
            RawEmail::Leaf(part) => assert_eq!("hello world", part.decode().unwrap()),
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn test_walk_preorder() {
        let email = RawEmail::multipart(
            "multipart/mixed",
            vec![
                RawEmail::multipart(
                    "multipart/alternative",
                    vec![Part::from_text("text/html", "a").into()],
                ),
                Part::from_text("text/plain", "b").into(),
            ],
        );
        let types: Vec<_> = email.walk().map(|node| node.content_type()).collect();
        assert_eq!(
            vec![
                "multipart/mixed",
                "multipart/alternative",
                "text/html",
                "text/plain"
            ],
            types
        );
    }

    #[test]
    fn test_parse_attached_message() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=\"OUTER\"\r\n",
            "\r\n",
            "--OUTER\r\n",
            "Content-Type: application/octet-stream\r\n",
            "\r\n",
            "xyz\r\n",
            "--OUTER\r\n",
            "Content-Type: message/rfc822\r\n",
            "\r\n",
            "Subject: fwd\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "forwarded body\r\n",
            "--OUTER--\r\n",
        );
        let email = RawEmail::parse(raw).unwrap();
        let types: Vec<_> = email.walk().map(|node| node.content_type()).collect();
        assert_eq!(
            vec![
                "multipart/mixed",
                "application/octet-stream",
                "message/rfc822",
                "text/plain"
            ],
            types
        );
        assert_eq!(
            "forwarded body",
            crate::extract::extract_body(&email).unwrap().trim_end()
        );
    }

    #[test]
    fn test_decode_latin1() {
        let part = Part::new("text/plain", "iso-8859-1", vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!("caf\u{e9}", part.decode().unwrap());
    }

    #[test]
    fn test_decode_unknown_charset() {
        let part = Part::new("text/plain", "x-no-such-charset", b"abc".to_vec());
        assert!(matches!(
            part.decode(),
            Err(MailvecError::UnknownCharset(_))
        ));
        assert_eq!("abc", part.raw_payload());
    }

    #[test]
    fn test_content_type_is_lowercased() {
        let part = Part::from_text("Text/HTML", "");
        assert_eq!("text/html", part.content_type());
    }
}
