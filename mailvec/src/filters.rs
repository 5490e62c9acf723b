//! Whole-text rewrites applied to a body before it is split into words.

use regex::Regex;

/// Characters removed by [`PunctuationFilter`].
pub const PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// Token substituted for every URL by [`UrlFilter`].
pub const URL_TOKEN: &str = "url";

/// Trait of string filters.
pub trait StringFilter {
    /// Filter a specified string.
    ///
    /// # Arguments:
    ///
    /// * `string` - Input text.
    ///
    /// # Returns
    ///
    /// A processed text.
    fn filter(&self, string: &str) -> String;
}

/// Lowercase filter.
#[derive(Clone, Default)]
pub struct LowercaseFilter;

impl StringFilter for LowercaseFilter {
    fn filter(&self, string: &str) -> String {
        string.to_lowercase()
    }
}

/// Removes the sentence punctuation in [`PUNCTUATION`] and nothing else.
#[derive(Clone, Default)]
pub struct PunctuationFilter;

impl StringFilter for PunctuationFilter {
    fn filter(&self, string: &str) -> String {
        string.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
    }
}

/// Replaces every run of non-whitespace starting with `http` by [`URL_TOKEN`].
///
/// The match does not need to start at a word boundary, so `xhttp://a` becomes `xurl`.
#[derive(Clone)]
pub struct UrlFilter {
    pattern: Regex,
}

impl UrlFilter {
    /// Creates a new UrlFilter.
    ///
    /// # Returns
    ///
    /// A new UrlFilter.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"http\S+").expect("valid pattern"),
        }
    }
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl StringFilter for UrlFilter {
    fn filter(&self, string: &str) -> String {
        self.pattern.replace_all(string, URL_TOKEN).into_owned()
    }
}
