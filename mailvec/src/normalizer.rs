use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::bag::WordCountBag;
use crate::email::RawEmail;
use crate::extract::{extract_body, EMPTY_BODY};
use crate::filters::{LowercaseFilter, PunctuationFilter, StringFilter, UrlFilter};
use crate::stemmer::PorterStemmer;

/// Switches of the normalization steps. Everything is enabled by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizerOptions {
    strip_headers: bool,
    lowercase: bool,
    strip_punctuation: bool,
    replace_urls: bool,
    stem: bool,
}

impl NormalizerOptions {
    /// Creates options with every step enabled.
    pub const fn new() -> Self {
        Self {
            strip_headers: true,
            lowercase: true,
            strip_punctuation: true,
            replace_urls: true,
            stem: true,
        }
    }

    /// Accepted for compatibility only.
    ///
    /// Header fields are never part of the extracted body, so this switch changes nothing.
    pub const fn strip_headers(mut self, enabled: bool) -> Self {
        self.strip_headers = enabled;
        self
    }

    /// Lowercases the body before tokenization.
    pub const fn lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    /// Removes `.`, `,`, `!` and `?`.
    pub const fn strip_punctuation(mut self, enabled: bool) -> Self {
        self.strip_punctuation = enabled;
        self
    }

    /// Replaces URLs with the token `url`.
    pub const fn replace_urls(mut self, enabled: bool) -> Self {
        self.replace_urls = enabled;
        self
    }

    /// Merges words by their Porter stem.
    pub const fn stem(mut self, enabled: bool) -> Self {
        self.stem = enabled;
        self
    }

    pub const fn is_strip_headers(&self) -> bool {
        self.strip_headers
    }

    pub const fn is_lowercase(&self) -> bool {
        self.lowercase
    }

    pub const fn is_strip_punctuation(&self) -> bool {
        self.strip_punctuation
    }

    pub const fn is_replace_urls(&self) -> bool {
        self.replace_urls
    }

    pub const fn is_stem(&self) -> bool {
        self.stem
    }
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns emails into word-count bags.
///
/// # Examples
///
/// ```
/// use mailvec::{Normalizer, NormalizerOptions, Part, RawEmail};
///
/// let email = RawEmail::from(Part::from_text("text/plain", "Win money now!!! http://spam.example"));
/// let normalizer = Normalizer::new(NormalizerOptions::new().stem(false));
/// let bag = normalizer.normalize(&email);
///
/// assert_eq!(1, bag.get("win"));
/// assert_eq!(1, bag.get("url"));
/// assert_eq!(4, bag.len());
/// ```
pub struct Normalizer {
    options: NormalizerOptions,
    filters: Vec<Box<dyn StringFilter + Send + Sync>>,
    stemmer: Option<PorterStemmer>,
}

impl Normalizer {
    /// Creates a new normalizer.
    ///
    /// # Arguments
    ///
    /// * `options` - Enabled normalization steps.
    ///
    /// # Returns
    ///
    /// A new normalizer.
    pub fn new(options: NormalizerOptions) -> Self {
        let mut filters: Vec<Box<dyn StringFilter + Send + Sync>> = vec![];
        if options.lowercase {
            filters.push(Box::new(LowercaseFilter));
        }
        if options.strip_punctuation {
            filters.push(Box::new(PunctuationFilter));
        }
        if options.replace_urls {
            filters.push(Box::new(UrlFilter::new()));
        }
        Self {
            options,
            filters,
            stemmer: options.stem.then(PorterStemmer::new),
        }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalizes one email.
    ///
    /// Never fails: an email without a usable body is treated as the text `empty`.
    pub fn normalize(&self, email: &RawEmail) -> WordCountBag {
        let text = extract_body(email).unwrap_or_else(|| {
            debug!(
                content_type = email.content_type(),
                "No text/plain or text/html part found"
            );
            EMPTY_BODY.to_string()
        });
        self.normalize_text(&text)
    }

    /// Applies the text filters, splits on whitespace, counts, and optionally stems.
    pub fn normalize_text(&self, text: &str) -> WordCountBag {
        let mut text = text.to_string();
        for filter in &self.filters {
            text = filter.filter(&text);
        }
        let bag = WordCountBag::from_tokens(text.split_whitespace());
        match &self.stemmer {
            Some(stemmer) => bag.map_words(|word| stemmer.stem(word)),
            None => bag,
        }
    }

    /// Normalizes a batch of emails. The output keeps the input order.
    pub fn normalize_batch(&self, emails: &[RawEmail]) -> Vec<WordCountBag> {
        debug!(num_docs = emails.len(), "Normalizing emails");

        #[cfg(feature = "rayon")]
        let bags = emails.par_iter().map(|email| self.normalize(email)).collect();

        #[cfg(not(feature = "rayon"))]
        let bags = emails.iter().map(|email| self.normalize(email)).collect();

        bags
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerOptions::default())
    }
}
