use std::io::{Read, Write};

use bincode::{Decode, Encode};
use tracing::debug;

use crate::bag::WordCountBag;
use crate::errors::{MailvecError, Result};
use crate::matrix::{transform, FeatureMatrix};
use crate::utils::Indexer;

/// Vocabulary size used when none is given.
pub const DEFAULT_VOCABULARY_SIZE: usize = 1000;

/// Upper bound of the contribution of one document to the tally of a word.
pub const COUNT_CAP: usize = 10;

/// Column reserved for out-of-vocabulary words.
pub const OOV_INDEX: usize = 0;

#[derive(Decode, Encode)]
struct VocabularyData {
    max_size: usize,
    tokens: Vec<String>,
    counts: Vec<usize>,
}

/// Mapping from words to column indices in `1..=max_size`.
///
/// Index 0 is never assigned; it collects every word missing from the vocabulary.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    max_size: usize,
    tokens: Indexer<String>,
    counts: Vec<usize>,
}

impl Vocabulary {
    /// Learns a vocabulary from a corpus.
    ///
    /// Each document adds at most [`COUNT_CAP`] to the tally of a word. Words are ranked by tally;
    /// equal tallies keep the order in which the words were first seen.
    ///
    /// # Arguments
    ///
    /// * `bags` - Normalized documents.
    /// * `max_size` - Maximum number of words to keep.
    ///
    /// # Returns
    ///
    /// A vocabulary with at most `max_size` entries. An empty corpus gives an empty vocabulary.
    pub fn fit(bags: &[WordCountBag], max_size: usize) -> Self {
        debug!(num_docs = bags.len(), max_size, "Fitting vocabulary");

        let mut seen = Indexer::<String>::new();
        let mut totals = vec![];
        for bag in bags {
            for (word, count) in bag.iter() {
                let id = seen.get_id(word);
                if id == totals.len() {
                    totals.push(0);
                }
                totals[id] += count.min(COUNT_CAP);
            }
        }

        let mut ranked: Vec<(String, usize)> = seen.into_keys().into_iter().zip(totals).collect();
        // sort_by is stable, so ties stay in first-seen order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max_size);

        let mut tokens = Indexer::<String>::new();
        let mut counts = Vec::with_capacity(ranked.len());
        for (word, count) in ranked {
            tokens.get_id(word.as_str());
            counts.push(count);
        }

        debug!(vocab_size = tokens.len(), "Vocabulary fitting complete");
        Self {
            max_size,
            tokens,
            counts,
        }
    }

    /// Encodes documents with this vocabulary. See [`transform`].
    pub fn transform(&self, bags: &[WordCountBag]) -> FeatureMatrix {
        transform(bags, self)
    }

    /// Returns the column of `word`, or `None` if it is out of vocabulary.
    pub fn get(&self, word: &str) -> Option<usize> {
        self.tokens.get(word).map(|id| id + 1)
    }

    /// Returns the word at `index`, if any.
    pub fn token(&self, index: usize) -> Option<&str> {
        let id = index.checked_sub(1)?;
        self.tokens.keys().get(id).map(String::as_str)
    }

    /// Number of learned words.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The configured maximum size. Encoded rows always have `max_size + 1` columns.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Iterates over `(word, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tokens
            .keys()
            .iter()
            .enumerate()
            .map(|(id, word)| (word.as_str(), id + 1))
    }

    /// Learned words with their capped tallies, most common first.
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        self.tokens
            .keys()
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
            .collect()
    }

    /// Exports the vocabulary.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let data = VocabularyData {
            max_size: self.max_size,
            tokens: self.tokens.keys().to_vec(),
            counts: self.counts.clone(),
        };
        let config = bincode::config::standard();
        bincode::encode_into_std_write(data, wtr, config)?;
        Ok(())
    }

    /// Creates a vocabulary from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A vocabulary read from `rdr`.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is. When the data contains
    /// duplicated words or more words than its maximum size, [`MailvecError::InvalidArgument`]
    /// will be returned.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let config = bincode::config::standard();
        let data: VocabularyData = bincode::decode_from_std_read(rdr, config)?;
        if data.tokens.len() > data.max_size {
            return Err(MailvecError::invalid_argument(
                "rdr",
                format!(
                    "{} words exceed the maximum size {}",
                    data.tokens.len(),
                    data.max_size
                ),
            ));
        }
        if data.tokens.len() != data.counts.len() {
            return Err(MailvecError::invalid_argument(
                "rdr",
                "the numbers of words and counts differ",
            ));
        }
        let mut tokens = Indexer::<String>::new();
        for word in &data.tokens {
            if tokens.get_id(word.as_str()) != tokens.len() - 1 {
                return Err(MailvecError::invalid_argument(
                    "rdr",
                    format!("duplicated word: {word}"),
                ));
            }
        }
        Ok(Self {
            max_size: data.max_size,
            tokens,
            counts: data.counts,
        })
    }
}
