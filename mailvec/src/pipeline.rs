use tracing::info;

use crate::email::RawEmail;
use crate::matrix::FeatureMatrix;
use crate::normalizer::{Normalizer, NormalizerOptions};
use crate::vocabulary::{Vocabulary, DEFAULT_VOCABULARY_SIZE};

/// Normalization followed by vocabulary encoding.
pub struct Pipeline {
    normalizer: Normalizer,
    max_size: usize,
}

impl Pipeline {
    /// Creates a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `options` - Normalization options.
    /// * `max_size` - Maximum vocabulary size.
    pub fn new(options: NormalizerOptions, max_size: usize) -> Self {
        Self {
            normalizer: Normalizer::new(options),
            max_size,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Learns a vocabulary from a training corpus.
    pub fn fit(self, emails: &[RawEmail]) -> FittedPipeline {
        let bags = self.normalizer.normalize_batch(emails);
        let vocabulary = Vocabulary::fit(&bags, self.max_size);
        info!(
            num_docs = emails.len(),
            vocab_size = vocabulary.len(),
            "Fitted pipeline"
        );
        FittedPipeline {
            normalizer: self.normalizer,
            vocabulary,
        }
    }

    /// Fits and encodes the same corpus, normalizing each email once.
    pub fn fit_transform(self, emails: &[RawEmail]) -> (FittedPipeline, FeatureMatrix) {
        let bags = self.normalizer.normalize_batch(emails);
        let vocabulary = Vocabulary::fit(&bags, self.max_size);
        let matrix = vocabulary.transform(&bags);
        info!(
            num_docs = emails.len(),
            vocab_size = vocabulary.len(),
            "Fitted and transformed pipeline"
        );
        let fitted = FittedPipeline {
            normalizer: self.normalizer,
            vocabulary,
        };
        (fitted, matrix)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(NormalizerOptions::default(), DEFAULT_VOCABULARY_SIZE)
    }
}

/// A pipeline with a learned vocabulary.
pub struct FittedPipeline {
    normalizer: Normalizer,
    vocabulary: Vocabulary,
}

impl FittedPipeline {
    /// Combines a normalizer with a previously learned vocabulary.
    pub fn from_vocabulary(options: NormalizerOptions, vocabulary: Vocabulary) -> Self {
        Self {
            normalizer: Normalizer::new(options),
            vocabulary,
        }
    }

    /// Encodes emails with the learned vocabulary.
    pub fn transform(&self, emails: &[RawEmail]) -> FeatureMatrix {
        let bags = self.normalizer.normalize_batch(emails);
        self.vocabulary.transform(&bags)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn into_vocabulary(self) -> Vocabulary {
        self.vocabulary
    }
}

/// Normalizes, fits and encodes a corpus with the default options and vocabulary size.
///
/// # Returns
///
/// Dense rows of width [`DEFAULT_VOCABULARY_SIZE`] + 1, and the learned vocabulary.
pub fn count_occurrences(emails: &[RawEmail]) -> (Vec<Vec<usize>>, Vocabulary) {
    let (fitted, matrix) = Pipeline::default().fit_transform(emails);
    (matrix.to_dense(), fitted.into_vocabulary())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::email::Part;

    fn plain(text: &str) -> RawEmail {
        Part::from_text("text/plain", text).into()
    }

    #[test]
    fn test_fit_then_transform() {
        let train = vec![
            plain("Win money now!!! http://spam.example"),
            plain("money money money"),
        ];
        let fitted = Pipeline::new(NormalizerOptions::default(), 3).fit(&train);
        let vocab = fitted.vocabulary();
        assert_eq!(Some(1), vocab.get("money"));
        assert_eq!(Some(2), vocab.get("win"));
        assert_eq!(Some(3), vocab.get("now"));
        assert_eq!(None, vocab.get("url"));

        let m = fitted.transform(&[plain("Money for nothing")]);
        assert_eq!(vec![vec![2, 1, 0, 0]], m.to_dense());
    }

    #[test]
    fn test_fit_transform_matches_fit_then_transform() {
        let emails = vec![
            plain("the cat sat"),
            plain("the dog ran. the end"),
            RawEmail::multipart("multipart/mixed", vec![]),
        ];
        let (fitted, m1) = Pipeline::new(NormalizerOptions::default(), 5).fit_transform(&emails);
        let m2 = fitted.transform(&emails);
        assert_eq!(m1, m2);
        assert_eq!((3, 6), m1.shape());
    }

    #[test]
    fn test_from_vocabulary() {
        let fitted = Pipeline::new(NormalizerOptions::default(), 4).fit(&[plain("alpha beta")]);
        let vocab = fitted.into_vocabulary();
        let restored = FittedPipeline::from_vocabulary(NormalizerOptions::default(), vocab);
        let m = restored.transform(&[plain("beta gamma")]);
        assert_eq!(vec![vec![1, 0, 1, 0, 0]], m.to_dense());
    }

    #[test]
    fn test_count_occurrences() {
        let emails = vec![plain("hello world"), plain("hello")];
        let (rows, vocab) = count_occurrences(&emails);
        assert_eq!(2, rows.len());
        assert_eq!(DEFAULT_VOCABULARY_SIZE + 1, rows[0].len());
        assert_eq!(Some(1), vocab.get("hello"));
        assert_eq!(Some(2), vocab.get("world"));
        assert_eq!(&[0, 1, 1], &rows[0][..3]);
        assert_eq!(&[0, 1, 0], &rows[1][..3]);
    }

    #[test]
    fn test_empty_corpus() {
        let (fitted, m) = Pipeline::default().fit_transform(&[]);
        assert!(fitted.vocabulary().is_empty());
        assert_eq!((0, DEFAULT_VOCABULARY_SIZE + 1), m.shape());
    }
}
