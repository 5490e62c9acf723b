use crate::utils::Indexer;

/// Multiset of words of one document.
///
/// Every stored count is positive. Iteration yields words in the order of their first occurrence;
/// equality ignores that order.
#[derive(Clone, Debug, Default)]
pub struct WordCountBag {
    words: Indexer<String>,
    counts: Vec<usize>,
}

impl WordCountBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the occurrences of each token.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bag = Self::new();
        for token in tokens {
            bag.add(token.as_ref(), 1);
        }
        bag
    }

    pub(crate) fn add(&mut self, word: &str, count: usize) {
        if count == 0 {
            return;
        }
        let id = self.words.get_id(word);
        if id == self.counts.len() {
            self.counts.push(count);
        } else {
            self.counts[id] += count;
        }
    }

    /// Re-keys the bag with `f`, summing the counts of words that map to the same key.
    pub fn map_words<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let mut bag = Self::new();
        for (word, count) in self.iter() {
            bag.add(&f(word), count);
        }
        bag
    }

    /// Returns the count of `word`, or 0 if it is absent.
    pub fn get(&self, word: &str) -> usize {
        self.words.get(word).map_or(0, |id| self.counts[id])
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.words
            .keys()
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

impl PartialEq for WordCountBag {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(word, count)| other.get(word) == count)
    }
}

impl Eq for WordCountBag {}

impl<S> FromIterator<(S, usize)> for WordCountBag
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (word, count) in iter {
            bag.add(word.as_ref(), count);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens() {
        let bag = WordCountBag::from_tokens(["b", "a", "b", "c", "b"]);
        assert_eq!(3, bag.len());
        assert_eq!(3, bag.get("b"));
        assert_eq!(1, bag.get("a"));
        assert_eq!(0, bag.get("z"));
        assert_eq!(5, bag.total());
        assert_eq!(
            vec![("b", 3), ("a", 1), ("c", 1)],
            bag.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_zero_counts_are_not_stored() {
        let bag: WordCountBag = [("a", 0), ("b", 2)].into_iter().collect();
        assert_eq!(1, bag.len());
        assert_eq!(0, bag.get("a"));
    }

    #[test]
    fn test_map_words_sums_collisions() {
        let bag = WordCountBag::from_tokens(["Run", "run", "RUN", "walk"]);
        let bag = bag.map_words(|w| w.to_lowercase());
        assert_eq!(2, bag.len());
        assert_eq!(3, bag.get("run"));
        assert_eq!(1, bag.get("walk"));
    }

    #[test]
    fn test_eq_ignores_order() {
        let a = WordCountBag::from_tokens(["x", "y", "y"]);
        let b = WordCountBag::from_tokens(["y", "x", "y"]);
        let c = WordCountBag::from_tokens(["y", "x"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty() {
        let bag = WordCountBag::new();
        assert!(bag.is_empty());
        assert_eq!(0, bag.total());
    }
}
