use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashMap;

/// Assigns dense ids to keys in the order they are first seen.
#[derive(Clone, Debug, Default)]
pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K> Indexer<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    pub fn get_id<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len();
            let key = key.to_owned();
            self.keys.push(key.clone());
            self.ids.insert(key, id);
            id
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexer_first_seen_order() {
        let mut indexer = Indexer::<String>::new();
        assert_eq!(0, indexer.get_id("b"));
        assert_eq!(1, indexer.get_id("a"));
        assert_eq!(0, indexer.get_id("b"));
        assert_eq!(2, indexer.len());
        assert_eq!(&["b".to_string(), "a".to_string()], indexer.keys());
    }

    #[test]
    fn test_indexer_get_does_not_insert() {
        let mut indexer = Indexer::<String>::new();
        indexer.get_id("x");
        assert_eq!(Some(0), indexer.get("x"));
        assert_eq!(None, indexer.get("y"));
        assert_eq!(1, indexer.len());
    }
}
