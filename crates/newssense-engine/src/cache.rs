//! Bounded cache of built vector indexes.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use sha2::{Digest, Sha256};

use crate::index::VectorIndex;
use crate::types::NormalizedDocument;

/// `(ticker hint, SHA-256 of the indexed corpus)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    ticker: Option<String>,
    corpus: [u8; 32],
}

impl CacheKey {
    /// Key for an index over `documents`, in order.
    ///
    /// Each document's article index takes part in the hash, so the same
    /// texts at different batch positions get different keys.
    #[must_use]
    pub fn new(ticker: Option<&str>, documents: &[NormalizedDocument]) -> Self {
        let mut hasher = Sha256::new();
        for doc in documents {
            let position = u64::try_from(doc.source_article_index).unwrap_or(u64::MAX);
            hasher.update(position.to_be_bytes());
            hasher.update(doc.text.as_bytes());
            hasher.update([0]);
        }
        let mut corpus = [0_u8; 32];
        corpus.copy_from_slice(&hasher.finalize());
        Self {
            ticker: ticker.map(str::to_ascii_uppercase),
            corpus,
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    indexes: HashMap<CacheKey, Arc<VectorIndex>>,
    order: VecDeque<CacheKey>,
}

/// FIFO-evicting map from [`CacheKey`] to a fully built index.
///
/// Only complete indexes are inserted, so a reader never sees one mid-build.
#[derive(Debug)]
pub struct IndexCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl IndexCache {
    /// A capacity of 0 disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<VectorIndex>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.indexes.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, index: Arc<VectorIndex>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.indexes.insert(key.clone(), index).is_some() {
            return;
        }
        entries.order.push_back(key);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.indexes.remove(&oldest);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .indexes
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbedder;
    use crate::index::build_index;

    fn docs(texts: &[&str]) -> Vec<NormalizedDocument> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| NormalizedDocument {
                source_article_index: i,
                text: (*t).to_string(),
                plain: (*t).to_string(),
            })
            .collect()
    }

    fn index_for(documents: &[NormalizedDocument]) -> Arc<VectorIndex> {
        Arc::new(build_index(documents, &HashingEmbedder::new(8)).unwrap())
    }

    #[test]
    fn same_corpus_and_ticker_share_a_key() {
        let corpus = docs(&["tesla falls", "apple rises"]);
        assert_eq!(
            CacheKey::new(Some("qqq"), &corpus),
            CacheKey::new(Some("QQQ"), &corpus)
        );
    }

    #[test]
    fn different_ticker_or_corpus_changes_the_key() {
        let a = docs(&["tesla falls"]);
        let b = docs(&["tesla rises"]);
        assert_ne!(CacheKey::new(Some("QQQ"), &a), CacheKey::new(Some("SPY"), &a));
        assert_ne!(CacheKey::new(Some("QQQ"), &a), CacheKey::new(Some("QQQ"), &b));
        assert_ne!(CacheKey::new(None, &a), CacheKey::new(Some("QQQ"), &a));
    }

    #[test]
    fn document_boundaries_take_part_in_the_key() {
        let joined = docs(&["tesla falls"]);
        let split = docs(&["tesla", "falls"]);
        assert_ne!(CacheKey::new(None, &joined), CacheKey::new(None, &split));
    }

    #[test]
    fn get_returns_inserted_index() {
        let cache = IndexCache::new(2);
        let corpus = docs(&["tesla falls"]);
        let key = CacheKey::new(Some("QQQ"), &corpus);
        let index = index_for(&corpus);
        cache.insert(key.clone(), Arc::clone(&index));
        let cached = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&cached, &index));
    }

    #[test]
    fn oldest_entry_is_evicted_first() {
        let cache = IndexCache::new(2);
        let keys: Vec<CacheKey> = ["a", "b", "c"]
            .iter()
            .map(|t| {
                let corpus = docs(&[*t]);
                let key = CacheKey::new(None, &corpus);
                cache.insert(key.clone(), index_for(&corpus));
                key
            })
            .collect();
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&keys[0]).is_none());
        assert!(cache.get(&keys[1]).is_some());
        assert!(cache.get(&keys[2]).is_some());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = IndexCache::new(0);
        let corpus = docs(&["tesla falls"]);
        cache.insert(CacheKey::new(None, &corpus), index_for(&corpus));
        assert!(cache.is_empty());
    }
}
