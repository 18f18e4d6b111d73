//! In-memory vector store with cosine-similarity top-K search.
//!
//! One mutex guards the whole entry vector for every read and write, so a
//! search never observes a half-written entry. Writes are batched at
//! initialization and reads are human-paced, so the coarse lock is not a
//! contention concern.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use docclaw_core::error::{DocclawError, Result};
use docclaw_core::types::Metadata;

/// One stored chunk: id, text, embedding, optional metadata.
/// Immutable once inserted.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: usize,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: Option<Metadata>,
}

/// A read-only projection of an [`Entry`] plus its similarity to a query.
/// Produced fresh per search, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: usize,
    pub text: String,
    pub similarity: f32,
    pub metadata: Option<Metadata>,
}

/// Cosine of the angle between two vectors, in [-1, 1].
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Min-heap entry for bounded top-K selection.
///
/// Ordering is reversed so the weakest candidate sits on top of the heap:
/// lowest similarity first, and among equals the highest id first, so the
/// ascending-id tie-break survives eviction.
struct HeapEntry {
    similarity: f32,
    id: usize,
    index: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.similarity.partial_cmp(&self.similarity) {
            // Among equal similarities the higher id is the weaker candidate
            Some(Ordering::Equal) | None => self.id.cmp(&other.id),
            Some(ord) => ord,
        }
    }
}

/// Thread-safe append-and-query collection of embedded chunks.
pub struct VectorStore {
    entries: Mutex<Vec<Entry>>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Entry>> {
        // A panic while holding the lock cannot leave an entry half-written:
        // entries are pushed whole. Recover the guard instead of propagating
        // the poison.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry.
    ///
    /// No uniqueness check is made on `id`; the orchestrator is the sole id
    /// issuer and supplies the contiguous chunk-order sequence. Duplicate
    /// ids are accepted and both entries participate in search.
    pub fn add(&self, id: usize, text: String, embedding: Vec<f32>, metadata: Option<Metadata>) {
        let mut entries = self.lock();
        entries.push(Entry {
            id,
            text,
            embedding,
            metadata,
        });
    }

    /// Number of stored entries.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Fetch a clone of the first entry with the given id.
    pub fn get_by_id(&self, id: usize) -> Option<Entry> {
        self.lock().iter().find(|e| e.id == id).cloned()
    }

    /// Find the `top_k` entries most similar to `query`, ordered by
    /// descending similarity; ties break by ascending insertion order (id).
    ///
    /// The result length is `min(top_k, count)`. Fails with
    /// `DimensionMismatch` if `query` differs in length from any stored
    /// embedding. O(n·d) scan plus O(n log k) selection.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let entries = self.lock();

        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(top_k + 1);
        for (index, entry) in entries.iter().enumerate() {
            if entry.embedding.len() != query.len() {
                return Err(DocclawError::DimensionMismatch {
                    query: query.len(),
                    store: entry.embedding.len(),
                });
            }
            if top_k == 0 {
                continue;
            }
            heap.push(HeapEntry {
                similarity: cosine_similarity(query, &entry.embedding),
                id: entry.id,
                index,
            });
            if heap.len() > top_k {
                heap.pop();
            }
        }

        let mut ranked: Vec<HeapEntry> = heap.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        let results = ranked
            .into_iter()
            .map(|h| {
                let entry = &entries[h.index];
                SearchResult {
                    id: entry.id,
                    text: entry.text.clone(),
                    similarity: h.similarity,
                    metadata: entry.metadata.clone(),
                }
            })
            .collect();
        Ok(results)
    }
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_with_axes() -> VectorStore {
        let store = VectorStore::new();
        store.add(0, "x axis".into(), vec![1.0, 0.0], None);
        store.add(1, "y axis".into(), vec![0.0, 1.0], None);
        store.add(2, "diagonal".into(), vec![1.0, 1.0], None);
        store
    }

    #[test]
    fn test_cosine_identity() {
        let v = vec![0.3, -1.2, 4.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_negation() {
        let v = vec![0.3, -1.2, 4.5];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let zero = vec![0.0, 0.0];
        let v = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_search_ranking() {
        let store = store_with_axes();
        let results = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 0);
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(results[1].id, 2);
        assert!((results[1].similarity - 0.707).abs() < 1e-3);
    }

    #[test]
    fn test_search_results_descending() {
        let store = store_with_axes();
        let results = store.search(&[0.5, 0.8], 3).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_search_tie_breaks_by_id() {
        let store = VectorStore::new();
        // Three identical embeddings — all ties
        for id in 0..3 {
            store.add(id, format!("chunk {id}"), vec![1.0, 0.0], None);
        }
        let results = store.search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_tie_break_survives_heap_eviction() {
        let store = VectorStore::new();
        for id in 0..5 {
            store.add(id, format!("chunk {id}"), vec![1.0, 0.0], None);
        }
        // Only two slots: the earliest-inserted ids must win the tie
        let results = store.search(&[1.0, 0.0], 2).unwrap();
        let ids: Vec<usize> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_search_top_k_exceeds_count() {
        let store = store_with_axes();
        let results = store.search(&[1.0, 0.0], 50).unwrap();
        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_search_empty_store() {
        let store = VectorStore::new();
        assert!(store.search(&[1.0, 0.0], 5).unwrap().is_empty());
        assert!(store.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_zero_top_k() {
        let store = store_with_axes();
        assert!(store.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let store = store_with_axes();
        let result = store.search(&[1.0, 0.0, 0.0], 2);
        assert!(matches!(
            result,
            Err(DocclawError::DimensionMismatch { query: 3, store: 2 })
        ));
    }

    #[test]
    fn test_duplicate_ids_both_searchable() {
        let store = VectorStore::new();
        store.add(7, "first".into(), vec![1.0, 0.0], None);
        store.add(7, "second".into(), vec![1.0, 0.0], None);
        let results = store.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_get_by_id() {
        let store = store_with_axes();
        let entry = store.get_by_id(1).unwrap();
        assert_eq!(entry.text, "y axis");
        assert!(store.get_by_id(99).is_none());
    }

    #[test]
    fn test_clear() {
        let store = store_with_axes();
        assert_eq!(store.count(), 3);
        store.clear();
        assert_eq!(store.count(), 0);
        assert!(store.search(&[1.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_metadata_carried_into_results() {
        let store = VectorStore::new();
        let mut meta = Metadata::new();
        meta.insert("page".into(), 4usize.into());
        store.add(0, "text".into(), vec![1.0], Some(meta));
        let results = store.search(&[1.0], 1).unwrap();
        let meta = results[0].metadata.as_ref().unwrap();
        assert_eq!(meta.get("page"), Some(&4usize.into()));
    }

    #[test]
    fn test_concurrent_adds() {
        let store = Arc::new(VectorStore::new());
        let mut handles = Vec::new();
        for id in 0..16 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                store.add(id, format!("chunk {id}"), vec![id as f32, 1.0], None);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.count(), 16);
    }
}
