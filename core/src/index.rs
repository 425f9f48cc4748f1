use crate::DocId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Normalized term frequency: occurrences / total terms in the document.
pub type TermFrequency = f64;

/// Two-way inverted index.
///
/// `postings` maps each term to the documents containing it; `doc_terms` is the
/// per-document view of the same data. Both are updated together so a document
/// is either fully present or fully absent.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeMap<DocId, TermFrequency>>,
    doc_terms: HashMap<DocId, BTreeMap<String, TermFrequency>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index already tokenized terms. A document with no terms is still tracked.
    pub fn add_document(&mut self, doc_id: DocId, terms: &[&str]) {
        let mut freqs: BTreeMap<String, TermFrequency> = BTreeMap::new();
        if !terms.is_empty() {
            let inv_count = 1.0 / terms.len() as f64;
            for term in terms {
                *freqs.entry((*term).to_string()).or_insert(0.0) += inv_count;
            }
        }
        for (term, tf) in freqs.iter() {
            self.postings.entry(term.clone()).or_default().insert(doc_id, *tf);
        }
        self.doc_terms.insert(doc_id, freqs);
    }

    /// Purge a document from every posting list. Terms left without documents are pruned.
    pub fn remove_document(&mut self, doc_id: DocId) -> bool {
        let Some(freqs) = self.doc_terms.remove(&doc_id) else {
            return false;
        };
        for term in freqs.keys() {
            if let Some(docs) = self.postings.get_mut(term) {
                docs.remove(&doc_id);
                if docs.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        true
    }

    pub fn contains_document(&self, doc_id: DocId) -> bool {
        self.doc_terms.contains_key(&doc_id)
    }

    pub fn postings(&self, term: &str) -> Option<&BTreeMap<DocId, TermFrequency>> {
        self.postings.get(term)
    }

    /// Number of documents indexed under `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, BTreeMap::len)
    }

    pub fn document_has_term(&self, doc_id: DocId, term: &str) -> bool {
        self.postings
            .get(term)
            .is_some_and(|docs| docs.contains_key(&doc_id))
    }

    pub fn term_frequencies(&self, doc_id: DocId) -> Option<&BTreeMap<String, TermFrequency>> {
        self.doc_terms.get(&doc_id)
    }

    /// Distinct terms of a document, frequencies ignored.
    pub fn term_set(&self, doc_id: DocId) -> BTreeSet<String> {
        self.doc_terms
            .get(&doc_id)
            .map(|freqs| freqs.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn frequencies_sum_to_one() {
        let mut idx = InvertedIndex::new();
        idx.add_document(1, &["curly", "cat", "curly", "tail"]);
        let freqs = idx.term_frequencies(1).unwrap();
        assert!(approx(freqs["curly"], 0.5));
        assert!(approx(freqs["cat"], 0.25));
        assert!(approx(freqs.values().sum::<f64>(), 1.0));
    }

    #[test]
    fn empty_document_is_tracked_without_terms() {
        let mut idx = InvertedIndex::new();
        idx.add_document(7, &[]);
        assert!(idx.contains_document(7));
        assert!(idx.term_set(7).is_empty());
        assert_eq!(idx.num_terms(), 0);
    }

    #[test]
    fn remove_purges_postings() {
        let mut idx = InvertedIndex::new();
        idx.add_document(0, &["hello", "world"]);
        idx.add_document(1, &["hello", "rust"]);
        assert!(idx.remove_document(0));
        assert!(idx.postings("world").is_none());
        assert_eq!(idx.document_frequency("hello"), 1);
        assert!(!idx.document_has_term(0, "hello"));
        assert!(idx.document_has_term(1, "hello"));
        assert!(idx.term_frequencies(0).is_none());
    }

    #[test]
    fn remove_unknown_reports_false() {
        let mut idx = InvertedIndex::new();
        idx.add_document(0, &["hello"]);
        assert!(!idx.remove_document(99));
        assert_eq!(idx.document_frequency("hello"), 1);
    }

    #[test]
    fn term_set_ignores_frequency() {
        let mut idx = InvertedIndex::new();
        idx.add_document(1, &["cat", "cat", "dog"]);
        idx.add_document(2, &["cat", "dog", "dog"]);
        assert_eq!(idx.term_set(1), idx.term_set(2));
        assert_ne!(idx.term_frequencies(1), idx.term_frequencies(2));
    }
}
