use crate::config::EngineConfig;
use crate::document::{average_rating, DocumentRecord};
use crate::error::{Result, SearchError};
use crate::index::{InvertedIndex, TermFrequency};
use crate::predicate;
use crate::query::{parse_query, Query};
use crate::tokenizer::{tokenize, StopWords};
use crate::{DocId, Document, DocumentStatus};
use std::collections::{BTreeMap, HashMap, HashSet};

static NO_TERMS: BTreeMap<String, TermFrequency> = BTreeMap::new();

/// In-memory TF-IDF search engine over a mutable document collection.
///
/// Mutating calls validate their input before touching any state, so a call
/// that returns an error leaves the engine as it was.
#[derive(Debug, Clone)]
pub struct SearchServer {
    stop_words: StopWords,
    max_results: usize,
    relevance_epsilon: f64,
    index: InvertedIndex,
    documents: HashMap<DocId, DocumentRecord>,
    /// Live ids in insertion order.
    document_ids: Vec<DocId>,
}

impl SearchServer {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let stop_words = StopWords::from_words(&config.stop_words)?;
        Ok(Self {
            stop_words,
            max_results: config.max_results,
            relevance_epsilon: config.relevance_epsilon,
            index: InvertedIndex::new(),
            documents: HashMap::new(),
            document_ids: Vec::new(),
        })
    }

    /// Engine with default settings and whitespace separated stop words.
    pub fn with_stop_words(text: &str) -> Result<Self> {
        Self::new(EngineConfig::with_stop_words(text))
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn add_document(
        &mut self,
        doc_id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if self.documents.contains_key(&doc_id) {
            return Err(SearchError::DuplicateId(doc_id));
        }
        let terms = tokenize(text, &self.stop_words)?;
        self.index.add_document(doc_id, &terms);
        let rating = average_rating(ratings);
        self.documents.insert(doc_id, DocumentRecord { rating, status });
        self.document_ids.push(doc_id);
        tracing::debug!(doc_id, terms = terms.len(), rating, %status, "added document");
        Ok(())
    }

    /// Unknown ids are reported as [`SearchError::UnknownId`].
    pub fn remove_document(&mut self, doc_id: DocId) -> Result<()> {
        if self.documents.remove(&doc_id).is_none() {
            return Err(SearchError::UnknownId(doc_id));
        }
        self.index.remove_document(doc_id);
        self.document_ids.retain(|&id| id != doc_id);
        tracing::debug!(doc_id, "removed document");
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document_ids(&self) -> &[DocId] {
        &self.document_ids
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, DocId>> {
        self.document_ids.iter().copied()
    }

    pub fn status(&self, doc_id: DocId) -> Option<DocumentStatus> {
        self.documents.get(&doc_id).map(|r| r.status)
    }

    pub fn rating(&self, doc_id: DocId) -> Option<i32> {
        self.documents.get(&doc_id).map(|r| r.rating)
    }

    /// Term frequencies of a live document; empty for an unknown id.
    pub fn term_frequencies(&self, doc_id: DocId) -> &BTreeMap<String, TermFrequency> {
        self.index.term_frequencies(doc_id).unwrap_or(&NO_TERMS)
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, predicate::actual())
    }

    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, predicate::with_status(status))
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&query, predicate);
        rank_documents(&mut matched, self.relevance_epsilon);
        matched.truncate(self.max_results);
        tracing::debug!(query = raw_query, hits = matched.len(), "search");
        Ok(matched)
    }

    fn inverse_document_frequency(&self, term: &str) -> f64 {
        let df = self.index.document_frequency(term);
        if df == 0 || self.documents.is_empty() {
            return 0.0;
        }
        (self.documents.len() as f64 / df as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for term in &query.plus {
            let Some(postings) = self.index.postings(term) else {
                continue;
            };
            let idf = self.inverse_document_frequency(term);
            for (&doc_id, &tf) in postings {
                let Some(record) = self.documents.get(&doc_id) else {
                    continue;
                };
                if predicate(doc_id, record.status, record.rating) {
                    *relevance.entry(doc_id).or_insert(0.0) += tf * idf;
                }
            }
        }
        for term in &query.minus {
            if let Some(postings) = self.index.postings(term) {
                for doc_id in postings.keys() {
                    relevance.remove(doc_id);
                }
            }
        }
        relevance
            .into_iter()
            .filter_map(|(doc_id, rel)| {
                self.documents
                    .get(&doc_id)
                    .map(|record| Document::new(doc_id, rel, record.rating))
            })
            .collect()
    }

    /// Plus terms of the query found in the document, sorted. Empty if any minus term matches.
    pub fn match_document(&self, raw_query: &str, doc_id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        let query = parse_query(raw_query, &self.stop_words)?;
        let status = self
            .documents
            .get(&doc_id)
            .map(|r| r.status)
            .ok_or(SearchError::UnknownId(doc_id))?;
        if query.minus.iter().any(|t| self.index.document_has_term(doc_id, t)) {
            return Ok((Vec::new(), status));
        }
        let matched = query
            .plus
            .into_iter()
            .filter(|t| self.index.document_has_term(doc_id, t))
            .collect();
        Ok((matched, status))
    }

    /// Remove every document whose term set equals that of an earlier document.
    ///
    /// The earliest inserted document of each group survives. Returns removed ids
    /// in insertion order.
    pub fn remove_duplicates(&mut self) -> Vec<DocId> {
        let snapshot: Vec<_> = self
            .document_ids
            .iter()
            .map(|&id| (id, self.index.term_set(id)))
            .collect();

        let mut seen = HashSet::with_capacity(snapshot.len());
        let mut duplicates = Vec::new();
        for (doc_id, terms) in snapshot {
            if !seen.insert(terms) {
                duplicates.push(doc_id);
            }
        }
        for &doc_id in &duplicates {
            if self.remove_document(doc_id).is_ok() {
                tracing::info!(doc_id, "found duplicate document");
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Order by relevance descending. Runs of relevance within `epsilon` of the
/// run's first document are ordered by rating descending, then id ascending.
fn rank_documents(docs: &mut [Document], epsilon: f64) {
    docs.sort_by(|a, b| b.relevance.total_cmp(&a.relevance).then(a.id.cmp(&b.id)));
    let mut start = 0;
    while start < docs.len() {
        let mut end = start + 1;
        while end < docs.len() && docs[start].relevance - docs[end].relevance < epsilon {
            end += 1;
        }
        docs[start..end].sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> SearchServer {
        let mut s = SearchServer::with_stop_words("and in at").unwrap();
        s.add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
        s.add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        s
    }

    #[test]
    fn relevance_is_tf_idf() {
        let mut s = server();
        s.add_document(3, "big cat fancy collar", DocumentStatus::Actual, &[1, 2, 8]).unwrap();
        let docs = s.find_top_documents("curly").unwrap();
        assert_eq!(docs.len(), 2);
        let idf = (3.0f64 / 2.0).ln();
        assert!((docs[0].relevance - 0.5 * idf).abs() < 1e-9);
        assert!((docs[1].relevance - 0.25 * idf).abs() < 1e-9);
    }

    #[test]
    fn rejected_add_leaves_state_unchanged() {
        let mut s = server();
        assert_eq!(
            s.add_document(3, "ok bad\u{7}word", DocumentStatus::Actual, &[]),
            Err(SearchError::InvalidWord("bad\u{7}word".into()))
        );
        assert_eq!(s.document_count(), 2);
        assert!(s.term_frequencies(3).is_empty());
        assert!(s.find_top_documents("ok").unwrap().is_empty());
    }

    #[test]
    fn remove_unknown_is_an_error() {
        let mut s = server();
        assert_eq!(s.remove_document(42), Err(SearchError::UnknownId(42)));
        assert_eq!(s.document_ids(), &[1, 2]);
    }

    #[test]
    fn remove_purges_document() {
        let mut s = server();
        s.remove_document(1).unwrap();
        assert_eq!(s.document_ids(), &[2]);
        assert!(s.term_frequencies(1).is_empty());
        let docs = s.find_top_documents("cat").unwrap();
        assert!(docs.is_empty());
        assert_eq!(s.match_document("curly", 1), Err(SearchError::UnknownId(1)));
    }

    #[test]
    fn status_filters_results() {
        let mut s = server();
        s.add_document(3, "curly parrot", DocumentStatus::Banned, &[9]).unwrap();
        let banned = s.find_top_documents_with_status("curly", DocumentStatus::Banned).unwrap();
        assert_eq!(banned.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3]);
        let actual = s.find_top_documents("curly").unwrap();
        assert!(actual.iter().all(|d| d.id != 3));
    }

    #[test]
    fn predicate_sees_id_and_rating() {
        let s = server();
        let even = s.find_top_documents_by("curly", |id, _, _| id % 2 == 0).unwrap();
        assert_eq!(even.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);
        let rated = s.find_top_documents_by("curly", |_, _, rating| rating > 3).unwrap();
        assert_eq!(rated.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn no_plus_terms_yields_nothing() {
        let s = server();
        assert!(s.find_top_documents("-dog").unwrap().is_empty());
        assert!(s.find_top_documents("").unwrap().is_empty());
        assert!(s.find_top_documents("and in").unwrap().is_empty());
    }

    #[test]
    fn empty_engine_searches_cleanly() {
        let s = SearchServer::with_stop_words("").unwrap();
        assert!(s.find_top_documents("cat").unwrap().is_empty());
    }

    #[test]
    fn malformed_query_is_reported() {
        let s = server();
        assert_eq!(
            s.find_top_documents("curly -"),
            Err(SearchError::MalformedQuery("-".into()))
        );
        assert!(s.match_document("--curly", 1).is_err());
    }

    #[test]
    fn equal_relevance_breaks_ties_by_rating_then_id() {
        let mut s = SearchServer::with_stop_words("").unwrap();
        s.add_document(10, "fox", DocumentStatus::Actual, &[1]).unwrap();
        s.add_document(11, "fox", DocumentStatus::Actual, &[5]).unwrap();
        s.add_document(12, "fox", DocumentStatus::Actual, &[5]).unwrap();
        s.add_document(13, "hen", DocumentStatus::Actual, &[]).unwrap();
        let ids: Vec<_> = s.find_top_documents("fox").unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![11, 12, 10]);
    }

    #[test]
    fn match_lists_plus_terms_sorted() {
        let s = server();
        let (terms, status) = s.match_document("tail curly cat dog", 1).unwrap();
        assert_eq!(terms, vec!["cat", "curly", "tail"]);
        assert_eq!(status, DocumentStatus::Actual);
    }

    #[test]
    fn iterates_in_insertion_order() {
        let mut s = SearchServer::with_stop_words("").unwrap();
        for id in [5, 1, 3] {
            s.add_document(id, "x", DocumentStatus::Actual, &[]).unwrap();
        }
        assert_eq!((&s).into_iter().collect::<Vec<_>>(), vec![5, 1, 3]);
    }

    #[test]
    fn documents_without_terms_are_duplicates_of_each_other() {
        let mut s = SearchServer::with_stop_words("and").unwrap();
        s.add_document(1, "and", DocumentStatus::Actual, &[]).unwrap();
        s.add_document(2, "", DocumentStatus::Actual, &[]).unwrap();
        assert_eq!(s.remove_duplicates(), vec![2]);
        assert_eq!(s.document_ids(), &[1]);
    }

    #[test]
    fn rank_groups_near_equal_relevance() {
        let mut docs = vec![
            Document::new(1, 0.5, 3),
            Document::new(2, 0.5 + 1e-9, 1),
            Document::new(3, 0.9, 0),
        ];
        rank_documents(&mut docs, 1e-6);
        let ids: Vec<_> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn rank_groups_do_not_chain_past_epsilon() {
        let mut docs = vec![
            Document::new(1, 0.5 + 1.8e-6, 2),
            Document::new(2, 0.5 + 0.9e-6, 1),
            Document::new(3, 0.5, 3),
        ];
        rank_documents(&mut docs, 1e-6);
        let ids: Vec<_> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for pair in docs.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.relevance > b.relevance || ((a.relevance - b.relevance).abs() < 1e-6 && a.rating >= b.rating));
        }
    }
}
