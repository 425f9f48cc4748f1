use crate::error::Result;
use crate::server::SearchServer;
use crate::{DocId, Document, DocumentStatus};
use std::collections::VecDeque;

/// Requests remembered by a [`RequestQueue`]: one day at one request per minute.
pub const MIN_IN_DAY: usize = 1440;

/// Sliding window over the most recent search requests, counting those that
/// returned no documents.
#[derive(Debug, Clone)]
pub struct RequestQueue {
    window: usize,
    requests: VecDeque<bool>,
    no_result_requests: usize,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::with_window(MIN_IN_DAY)
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self { window, requests: VecDeque::with_capacity(window), no_result_requests: 0 }
    }

    pub fn add_find_request(&mut self, server: &SearchServer, raw_query: &str) -> Result<Vec<Document>> {
        let docs = server.find_top_documents(raw_query)?;
        self.record(docs.is_empty());
        Ok(docs)
    }

    pub fn add_find_request_with_status(
        &mut self,
        server: &SearchServer,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let docs = server.find_top_documents_with_status(raw_query, status)?;
        self.record(docs.is_empty());
        Ok(docs)
    }

    pub fn add_find_request_by<P>(
        &mut self,
        server: &SearchServer,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let docs = server.find_top_documents_by(raw_query, predicate)?;
        self.record(docs.is_empty());
        Ok(docs)
    }

    /// Record the outcome of one request, evicting the oldest once the window is full.
    pub fn record(&mut self, no_results: bool) {
        if self.requests.len() == self.window {
            if let Some(true) = self.requests.pop_front() {
                self.no_result_requests -= 1;
            }
        }
        self.requests.push_back(no_results);
        if no_results {
            self.no_result_requests += 1;
        }
    }

    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> SearchServer {
        let mut s = SearchServer::with_stop_words("and in at").unwrap();
        s.add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
        s.add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        s.add_document(3, "big cat fancy collar ", DocumentStatus::Actual, &[1, 2, 8]).unwrap();
        s.add_document(4, "big dog sparrow Eugene", DocumentStatus::Actual, &[1, 3, 2]).unwrap();
        s.add_document(5, "big dog sparrow Vasiliy", DocumentStatus::Actual, &[1, 1, 1]).unwrap();
        s
    }

    #[test]
    fn window_evicts_oldest_requests() {
        let s = server();
        let mut queue = RequestQueue::new();
        for _ in 0..MIN_IN_DAY - 1 {
            queue.add_find_request(&s, "empty request").unwrap();
        }
        queue.add_find_request(&s, "curly dog").unwrap();
        assert_eq!(queue.no_result_requests(), MIN_IN_DAY - 1);
        queue.add_find_request(&s, "big collar").unwrap();
        queue.add_find_request(&s, "sparrow").unwrap();
        assert_eq!(queue.no_result_requests(), MIN_IN_DAY - 3);
        assert_eq!(queue.len(), MIN_IN_DAY);
    }

    #[test]
    fn failed_requests_are_not_recorded() {
        let s = server();
        let mut queue = RequestQueue::with_window(3);
        assert!(queue.add_find_request(&s, "cat -").is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn status_and_predicate_requests_are_counted() {
        let s = server();
        let mut queue = RequestQueue::with_window(3);
        queue.add_find_request_with_status(&s, "curly", DocumentStatus::Banned).unwrap();
        queue.add_find_request_by(&s, "curly", |id, _, _| id == 1).unwrap();
        assert_eq!(queue.no_result_requests(), 1);
        assert_eq!(queue.len(), 2);
    }
}
