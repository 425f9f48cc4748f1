pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod paginator;
pub mod predicate;
pub mod query;
pub mod request_queue;
pub mod server;
pub mod tokenizer;

pub use config::EngineConfig;
pub use document::{DocId, Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::InvertedIndex;
pub use server::SearchServer;
