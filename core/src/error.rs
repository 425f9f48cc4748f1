use crate::DocId;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("document {0} already exists")]
    DuplicateId(DocId),

    #[error("document {0} not found")]
    UnknownId(DocId),

    #[error("malformed query term: {0:?}")]
    MalformedQuery(String),

    #[error("word contains control characters: {0:?}")]
    InvalidWord(String),
}
