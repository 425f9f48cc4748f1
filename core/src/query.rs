use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use std::collections::BTreeSet;

/// Parsed query. A term may sit in both sets; exclusion wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus: BTreeSet<String>,
    pub minus: BTreeSet<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.plus.is_empty() && self.minus.is_empty()
    }
}

enum QueryWord<'a> {
    Plus(&'a str),
    Minus(&'a str),
}

fn parse_word(token: &str) -> Result<QueryWord<'_>> {
    if !is_valid_word(token) {
        return Err(SearchError::InvalidWord(token.to_string()));
    }
    match token.strip_prefix('-') {
        None => Ok(QueryWord::Plus(token)),
        Some(rest) if rest.is_empty() || rest.starts_with('-') => {
            Err(SearchError::MalformedQuery(token.to_string()))
        }
        Some(rest) => Ok(QueryWord::Minus(rest)),
    }
}

/// Split a raw query into plus and minus terms, dropping stop words.
///
/// A bare `-` or a doubled marker such as `--cat` is rejected rather than ignored.
pub fn parse_query(raw: &str, stop_words: &StopWords) -> Result<Query> {
    let mut query = Query::default();
    for token in split_into_words(raw) {
        match parse_word(token)? {
            QueryWord::Plus(term) if !stop_words.contains(term) => {
                query.plus.insert(term.to_string());
            }
            QueryWord::Minus(term) if !stop_words.contains(term) => {
                query.minus.insert(term.to_string());
            }
            _ => {}
        }
    }
    Ok(query)
}
