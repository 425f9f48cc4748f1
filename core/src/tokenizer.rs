use crate::error::{Result, SearchError};
use std::collections::HashSet;

/// Split text into terms on runs of whitespace. Terms are compared byte for byte.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// A word is valid unless it carries a control character.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

pub fn filter_stop_words<'a>(terms: impl IntoIterator<Item = &'a str>, stop_words: &StopWords) -> Vec<&'a str> {
    terms.into_iter().filter(|t| !stop_words.contains(t)).collect()
}

/// Words excluded from indexing and querying. Fixed once the engine is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    /// Parse a whitespace separated list of stop words.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self(set))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tokenize document text and drop stop words, rejecting invalid words.
pub fn tokenize<'a>(text: &'a str, stop_words: &StopWords) -> Result<Vec<&'a str>> {
    let words = split_into_words(text);
    if let Some(bad) = words.iter().find(|w| !is_valid_word(w)) {
        return Err(SearchError::InvalidWord(bad.to_string()));
    }
    Ok(filter_stop_words(words, stop_words))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(split_into_words("  curly\tcat \n tail "), vec!["curly", "cat", "tail"]);
        assert!(split_into_words("").is_empty());
        assert!(split_into_words("   ").is_empty());
    }

    #[test]
    fn no_case_folding_or_punctuation_stripping() {
        assert_eq!(split_into_words("Cat cat, cat."), vec!["Cat", "cat,", "cat."]);
    }

    #[test]
    fn filters_stop_words_preserving_order() {
        let stop = StopWords::from_text("and in at").unwrap();
        let words = filter_stop_words(split_into_words("dog and cat in hat"), &stop);
        assert_eq!(words, vec!["dog", "cat", "hat"]);
    }

    #[test]
    fn rejects_control_characters() {
        let stop = StopWords::default();
        assert_eq!(
            tokenize("big do\u{12}g", &stop),
            Err(SearchError::InvalidWord("do\u{12}g".into()))
        );
        assert!(StopWords::from_words(["in\u{1}"]).is_err());
    }

    #[test]
    fn stop_words_ignore_empty_entries() {
        let stop = StopWords::from_words(["", "and", "and"]).unwrap();
        assert_eq!(stop.len(), 1);
        assert!(stop.contains("and"));
    }
}
