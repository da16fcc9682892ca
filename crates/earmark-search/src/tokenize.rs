use regex::Regex;
use std::sync::LazyLock;

use crate::stopwords::is_stop_word;

/// Runs of two or more word characters.
#[allow(clippy::expect_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Splits descriptions into lower-cased terms.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Tokenizer {
    /// Tokenizer that drops English stop words.
    #[must_use]
    pub fn english() -> Self {
        Self { stop_words: true }
    }

    /// Tokenizer that keeps every term.
    #[must_use]
    pub fn without_stop_words() -> Self {
        Self { stop_words: false }
    }

    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|term| !(self.stop_words && is_stop_word(term)))
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        let tokens = Tokenizer::without_stop_words().tokenize("Space-Opera, EPIC journey!");
        assert_eq!(tokens, vec!["space", "opera", "epic", "journey"]);
    }

    #[test]
    fn test_drops_single_characters() {
        let tokens = Tokenizer::without_stop_words().tokenize("a b cd 7 42");
        assert_eq!(tokens, vec!["cd", "42"]);
    }

    #[test]
    fn test_english_removes_stop_words() {
        let tokens = Tokenizer::english().tokenize("The history of the world in ten chapters");
        assert_eq!(tokens, vec!["history", "world", "chapters"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(Tokenizer::english().tokenize("   ").is_empty());
    }
}
