//! Keyword extraction and token-set similarity.
//!
//! No stemming and no dictionary beyond a fixed stop-word table: tokens are
//! lowercased, stripped of punctuation and split on whitespace.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of keywords returned by [`extract_keywords`].
pub const MAX_KEYWORDS: usize = 10;

/// Tokens must be strictly longer than this to count as keywords.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Common function words never reported as keywords.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can", "cannot", "must",
    "this", "that", "these", "those", "my", "your", "his", "its", "our", "their",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Anything that is neither an ASCII word character nor whitespace.
///
/// Word characters are ASCII only, so accented letters are stripped like
/// punctuation and the length check on what remains counts ASCII bytes.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_\s]").expect("punctuation pattern is valid"));

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Extract up to [`MAX_KEYWORDS`] keywords from free text, in order of appearance.
///
/// Duplicates are kept: a word that appears twice is reported twice.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");

    stripped
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_KEYWORD_LEN && !is_stop_word(word))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the lowercase whitespace-token sets of `a` and `b`.
///
/// Returns `0.0` when both inputs are blank (empty union).
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_content_words_in_order() {
        let keywords = extract_keywords("How do I access the assignment portal?");
        assert_eq!(keywords, vec!["access", "assignment", "portal"]);
    }

    #[test]
    fn strips_punctuation_before_splitting() {
        let keywords = extract_keywords("Login-error!!! (again), password's wrong.");
        assert_eq!(keywords, vec!["loginerror", "again", "passwords", "wrong"]);
    }

    #[test]
    fn non_ascii_letters_are_stripped() {
        assert_eq!(
            extract_keywords("Café naïve résumé façade"),
            vec!["nave", "rsum", "faade"]
        );
    }

    #[test]
    fn drops_stop_words_and_short_tokens() {
        let keywords = extract_keywords("They should have been there with their book");
        assert_eq!(keywords, vec!["there", "book"]);
        for word in &keywords {
            assert!(word.chars().count() > MIN_KEYWORD_LEN);
            assert!(!is_stop_word(word));
        }
    }

    #[test]
    fn caps_at_ten_keywords() {
        let text = "alpha bravo charlie delta echoes foxtrot golf hotel india juliet kilo lima mike";
        let keywords = extract_keywords(text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords.first().map(String::as_str), Some("alpha"));
        assert_eq!(keywords.last().map(String::as_str), Some("juliet"));
    }

    #[test]
    fn empty_text_has_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("  ?! ").is_empty());
    }

    #[test]
    fn keeps_repeated_words() {
        assert_eq!(extract_keywords("grade grade"), vec!["grade", "grade"]);
    }

    #[test]
    fn similarity_of_identical_text_is_one() {
        assert_eq!(calculate_similarity("reset my password", "Reset my PASSWORD"), 1.0);
    }

    #[test]
    fn similarity_of_disjoint_text_is_zero() {
        assert_eq!(calculate_similarity("grade inquiry", "portal login"), 0.0);
    }

    #[test]
    fn similarity_is_jaccard() {
        // {a, b, c} vs {b, c, d}: 2 shared of 4 total
        let similarity = calculate_similarity("a b c", "b c d");
        assert!((similarity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_ignores_duplicate_tokens() {
        assert_eq!(calculate_similarity("help help help", "help"), 1.0);
    }

    #[test]
    fn similarity_of_blank_inputs_is_zero() {
        assert_eq!(calculate_similarity("", "   "), 0.0);
    }
}
