//! Inquiry-to-template matcher.
//!
//! Scores every active template against a message with three substring passes
//! and returns the best candidate whose confidence clears [`MIN_CONFIDENCE`]:
//! - template keywords → [`KEYWORD_WEIGHT`] each
//! - title words longer than [`TITLE_MIN_LEN`] → [`TITLE_WEIGHT`] each
//! - content words longer than [`CONTENT_MIN_LEN`] → [`CONTENT_WEIGHT`] each
//!
//! Scores are not normalised by template size, so templates with long keyword
//! lists or long bodies are favoured.

use serde::Serialize;
use tracing::debug;

use crate::model::ResponseTemplate;

pub const KEYWORD_WEIGHT: u32 = 3;
pub const TITLE_WEIGHT: u32 = 2;
pub const CONTENT_WEIGHT: u32 = 1;

/// Title words must be strictly longer than this.
pub const TITLE_MIN_LEN: usize = 3;
/// Content words must be strictly longer than this.
pub const CONTENT_MIN_LEN: usize = 4;

/// Matches below this confidence are reported as no match.
pub const MIN_CONFIDENCE: f64 = 0.3;

/// Raw score of one template against one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateScore {
    pub score: u32,
    /// Template keywords found in the message, in template order.
    pub matched_keywords: Vec<String>,
}

/// The winning template for a message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'a> {
    pub template: &'a ResponseTemplate,
    pub score: u32,
    /// `score / word_count(message)`, capped at 1.0.
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

/// Score a template against an already-lowercased message.
///
/// Ignores `is_active`; filtering is the caller's job.
pub fn score_template(message_lower: &str, template: &ResponseTemplate) -> TemplateScore {
    let mut result = TemplateScore::default();

    for keyword in &template.keywords {
        if message_lower.contains(&keyword.to_lowercase()) {
            result.score += KEYWORD_WEIGHT;
            result.matched_keywords.push(keyword.clone());
        }
    }

    result.score += word_pass(message_lower, &template.title, TITLE_MIN_LEN, TITLE_WEIGHT);
    result.score += word_pass(message_lower, &template.content, CONTENT_MIN_LEN, CONTENT_WEIGHT);

    result
}

/// Sum `weight` for each word of `text` longer than `min_len` that occurs in the message.
fn word_pass(message_lower: &str, text: &str, min_len: usize, weight: u32) -> u32 {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > min_len && message_lower.contains(word))
        .map(|_| weight)
        .sum()
}

/// Confidence for a raw score against a message of `word_count` tokens.
pub fn confidence(score: u32, word_count: usize) -> f64 {
    (score as f64 / word_count.max(1) as f64).min(1.0)
}

/// Pick the best active template for `message`.
///
/// A candidate replaces the running best only when its score is strictly
/// higher and its confidence is at least [`MIN_CONFIDENCE`]; ties keep the
/// earlier template. Returns `None` when nothing qualifies.
pub fn find_best_match<'a>(
    message: &str,
    templates: &'a [ResponseTemplate],
) -> Option<MatchResult<'a>> {
    let message_lower = message.to_lowercase();
    let word_count = message_lower.split_whitespace().count();

    let mut best: Option<MatchResult<'a>> = None;
    let mut highest_score = 0;

    for template in templates.iter().filter(|t| t.is_active) {
        let scored = score_template(&message_lower, template);
        let confidence = confidence(scored.score, word_count);

        if scored.score > highest_score && confidence >= MIN_CONFIDENCE {
            highest_score = scored.score;
            best = Some(MatchResult {
                template,
                score: scored.score,
                confidence,
                matched_keywords: scored.matched_keywords,
            });
        }
    }

    match &best {
        Some(m) => debug!(
            template_id = %m.template.id,
            score = m.score,
            confidence = m.confidence,
            "Template matched"
        ),
        None => debug!(candidates = templates.len(), "No template cleared the confidence floor"),
    }

    best
}
