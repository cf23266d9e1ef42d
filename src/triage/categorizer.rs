//! Keyword-table categorizer.
//!
//! Maps a message to a category by checking its extracted keywords against
//! fixed keyword lists in priority order. The first list that overlaps wins,
//! and the category is then found by a case-insensitive substring match on
//! category names.

use uuid::Uuid;

use crate::model::Category;
use crate::triage::keywords::extract_keywords;

/// One row of the classification table.
#[derive(Debug)]
pub struct CategoryRule {
    /// Lowercase fragment looked up in category names.
    pub name_fragment: &'static str,
    pub keywords: &'static [&'static str],
}

/// Classification table, highest priority first.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name_fragment: "technical",
        keywords: &[
            "login", "password", "access", "portal", "system", "error", "bug", "technical",
        ],
    },
    CategoryRule {
        name_fragment: "academic",
        keywords: &["grade", "assignment", "exam", "test", "homework", "course", "class"],
    },
    CategoryRule {
        name_fragment: "admin",
        keywords: &["schedule", "registration", "enrollment", "fee", "payment", "deadline"],
    },
];

/// Fallback category name fragment when no rule fires.
pub const GENERAL_FRAGMENT: &str = "general";

/// First rule whose keyword list overlaps `keywords`.
pub fn classify_keywords(keywords: &[String]) -> Option<&'static CategoryRule> {
    CATEGORY_RULES
        .iter()
        .find(|rule| keywords.iter().any(|k| rule.keywords.contains(&k.as_str())))
}

/// First category whose name contains `fragment`, ignoring case.
pub fn find_category_by_fragment(categories: &[Category], fragment: &str) -> Option<Uuid> {
    categories
        .iter()
        .find(|c| c.name.to_lowercase().contains(fragment))
        .map(|c| c.id)
}

/// Pick a category id for `message`.
///
/// When a rule fires but no category name carries its fragment the result is
/// `None`; the general fallback applies only when no rule fires.
pub fn categorize_inquiry(message: &str, categories: &[Category]) -> Option<Uuid> {
    let keywords = extract_keywords(message);

    match classify_keywords(&keywords) {
        Some(rule) => find_category_by_fragment(categories, rule.name_fragment),
        None => find_category_by_fragment(categories, GENERAL_FRAGMENT),
    }
}
