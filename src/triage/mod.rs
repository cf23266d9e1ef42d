//! Inquiry triage.
//!
//! The matching engine is pure and synchronous:
//! - `keywords` — keyword extraction and token similarity
//! - `matcher` — weighted template scoring and best-match selection
//! - `categorizer` — keyword-table category lookup
//!
//! `processor` is the async caller that persists results through the store.

pub mod categorizer;
pub mod keywords;
pub mod matcher;
pub mod processor;

pub use categorizer::categorize_inquiry;
pub use keywords::{calculate_similarity, extract_keywords};
pub use matcher::{MatchResult, find_best_match};
pub use processor::{InquiryEvent, InquiryProcessor};
