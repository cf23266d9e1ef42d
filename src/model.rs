//! Triage data model — categories, response templates, inquiries.
//!
//! Wire format is camelCase to match the dashboard client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Colour assigned to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#1976D2";

// ── Category ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            color: color.into(),
            created_at: Utc::now(),
        }
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_text("category", "name", &self.name)
    }

    pub fn into_category(self) -> Category {
        Category::new(
            self.name.trim(),
            self.description,
            self.color.unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
        )
    }
}

/// Partial category update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        match &self.name {
            Some(name) => require_text("category", "name", name),
            None => Ok(()),
        }
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
        if let Some(color) = self.color {
            category.color = color;
        }
    }
}

// ── Response template ───────────────────────────────────────────────

/// A canned reply the matcher can pick for an inquiry.
///
/// `usage_count` is bumped by the inquiry processor after an automated
/// response; `success_rate` is maintained outside the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTemplate {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub keywords: Vec<String>,
    pub usage_count: u64,
    pub success_rate: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResponseTemplate {
    pub fn new(title: impl Into<String>, content: impl Into<String>, keywords: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            category_id: None,
            keywords: normalize_keywords(keywords),
            usage_count: 0,
            success_rate: 0.0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_stats(mut self, usage_count: u64, success_rate: f64) -> Self {
        self.usage_count = usage_count;
        self.success_rate = success_rate;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewTemplate {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_text("template", "title", &self.title)?;
        require_text("template", "content", &self.content)
    }

    pub fn into_template(self) -> ResponseTemplate {
        let mut template = ResponseTemplate::new(self.title.trim(), self.content, self.keywords);
        template.category_id = self.category_id;
        template.is_active = self.is_active;
        template
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
    pub keywords: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl TemplatePatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            require_text("template", "title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("template", "content", content)?;
        }
        Ok(())
    }

    pub fn apply(self, template: &mut ResponseTemplate) {
        if let Some(title) = self.title {
            template.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            template.content = content;
        }
        if let Some(category_id) = self.category_id {
            template.category_id = Some(category_id);
        }
        if let Some(keywords) = self.keywords {
            template.keywords = normalize_keywords(keywords);
        }
        if let Some(is_active) = self.is_active {
            template.is_active = is_active;
        }
        template.updated_at = Utc::now();
    }
}

/// Drop blank keywords, which would be a substring of every message.
/// Others are kept as written: surrounding spaces are part of the match.
pub fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .filter(|k| !k.trim().is_empty())
        .collect()
}

// ── Inquiry ─────────────────────────────────────────────────────────

/// Lifecycle state of an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    /// Logged, no reply yet.
    Pending,
    /// A reply was attached (automated or manual). Terminal.
    Responded,
    /// Handed to a human; may still be responded to.
    Escalated,
}

impl InquiryStatus {
    pub fn can_transition_to(self, target: InquiryStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Responded)
                | (Self::Pending, Self::Escalated)
                | (Self::Escalated, Self::Responded)
        )
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Responded => write!(f, "responded"),
            Self::Escalated => write!(f, "escalated"),
        }
    }
}

/// A logged support message and, once answered, its reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub message: String,
    pub sender_name: String,
    pub sender_email: Option<String>,
    pub category_id: Option<Uuid>,
    pub response_template_id: Option<Uuid>,
    pub response_message: Option<String>,
    /// Seconds between logging and reply.
    pub response_time: Option<f64>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    pub is_automated: bool,
    pub satisfaction_score: Option<f64>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Inquiry {
    pub fn new(message: impl Into<String>, sender_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            sender_name: sender_name.into(),
            sender_email: None,
            category_id: None,
            response_template_id: None,
            response_message: None,
            response_time: None,
            confidence: None,
            matched_keywords: Vec::new(),
            is_automated: false,
            satisfaction_score: None,
            status: InquiryStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub message: String,
    pub sender_name: String,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

impl NewInquiry {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_text("inquiry", "message", &self.message)?;
        require_text("inquiry", "senderName", &self.sender_name)
    }

    pub fn into_inquiry(self) -> Inquiry {
        let mut inquiry = Inquiry::new(self.message.trim(), self.sender_name.trim());
        inquiry.sender_email = self.sender_email;
        inquiry.category_id = self.category_id;
        inquiry
    }
}

/// The reply attached when an inquiry moves to `Responded`.
#[derive(Debug, Clone)]
pub struct InquiryResponse {
    pub template_id: Option<Uuid>,
    pub message: String,
    pub confidence: Option<f64>,
    pub matched_keywords: Vec<String>,
    pub is_automated: bool,
    pub responded_at: DateTime<Utc>,
}

impl InquiryResponse {
    /// Apply to an inquiry, recording the elapsed time since it was logged.
    pub fn apply(self, inquiry: &mut Inquiry) {
        let elapsed = self
            .responded_at
            .signed_duration_since(inquiry.created_at)
            .num_milliseconds()
            .max(0) as f64
            / 1000.0;
        inquiry.response_template_id = self.template_id;
        inquiry.response_message = Some(self.message);
        inquiry.response_time = Some(elapsed);
        inquiry.confidence = self.confidence;
        inquiry.matched_keywords = self.matched_keywords;
        inquiry.is_automated = self.is_automated;
        inquiry.status = InquiryStatus::Responded;
        inquiry.responded_at = Some(self.responded_at);
    }
}

fn require_text(entity: &str, field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(entity, format!("{field} must not be blank")));
    }
    Ok(())
}
