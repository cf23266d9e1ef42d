//! Backend-agnostic `Store` trait — single async interface for all persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{
    Category, CategoryPatch, Inquiry, InquiryResponse, InquiryStatus, NewCategory, NewInquiry,
    NewTemplate, ResponseTemplate, TemplatePatch,
};

/// Persistence for categories, response templates and inquiries.
///
/// Listings preserve insertion order unless stated otherwise; the matcher
/// relies on it for its first-wins tie-break.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Categories ──────────────────────────────────────────────────

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError>;

    /// Returns `None` when the category does not exist.
    async fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, StoreError>;

    /// Delete a category and detach it from templates and inquiries.
    /// Returns whether anything was deleted.
    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError>;

    // ── Response templates ──────────────────────────────────────────

    async fn list_templates(&self) -> Result<Vec<ResponseTemplate>, StoreError>;

    async fn get_template(&self, id: Uuid) -> Result<Option<ResponseTemplate>, StoreError>;

    async fn list_templates_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ResponseTemplate>, StoreError>;

    /// Case-insensitive substring search over title, content and keywords.
    async fn search_templates(&self, query: &str) -> Result<Vec<ResponseTemplate>, StoreError>;

    async fn create_template(&self, input: NewTemplate) -> Result<ResponseTemplate, StoreError>;

    /// Insert a fully built template (seeding and imports).
    async fn insert_template(&self, template: ResponseTemplate) -> Result<(), StoreError>;

    async fn update_template(
        &self,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Option<ResponseTemplate>, StoreError>;

    async fn delete_template(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Bump `usage_count` by one. Returns the new count.
    async fn increment_template_usage(&self, id: Uuid) -> Result<u64, StoreError>;

    // ── Inquiries ───────────────────────────────────────────────────

    /// Newest first, optionally capped at `limit`.
    async fn list_inquiries(&self, limit: Option<usize>) -> Result<Vec<Inquiry>, StoreError>;

    async fn get_inquiry(&self, id: Uuid) -> Result<Option<Inquiry>, StoreError>;

    /// Log a new inquiry in `Pending` state.
    async fn create_inquiry(&self, input: NewInquiry) -> Result<Inquiry, StoreError>;

    async fn set_inquiry_category(
        &self,
        id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Inquiry, StoreError>;

    /// Move an inquiry to `status`; fails with `InvalidTransition` when the
    /// current state does not allow it.
    async fn transition_inquiry(
        &self,
        id: Uuid,
        status: InquiryStatus,
    ) -> Result<Inquiry, StoreError>;

    /// Attach a reply and mark the inquiry responded. Fails with
    /// `InvalidTransition` if it was already responded to.
    async fn respond_to_inquiry(
        &self,
        id: Uuid,
        response: InquiryResponse,
    ) -> Result<Inquiry, StoreError>;

    async fn set_satisfaction(&self, id: Uuid, score: f64) -> Result<Inquiry, StoreError>;
}
