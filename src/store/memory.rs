//! In-memory `Store` — insertion-ordered tables behind tokio `RwLock`s.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::traits::Store;
use crate::error::StoreError;
use crate::model::{
    Category, CategoryPatch, Inquiry, InquiryResponse, InquiryStatus, NewCategory, NewInquiry,
    NewTemplate, ResponseTemplate, TemplatePatch,
};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    categories: RwLock<Vec<Category>>,
    templates: RwLock<Vec<ResponseTemplate>>,
    inquiries: RwLock<Vec<Inquiry>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ── Categories ──────────────────────────────────────────────────

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.read().await.clone())
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let categories = self.categories.read().await;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError> {
        input.validate()?;
        let category = input.into_category();
        self.categories.write().await.push(category.clone());
        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, StoreError> {
        patch.validate()?;
        let mut categories = self.categories.write().await;
        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        patch.apply(category);
        debug!(category_id = %id, "Category updated");
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError> {
        {
            let mut categories = self.categories.write().await;
            let before = categories.len();
            categories.retain(|c| c.id != id);
            if categories.len() == before {
                return Ok(false);
            }
        }

        let mut detached = 0;
        for template in self.templates.write().await.iter_mut() {
            if template.category_id == Some(id) {
                template.category_id = None;
                detached += 1;
            }
        }
        for inquiry in self.inquiries.write().await.iter_mut() {
            if inquiry.category_id == Some(id) {
                inquiry.category_id = None;
                detached += 1;
            }
        }

        info!(category_id = %id, detached, "Category deleted");
        Ok(true)
    }

    // ── Response templates ──────────────────────────────────────────

    async fn list_templates(&self) -> Result<Vec<ResponseTemplate>, StoreError> {
        Ok(self.templates.read().await.clone())
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<ResponseTemplate>, StoreError> {
        let templates = self.templates.read().await;
        Ok(templates.iter().find(|t| t.id == id).cloned())
    }

    async fn list_templates_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<ResponseTemplate>, StoreError> {
        let templates = self.templates.read().await;
        Ok(templates
            .iter()
            .filter(|t| t.category_id == Some(category_id))
            .cloned()
            .collect())
    }

    async fn search_templates(&self, query: &str) -> Result<Vec<ResponseTemplate>, StoreError> {
        let query = query.to_lowercase();
        let templates = self.templates.read().await;
        Ok(templates
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query)
                    || t.content.to_lowercase().contains(&query)
                    || t.keywords.iter().any(|k| k.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }

    async fn create_template(&self, input: NewTemplate) -> Result<ResponseTemplate, StoreError> {
        input.validate()?;
        let template = input.into_template();
        self.insert_template(template.clone()).await?;
        Ok(template)
    }

    async fn insert_template(&self, template: ResponseTemplate) -> Result<(), StoreError> {
        info!(
            template_id = %template.id,
            title = %template.title,
            keywords = template.keywords.len(),
            "Template created"
        );
        self.templates.write().await.push(template);
        Ok(())
    }

    async fn update_template(
        &self,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Option<ResponseTemplate>, StoreError> {
        patch.validate()?;
        let mut templates = self.templates.write().await;
        let Some(template) = templates.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply(template);
        debug!(template_id = %id, "Template updated");
        Ok(Some(template.clone()))
    }

    async fn delete_template(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut templates = self.templates.write().await;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        let deleted = templates.len() != before;
        if deleted {
            info!(template_id = %id, "Template deleted");
        }
        Ok(deleted)
    }

    async fn increment_template_usage(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut templates = self.templates.write().await;
        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("template", id))?;
        template.usage_count += 1;
        template.updated_at = Utc::now();
        Ok(template.usage_count)
    }

    // ── Inquiries ───────────────────────────────────────────────────

    async fn list_inquiries(&self, limit: Option<usize>) -> Result<Vec<Inquiry>, StoreError> {
        let inquiries = self.inquiries.read().await;
        // Stored oldest first; reversing keeps later inserts first on equal timestamps.
        let mut newest_first: Vec<Inquiry> = inquiries.iter().rev().cloned().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            newest_first.truncate(limit);
        }
        Ok(newest_first)
    }

    async fn get_inquiry(&self, id: Uuid) -> Result<Option<Inquiry>, StoreError> {
        let inquiries = self.inquiries.read().await;
        Ok(inquiries.iter().find(|i| i.id == id).cloned())
    }

    async fn create_inquiry(&self, input: NewInquiry) -> Result<Inquiry, StoreError> {
        input.validate()?;
        let inquiry = input.into_inquiry();
        self.inquiries.write().await.push(inquiry.clone());
        debug!(inquiry_id = %inquiry.id, sender = %inquiry.sender_name, "Inquiry logged");
        Ok(inquiry)
    }

    async fn set_inquiry_category(
        &self,
        id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Inquiry, StoreError> {
        let mut inquiries = self.inquiries.write().await;
        let inquiry = find_inquiry(&mut inquiries, id)?;
        inquiry.category_id = category_id;
        Ok(inquiry.clone())
    }

    async fn transition_inquiry(
        &self,
        id: Uuid,
        status: InquiryStatus,
    ) -> Result<Inquiry, StoreError> {
        let mut inquiries = self.inquiries.write().await;
        let inquiry = find_inquiry(&mut inquiries, id)?;
        // Responded carries a reply; it only goes through respond_to_inquiry.
        if status == InquiryStatus::Responded || !inquiry.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                id,
                state: inquiry.status,
                target: status,
            });
        }
        inquiry.status = status;
        info!(inquiry_id = %id, status = %status, "Inquiry status changed");
        Ok(inquiry.clone())
    }

    async fn respond_to_inquiry(
        &self,
        id: Uuid,
        response: InquiryResponse,
    ) -> Result<Inquiry, StoreError> {
        let mut inquiries = self.inquiries.write().await;
        let inquiry = find_inquiry(&mut inquiries, id)?;
        if !inquiry.status.can_transition_to(InquiryStatus::Responded) {
            return Err(StoreError::InvalidTransition {
                id,
                state: inquiry.status,
                target: InquiryStatus::Responded,
            });
        }
        response.apply(inquiry);
        Ok(inquiry.clone())
    }

    async fn set_satisfaction(&self, id: Uuid, score: f64) -> Result<Inquiry, StoreError> {
        let mut inquiries = self.inquiries.write().await;
        let inquiry = find_inquiry(&mut inquiries, id)?;
        inquiry.satisfaction_score = Some(score);
        Ok(inquiry.clone())
    }
}

fn find_inquiry(inquiries: &mut [Inquiry], id: Uuid) -> Result<&mut Inquiry, StoreError> {
    inquiries
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| StoreError::not_found("inquiry", id))
}
