//! Inquiry processor — logs inquiries, runs the matcher and records replies.
//!
//! Flow for a new inquiry:
//! 1. Log it (pending) and annotate a category if the sender gave none
//! 2. Match against the template library
//! 3. On a match, attach the template reply and bump the template's usage
//!
//! Every state change is broadcast to live-feed subscribers.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, TriageError};
use crate::model::{Inquiry, InquiryResponse, InquiryStatus, NewInquiry, ResponseTemplate};
use crate::store::Store;
use crate::triage::categorizer::categorize_inquiry;
use crate::triage::keywords::extract_keywords;
use crate::triage::matcher::{MatchResult, find_best_match};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Satisfaction ratings are on a 1–5 scale.
const SATISFACTION_RANGE: std::ops::RangeInclusive<f64> = 1.0..=5.0;

/// Live-feed events pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InquiryEvent {
    /// Recent inquiries, sent on connect and after a lag.
    InquirySync { inquiries: Vec<Inquiry> },
    /// A new inquiry was logged.
    InquiryLogged { inquiry: Inquiry },
    /// An inquiry received a reply.
    InquiryResponded { inquiry: Inquiry },
    /// Escalation, rating or other change.
    InquiryUpdated { inquiry: Inquiry },
}

/// Owned copy of a [`MatchResult`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub template: ResponseTemplate,
    pub score: u32,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

impl From<MatchResult<'_>> for MatchSummary {
    fn from(result: MatchResult<'_>) -> Self {
        Self {
            template: result.template.clone(),
            score: result.score,
            confidence: result.confidence,
            matched_keywords: result.matched_keywords,
        }
    }
}

/// What the engine would do with a message, without persisting anything.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPreview {
    #[serde(rename = "match")]
    pub matched: Option<MatchSummary>,
    pub keywords: Vec<String>,
    pub category_id: Option<Uuid>,
}

/// A reply written by a human.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualResponse {
    /// Reply with this template's content unless `message` is given.
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub message: Option<String>,
}

pub struct InquiryProcessor {
    store: Arc<dyn Store>,
    /// Serializes list-templates → respond → bump-usage.
    match_lock: Mutex<()>,
    tx: broadcast::Sender<InquiryEvent>,
}

impl InquiryProcessor {
    pub fn new(store: Arc<dyn Store>) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            store,
            match_lock: Mutex::new(()),
            tx,
        })
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Subscribe to live inquiry events.
    pub fn subscribe(&self) -> broadcast::Receiver<InquiryEvent> {
        self.tx.subscribe()
    }

    /// Snapshot event with the `limit` most recent inquiries.
    pub async fn sync_event(&self, limit: usize) -> Result<InquiryEvent, StoreError> {
        let inquiries = self.store.list_inquiries(Some(limit)).await?;
        Ok(InquiryEvent::InquirySync { inquiries })
    }

    fn publish(&self, event: InquiryEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }

    /// Log an inquiry and answer it automatically when a template matches.
    pub async fn submit(&self, input: NewInquiry) -> Result<Inquiry, TriageError> {
        let mut inquiry = self.store.create_inquiry(input).await?;

        if inquiry.category_id.is_none() {
            let categories = self.store.list_categories().await?;
            if let Some(category_id) = categorize_inquiry(&inquiry.message, &categories) {
                inquiry = self
                    .store
                    .set_inquiry_category(inquiry.id, Some(category_id))
                    .await?;
            }
        }

        info!(
            inquiry_id = %inquiry.id,
            sender = %inquiry.sender_name,
            category_id = ?inquiry.category_id,
            "Inquiry received"
        );
        self.publish(InquiryEvent::InquiryLogged {
            inquiry: inquiry.clone(),
        });

        let _guard = self.match_lock.lock().await;
        let templates = self.store.list_templates().await?;

        let Some(matched) = find_best_match(&inquiry.message, &templates) else {
            info!(inquiry_id = %inquiry.id, "No template matched, left pending");
            return Ok(inquiry);
        };

        let template_id = matched.template.id;
        let confidence = matched.confidence;
        let response = InquiryResponse {
            template_id: Some(template_id),
            message: matched.template.content.clone(),
            confidence: Some(confidence),
            matched_keywords: matched.matched_keywords,
            is_automated: true,
            responded_at: Utc::now(),
        };

        let inquiry = self.store.respond_to_inquiry(inquiry.id, response).await?;

        // The reply is committed; a template deleted since matching only loses its usage bump
        match self.store.increment_template_usage(template_id).await {
            Ok(usage_count) => info!(
                inquiry_id = %inquiry.id,
                template_id = %template_id,
                confidence,
                usage_count,
                "Automated response sent"
            ),
            Err(e) => warn!(
                inquiry_id = %inquiry.id,
                template_id = %template_id,
                confidence,
                error = %e,
                "Automated response sent, usage count not updated"
            ),
        }
        self.publish(InquiryEvent::InquiryResponded {
            inquiry: inquiry.clone(),
        });

        Ok(inquiry)
    }

    /// Hand an inquiry to a human.
    pub async fn escalate(&self, id: Uuid) -> Result<Inquiry, TriageError> {
        let inquiry = self
            .store
            .transition_inquiry(id, InquiryStatus::Escalated)
            .await?;
        self.publish(InquiryEvent::InquiryUpdated {
            inquiry: inquiry.clone(),
        });
        Ok(inquiry)
    }

    /// Attach a human-written reply.
    pub async fn respond_manually(
        &self,
        id: Uuid,
        reply: ManualResponse,
    ) -> Result<Inquiry, TriageError> {
        let custom = reply
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let message = match (reply.template_id, custom) {
            (_, Some(message)) => message,
            (Some(template_id), None) => {
                self.store
                    .get_template(template_id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("template", template_id))?
                    .content
            }
            (None, None) => return Err(TriageError::EmptyResponse),
        };

        let response = InquiryResponse {
            template_id: reply.template_id,
            message,
            confidence: None,
            matched_keywords: Vec::new(),
            is_automated: false,
            responded_at: Utc::now(),
        };
        let inquiry = self.store.respond_to_inquiry(id, response).await?;

        info!(inquiry_id = %id, template_id = ?inquiry.response_template_id, "Manual response recorded");
        self.publish(InquiryEvent::InquiryResponded {
            inquiry: inquiry.clone(),
        });
        Ok(inquiry)
    }

    /// Record a 1–5 satisfaction rating.
    pub async fn rate(&self, id: Uuid, score: f64) -> Result<Inquiry, TriageError> {
        if !SATISFACTION_RANGE.contains(&score) {
            return Err(TriageError::ScoreOutOfRange(score));
        }
        let inquiry = self.store.set_satisfaction(id, score).await?;
        debug!(inquiry_id = %id, score, "Satisfaction recorded");
        self.publish(InquiryEvent::InquiryUpdated {
            inquiry: inquiry.clone(),
        });
        Ok(inquiry)
    }

    /// Run the engine on a draft message.
    pub async fn preview(&self, message: &str) -> Result<MatchPreview, TriageError> {
        let templates = self.store.list_templates().await?;
        let categories = self.store.list_categories().await?;

        Ok(MatchPreview {
            matched: find_best_match(message, &templates).map(MatchSummary::from),
            keywords: extract_keywords(message),
            category_id: categorize_inquiry(message, &categories),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, seed_defaults};

    async fn seeded() -> (Arc<MemoryStore>, Arc<InquiryProcessor>) {
        let store = MemoryStore::new();
        seed_defaults(store.as_ref()).await.unwrap();
        let processor = InquiryProcessor::new(store.clone());
        (store, processor)
    }

    fn new_inquiry(message: &str) -> NewInquiry {
        NewInquiry {
            message: message.into(),
            sender_name: "Alice".into(),
            sender_email: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn matched_inquiry_is_answered_and_usage_bumped() {
        let (store, processor) = seeded().await;
        let before = store
            .list_templates()
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.title == "Assignment Portal Access")
            .unwrap();

        let inquiry = processor
            .submit(new_inquiry("How do I access the assignment portal?"))
            .await
            .unwrap();

        assert_eq!(inquiry.status, InquiryStatus::Responded);
        assert!(inquiry.is_automated);
        assert_eq!(inquiry.response_template_id, Some(before.id));
        assert_eq!(inquiry.response_message.as_deref(), Some(before.content.as_str()));
        assert!(inquiry.confidence.unwrap() >= 0.3);
        assert!(inquiry.response_time.is_some());
        assert!(inquiry.responded_at.is_some());

        let after = store.get_template(before.id).await.unwrap().unwrap();
        assert_eq!(after.usage_count, before.usage_count + 1);
    }

    #[tokio::test]
    async fn unmatched_inquiry_stays_pending() {
        let (_store, processor) = seeded().await;
        let inquiry = processor.submit(new_inquiry("xyz")).await.unwrap();
        assert_eq!(inquiry.status, InquiryStatus::Pending);
        assert!(!inquiry.is_automated);
        assert!(inquiry.response_template_id.is_none());
    }

    #[tokio::test]
    async fn inquiry_gets_category_annotation() {
        let (store, processor) = seeded().await;
        let technical = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Technical Support")
            .unwrap();
        let inquiry = processor
            .submit(new_inquiry("I forgot my login password"))
            .await
            .unwrap();
        assert_eq!(inquiry.category_id, Some(technical.id));
    }

    #[tokio::test]
    async fn sender_category_is_kept() {
        let (store, processor) = seeded().await;
        let general = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == "General")
            .unwrap();
        let mut input = new_inquiry("I forgot my login password");
        input.category_id = Some(general.id);
        let inquiry = processor.submit(input).await.unwrap();
        assert_eq!(inquiry.category_id, Some(general.id));
    }

    #[tokio::test]
    async fn submit_broadcasts_logged_then_responded() {
        let (_store, processor) = seeded().await;
        let mut rx = processor.subscribe();

        processor
            .submit(new_inquiry("How do I access the assignment portal?"))
            .await
            .unwrap();

        assert!(matches!(rx.recv().await.unwrap(), InquiryEvent::InquiryLogged { .. }));
        assert!(matches!(rx.recv().await.unwrap(), InquiryEvent::InquiryResponded { .. }));
    }

    #[tokio::test]
    async fn escalate_then_manual_reply() {
        let (_store, processor) = seeded().await;
        let inquiry = processor.submit(new_inquiry("xyz")).await.unwrap();

        let escalated = processor.escalate(inquiry.id).await.unwrap();
        assert_eq!(escalated.status, InquiryStatus::Escalated);

        let responded = processor
            .respond_manually(
                inquiry.id,
                ManualResponse {
                    template_id: None,
                    message: Some("We'll look into it.".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(responded.status, InquiryStatus::Responded);
        assert!(!responded.is_automated);
        assert_eq!(responded.response_message.as_deref(), Some("We'll look into it."));
    }

    #[tokio::test]
    async fn cannot_escalate_answered_inquiry() {
        let (_store, processor) = seeded().await;
        let inquiry = processor
            .submit(new_inquiry("How do I access the assignment portal?"))
            .await
            .unwrap();
        let result = processor.escalate(inquiry.id).await;
        assert!(matches!(
            result,
            Err(TriageError::Store(StoreError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn manual_reply_with_template_uses_its_content() {
        let (store, processor) = seeded().await;
        let template = store.list_templates().await.unwrap().remove(1);
        let inquiry = processor.submit(new_inquiry("xyz")).await.unwrap();

        let responded = processor
            .respond_manually(
                inquiry.id,
                ManualResponse {
                    template_id: Some(template.id),
                    message: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(responded.response_template_id, Some(template.id));
        assert_eq!(responded.response_message, Some(template.content));
    }

    #[tokio::test]
    async fn manual_reply_needs_content() {
        let (_store, processor) = seeded().await;
        let inquiry = processor.submit(new_inquiry("xyz")).await.unwrap();
        let result = processor
            .respond_manually(
                inquiry.id,
                ManualResponse {
                    template_id: None,
                    message: Some("   ".into()),
                },
            )
            .await;
        assert!(matches!(result, Err(TriageError::EmptyResponse)));
    }

    #[tokio::test]
    async fn rating_must_be_in_range() {
        let (_store, processor) = seeded().await;
        let inquiry = processor.submit(new_inquiry("xyz")).await.unwrap();

        assert!(matches!(
            processor.rate(inquiry.id, 6.0).await,
            Err(TriageError::ScoreOutOfRange(_))
        ));
        assert!(matches!(
            processor.rate(inquiry.id, 0.0).await,
            Err(TriageError::ScoreOutOfRange(_))
        ));
        let rated = processor.rate(inquiry.id, 4.0).await.unwrap();
        assert_eq!(rated.satisfaction_score, Some(4.0));
    }

    #[tokio::test]
    async fn preview_does_not_persist() {
        let (store, processor) = seeded().await;
        let preview = processor
            .preview("How do I access the assignment portal?")
            .await
            .unwrap();

        let matched = preview.matched.unwrap();
        assert_eq!(matched.template.title, "Assignment Portal Access");
        assert_eq!(preview.keywords, vec!["access", "assignment", "portal"]);
        assert!(preview.category_id.is_some());
        assert!(store.list_inquiries(None).await.unwrap().is_empty());
    }

    /// Delegates to a seeded `MemoryStore`, except that the matched template
    /// is deleted right before its usage bump, as a concurrent DELETE would.
    struct TemplateDeletedMidMatch {
        inner: Arc<MemoryStore>,
    }

    #[async_trait::async_trait]
    impl Store for TemplateDeletedMidMatch {
        async fn list_categories(&self) -> Result<Vec<crate::model::Category>, StoreError> {
            self.inner.list_categories().await
        }
        async fn get_category(&self, id: Uuid) -> Result<Option<crate::model::Category>, StoreError> {
            self.inner.get_category(id).await
        }
        async fn create_category(
            &self,
            input: crate::model::NewCategory,
        ) -> Result<crate::model::Category, StoreError> {
            self.inner.create_category(input).await
        }
        async fn update_category(
            &self,
            id: Uuid,
            patch: crate::model::CategoryPatch,
        ) -> Result<Option<crate::model::Category>, StoreError> {
            self.inner.update_category(id, patch).await
        }
        async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError> {
            self.inner.delete_category(id).await
        }
        async fn list_templates(&self) -> Result<Vec<ResponseTemplate>, StoreError> {
            self.inner.list_templates().await
        }
        async fn get_template(&self, id: Uuid) -> Result<Option<ResponseTemplate>, StoreError> {
            self.inner.get_template(id).await
        }
        async fn list_templates_by_category(
            &self,
            category_id: Uuid,
        ) -> Result<Vec<ResponseTemplate>, StoreError> {
            self.inner.list_templates_by_category(category_id).await
        }
        async fn search_templates(&self, query: &str) -> Result<Vec<ResponseTemplate>, StoreError> {
            self.inner.search_templates(query).await
        }
        async fn create_template(
            &self,
            input: crate::model::NewTemplate,
        ) -> Result<ResponseTemplate, StoreError> {
            self.inner.create_template(input).await
        }
        async fn insert_template(&self, template: ResponseTemplate) -> Result<(), StoreError> {
            self.inner.insert_template(template).await
        }
        async fn update_template(
            &self,
            id: Uuid,
            patch: crate::model::TemplatePatch,
        ) -> Result<Option<ResponseTemplate>, StoreError> {
            self.inner.update_template(id, patch).await
        }
        async fn delete_template(&self, id: Uuid) -> Result<bool, StoreError> {
            self.inner.delete_template(id).await
        }
        async fn increment_template_usage(&self, id: Uuid) -> Result<u64, StoreError> {
            self.inner.delete_template(id).await?;
            self.inner.increment_template_usage(id).await
        }
        async fn list_inquiries(&self, limit: Option<usize>) -> Result<Vec<Inquiry>, StoreError> {
            self.inner.list_inquiries(limit).await
        }
        async fn get_inquiry(&self, id: Uuid) -> Result<Option<Inquiry>, StoreError> {
            self.inner.get_inquiry(id).await
        }
        async fn create_inquiry(&self, input: NewInquiry) -> Result<Inquiry, StoreError> {
            self.inner.create_inquiry(input).await
        }
        async fn set_inquiry_category(
            &self,
            id: Uuid,
            category_id: Option<Uuid>,
        ) -> Result<Inquiry, StoreError> {
            self.inner.set_inquiry_category(id, category_id).await
        }
        async fn transition_inquiry(
            &self,
            id: Uuid,
            status: InquiryStatus,
        ) -> Result<Inquiry, StoreError> {
            self.inner.transition_inquiry(id, status).await
        }
        async fn respond_to_inquiry(
            &self,
            id: Uuid,
            response: InquiryResponse,
        ) -> Result<Inquiry, StoreError> {
            self.inner.respond_to_inquiry(id, response).await
        }
        async fn set_satisfaction(&self, id: Uuid, score: f64) -> Result<Inquiry, StoreError> {
            self.inner.set_satisfaction(id, score).await
        }
    }

    #[tokio::test]
    async fn reply_survives_template_deleted_before_usage_bump() {
        let (inner, _) = seeded().await;
        let processor = InquiryProcessor::new(Arc::new(TemplateDeletedMidMatch {
            inner: inner.clone(),
        }));
        let mut rx = processor.subscribe();

        let inquiry = processor
            .submit(new_inquiry("How do I access the assignment portal?"))
            .await
            .unwrap();

        assert_eq!(inquiry.status, InquiryStatus::Responded);
        assert!(inquiry.is_automated);
        let template_id = inquiry.response_template_id.unwrap();
        assert!(inner.get_template(template_id).await.unwrap().is_none());

        let stored = inner.get_inquiry(inquiry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InquiryStatus::Responded);

        assert!(matches!(rx.recv().await.unwrap(), InquiryEvent::InquiryLogged { .. }));
        match rx.recv().await.unwrap() {
            InquiryEvent::InquiryResponded { inquiry: sent } => assert_eq!(sent.id, inquiry.id),
            other => panic!("expected InquiryResponded, got {other:?}"),
        }
    }
}
