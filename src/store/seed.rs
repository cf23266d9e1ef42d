//! Default dataset: four categories and one canned reply for each.
//!
//! Called explicitly by the binary at startup; nothing is seeded implicitly.

use tracing::info;

use super::traits::Store;
use crate::error::StoreError;
use crate::model::{NewCategory, ResponseTemplate};

struct SeedTemplate {
    category: &'static str,
    title: &'static str,
    content: &'static str,
    keywords: &'static [&'static str],
    usage_count: u64,
    success_rate: f64,
}

const SEED_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Technical Support", "Technical issues and troubleshooting", "#1976D2"),
    ("Academic", "Academic inquiries and grade-related questions", "#388E3C"),
    ("Administrative", "Administrative processes and procedures", "#9C27B0"),
    ("General", "General information and miscellaneous", "#FF9800"),
];

const SEED_TEMPLATES: &[SeedTemplate] = &[
    SeedTemplate {
        category: "Technical Support",
        title: "Assignment Portal Access",
        content: "Hi! I can help you with accessing the assignment portal. Here are the steps:\n\
                  1. Go to the student dashboard\n\
                  2. Click on 'Assignments' in the menu\n\
                  3. Select your course from the dropdown\n\n\
                  If you continue to have issues, please contact technical support.",
        keywords: &["assignment", "portal", "access", "login", "dashboard", "help", "how", "submit"],
        usage_count: 847,
        success_rate: 0.94,
    },
    SeedTemplate {
        category: "Academic",
        title: "Grade Inquiry Response",
        content: "Thank you for your grade inquiry. To check your current grades:\n\
                  1. Log into the student portal\n\
                  2. Navigate to 'Grades' section\n\
                  3. Select the specific course\n\n\
                  If you have questions about a specific grade, please contact your instructor directly.",
        keywords: &["grade", "grades", "score", "marks", "assessment"],
        usage_count: 623,
        success_rate: 0.88,
    },
    SeedTemplate {
        category: "Administrative",
        title: "Schedule Information",
        content: "For class schedule information:\n\
                  1. Check your student portal under 'Schedule'\n\
                  2. Download the course calendar\n\
                  3. Set up calendar sync for automatic updates\n\n\
                  Class times may change, so please check regularly for updates.",
        keywords: &["schedule", "timetable", "class", "timing", "calendar"],
        usage_count: 412,
        success_rate: 0.91,
    },
    SeedTemplate {
        category: "General",
        title: "General Greeting",
        content: "Hello! Welcome to our educational support system. I'm here to help you with any questions about:\n\n\
                  • Assignment submissions and portal access\n\
                  • Grade inquiries and academic records\n\
                  • Class schedules and course information\n\
                  • Technical support for our systems\n\n\
                  How can I assist you today?",
        keywords: &["hello", "hi", "hey", "help", "support", "assist", "question"],
        usage_count: 156,
        success_rate: 0.96,
    },
];

/// Insert the default categories and templates.
///
/// Skips seeding when the store already holds categories, so calling it
/// twice is harmless. Returns whether anything was inserted.
pub async fn seed_defaults(store: &dyn Store) -> Result<bool, StoreError> {
    if !store.list_categories().await?.is_empty() {
        info!("Store already has categories, skipping seed");
        return Ok(false);
    }

    let mut categories = Vec::with_capacity(SEED_CATEGORIES.len());
    for (name, description, color) in SEED_CATEGORIES {
        let category = store
            .create_category(NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
                color: Some(color.to_string()),
            })
            .await?;
        categories.push(category);
    }

    for seed in SEED_TEMPLATES {
        let mut template = ResponseTemplate::new(
            seed.title,
            seed.content,
            seed.keywords.iter().map(|k| k.to_string()).collect(),
        )
        .with_stats(seed.usage_count, seed.success_rate);
        template.category_id = categories
            .iter()
            .find(|c| c.name == seed.category)
            .map(|c| c.id);
        store.insert_template(template).await?;
    }

    info!(
        categories = SEED_CATEGORIES.len(),
        templates = SEED_TEMPLATES.len(),
        "Seeded default dataset"
    );
    Ok(true)
}
