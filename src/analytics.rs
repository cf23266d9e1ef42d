//! Aggregate automation metrics over logged inquiries.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::{Category, Inquiry, InquiryStatus};

/// Default trend window.
pub const TREND_DAYS: u32 = 7;

/// Bucket for inquiries without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
const UNCATEGORIZED_COLOR: &str = "#F44336";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_inquiries: usize,
    pub automated_responses: usize,
    pub pending_inquiries: usize,
    pub escalated_inquiries: usize,
    /// Mean seconds to reply, over inquiries with a reply.
    pub avg_response_time: f64,
    /// Mean 1–5 rating, over rated inquiries.
    pub avg_satisfaction_score: f64,
    /// Share of all inquiries answered automatically.
    pub automation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Short weekday name, e.g. "Mon".
    pub day: String,
    pub date: NaiveDate,
    pub total_inquiries: usize,
    pub automated_responses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub name: String,
    pub color: String,
    pub value: usize,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Headline numbers. All zero when there are no inquiries.
pub fn dashboard_metrics(inquiries: &[Inquiry]) -> DashboardMetrics {
    let total_inquiries = inquiries.len();
    let automated_responses = inquiries.iter().filter(|i| i.is_automated).count();
    let count_status = |status| inquiries.iter().filter(|i| i.status == status).count();

    DashboardMetrics {
        total_inquiries,
        automated_responses,
        pending_inquiries: count_status(InquiryStatus::Pending),
        escalated_inquiries: count_status(InquiryStatus::Escalated),
        avg_response_time: mean(inquiries.iter().filter_map(|i| i.response_time)),
        avg_satisfaction_score: mean(inquiries.iter().filter_map(|i| i.satisfaction_score)),
        automation_rate: if total_inquiries == 0 {
            0.0
        } else {
            automated_responses as f64 / total_inquiries as f64
        },
    }
}

/// Daily totals for the `days` days ending on `today`, oldest first.
pub fn trends(inquiries: &[Inquiry], today: NaiveDate, days: u32) -> Vec<TrendPoint> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            let on_day: Vec<&Inquiry> = inquiries
                .iter()
                .filter(|i| i.created_at.date_naive() == date)
                .collect();
            TrendPoint {
                day: date.format("%a").to_string(),
                date,
                total_inquiries: on_day.len(),
                automated_responses: on_day.iter().filter(|i| i.is_automated).count(),
            }
        })
        .collect()
}

/// Inquiry count per category, in category order, plus an
/// [`UNCATEGORIZED_LABEL`] bucket when any inquiry has no known category.
pub fn category_breakdown(inquiries: &[Inquiry], categories: &[Category]) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = categories
        .iter()
        .map(|c| CategoryShare {
            name: c.name.clone(),
            color: c.color.clone(),
            value: inquiries
                .iter()
                .filter(|i| i.category_id == Some(c.id))
                .count(),
        })
        .collect();

    let uncategorized = inquiries
        .iter()
        .filter(|i| match i.category_id {
            Some(id) => !categories.iter().any(|c| c.id == id),
            None => true,
        })
        .count();
    if uncategorized > 0 {
        shares.push(CategoryShare {
            name: UNCATEGORIZED_LABEL.to_string(),
            color: UNCATEGORIZED_COLOR.to_string(),
            value: uncategorized,
        });
    }

    shares
}
