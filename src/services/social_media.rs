//! Social media reports for a disaster, with a simple needs/offers triage.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{bounded, ProducerError};
use crate::cache::{CacheKey, CacheManager, TEXT_TTL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaReport {
    pub id: String,
    pub content: String,
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub disaster_id: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaFeed {
    pub source: String,
    pub reports: Vec<SocialMediaReport>,
    pub timestamp: DateTime<Utc>,
}

/// Excerpt of a report placed in one of the analysis buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub content: String,
    pub user: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Neutral,
    Positive,
    Concerning,
    Critical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriorityCount {
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAnalysis {
    pub needs: Vec<ReportSummary>,
    pub offers: Vec<ReportSummary>,
    pub alerts: Vec<ReportSummary>,
    pub sentiment: Sentiment,
    pub priority_count: PriorityCount,
}

const MOCK_REPORTS: [(&str, &str, Priority); 5] = [
    ("#floodrelief Need food and water in Manhattan, NYC", "citizen1", Priority::High),
    (
        "Emergency shelter available at Lower East Side, NYC. Contact 555-0123",
        "responder1",
        Priority::Medium,
    ),
    ("Roads blocked due to flooding. Avoid Brooklyn, NYC area", "volunteer1", Priority::High),
    ("Medical supplies needed at Queens, NYC. Urgent!", "citizen2", Priority::Urgent),
    ("Power restored in Bronx, NYC area. Relief efforts continuing", "reliefAdmin", Priority::Low),
];

/// Lowercases, trims, sorts and dedups keywords so equivalent queries share
/// one cache entry.
pub fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Mock reports for `disaster_id`, keeping those matching any keyword.
pub fn mock_reports(disaster_id: &str, keywords: &[String], now: DateTime<Utc>) -> Vec<SocialMediaReport> {
    MOCK_REPORTS
        .iter()
        .enumerate()
        .filter(|(_, (content, _, _))| {
            let content = content.to_lowercase();
            keywords.is_empty() || keywords.iter().any(|k| content.contains(k.as_str()))
        })
        .map(|(i, (content, user, priority))| SocialMediaReport {
            id: format!("mock_{}_{}", disaster_id, i + 1),
            content: content.to_string(),
            user: user.to_string(),
            created_at: now,
            source: "mock".to_string(),
            disaster_id: disaster_id.to_string(),
            priority: *priority,
        })
        .collect()
}

/// Buckets reports into needs, offers and alerts and rates the overall mood.
pub fn analyze(reports: &[SocialMediaReport]) -> ReportAnalysis {
    let mut needs = Vec::new();
    let mut offers = Vec::new();
    let mut alerts = Vec::new();
    let mut priority_count = PriorityCount::default();

    for report in reports {
        match report.priority {
            Priority::Urgent => priority_count.urgent += 1,
            Priority::High => priority_count.high += 1,
            Priority::Medium => priority_count.medium += 1,
            Priority::Low => priority_count.low += 1,
        }

        let content = report.content.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| content.contains(w));
        let summary = || ReportSummary {
            content: report.content.clone(),
            user: report.user.clone(),
            priority: report.priority,
        };

        if has_any(&["need", "require", "looking for"]) {
            needs.push(summary());
        }
        if has_any(&["available", "offering", "can help"]) {
            offers.push(summary());
        }
        if has_any(&["alert", "warning", "avoid"]) {
            alerts.push(summary());
        }
    }

    let sentiment = if priority_count.urgent > 0 {
        Sentiment::Critical
    } else if priority_count.high > 2 {
        Sentiment::Concerning
    } else if offers.len() > needs.len() {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    };

    ReportAnalysis {
        needs,
        offers,
        alerts,
        sentiment,
        priority_count,
    }
}

// == Social Media Service ==
#[derive(Clone)]
pub struct SocialMediaService {
    cache: Arc<CacheManager>,
    timeout: Duration,
}

impl SocialMediaService {
    pub fn new(cache: Arc<CacheManager>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    /// Fetches reports for a disaster, filtered by any of `keywords`.
    pub async fn reports<S: AsRef<str>>(
        &self,
        disaster_id: &str,
        keywords: &[S],
    ) -> Result<SocialMediaFeed, ProducerError> {
        let keywords = normalize_keywords(keywords);
        let key = CacheKey::derive(
            "social",
            std::iter::once(disaster_id).chain(keywords.iter().map(String::as_str)),
        );
        let keywords = &keywords;

        self.cache
            .compute_if_absent(key.as_str(), Some(TEXT_TTL), || {
                bounded(self.timeout, async move {
                    let now = Utc::now();
                    let reports = mock_reports(disaster_id, keywords, now);
                    info!("Returned {} mock social media reports", reports.len());
                    Ok(SocialMediaFeed {
                        source: "mock".to_string(),
                        reports,
                        timestamp: now,
                    })
                })
            })
            .await
    }
}
