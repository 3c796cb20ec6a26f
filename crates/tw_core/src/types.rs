use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Full Markdown body, including the leading `# ` title line
    pub content: String,
    pub meta_description: String,
    pub headings: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn from_generation(result: &GenerationResult, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: result.title.clone(),
            slug: result.slug.clone(),
            content: result.content.clone(),
            meta_description: result.meta_description.clone(),
            headings: result.headings.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parsed output of one generation call, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_description: String,
    pub headings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a request from optional query values, clamping out of range input
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub limit: u32,
}

impl ArticlePage {
    pub fn new(articles: Vec<Article>, total_count: u64, request: PageRequest) -> Self {
        Self {
            articles,
            total_count,
            total_pages: total_count.div_ceil(request.limit as u64),
            current_page: request.page,
            limit: request.limit,
        }
    }

    /// Whether a later page exists. Derived from the total, since a full page
    /// can just as well be the last one.
    pub fn has_more(&self) -> bool {
        (self.current_page as u64) < self.total_pages
    }
}
