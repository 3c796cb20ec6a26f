use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use tw_core::{Article, ArticlePage, PageRequest};

use crate::response::{ApiError, ApiResponse};
use crate::AppState;

type ApiResult<T> = std::result::Result<ApiResponse<T>, ApiError>;

/// Raw listing query. Unparseable values fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn to_request(&self) -> PageRequest {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<u32>().ok());
        PageRequest::new(parse(&self.page), parse(&self.limit))
    }
}

/// Runs one ingestion pass and returns the articles it created.
pub async fn generate_articles(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Article>> {
    info!("🚀 Ingestion triggered over HTTP");
    let created = state.manager.run_ingestion().await?;
    let message = format!("{} new articles generated", created.len());
    Ok(ApiResponse::ok(created, message))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<ArticlePage> {
    let page = state.store.list_paged(query.to_request()).await?;
    Ok(ApiResponse::ok(page, "Articles fetched"))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Article> {
    match state.store.get_by_slug(&slug).await? {
        Some(article) => Ok(ApiResponse::ok(article, "Article fetched")),
        None => Err(ApiError::not_found(format!("Article '{}' not found", slug))),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
