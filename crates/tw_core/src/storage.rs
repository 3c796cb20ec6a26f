use async_trait::async_trait;
use crate::types::{Article, ArticlePage, GenerationResult, PageRequest};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Returns true if an article with this slug is already stored
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Stores a freshly generated article.
    ///
    /// Fails with [`crate::Error::Conflict`] when the slug is taken, leaving the
    /// store untouched. This holds even when callers checked
    /// [`ArticleStore::exists_by_slug`] first, since check-then-insert is not atomic.
    async fn insert(&self, result: &GenerationResult) -> Result<Article>;

    /// Lists articles newest first
    async fn list_paged(&self, request: PageRequest) -> Result<ArticlePage>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>>;
}
