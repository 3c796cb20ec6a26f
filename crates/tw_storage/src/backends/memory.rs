use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tw_core::{Article, ArticlePage, ArticleStore, Error, GenerationResult, PageRequest, Result};

/// Articles in insertion order
#[derive(Default)]
struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    fn find(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.slug == slug)
    }

    fn insert(&mut self, result: &GenerationResult) -> Result<Article> {
        if self.find(&result.slug).is_some() {
            return Err(Error::Conflict {
                slug: result.slug.clone(),
            });
        }
        let article = Article::from_generation(result, Utc::now());
        self.articles.push(article.clone());
        Ok(article)
    }

    fn list_paged(&self, request: PageRequest) -> ArticlePage {
        // Newest first; on equal timestamps the later insert wins.
        let mut ordered: Vec<&Article> = self.articles.iter().rev().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let articles = ordered
            .into_iter()
            .skip(request.offset())
            .take(request.limit as usize)
            .cloned()
            .collect();
        ArticlePage::new(articles, self.articles.len() as u64, request)
    }
}

/// Process-local store, mainly for development and tests
#[derive(Default)]
pub struct InMemoryStorage {
    store: RwLock<MemoryStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ArticleStore for InMemoryStorage {
    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        Ok(self.store.read().await.find(slug).is_some())
    }

    async fn insert(&self, result: &GenerationResult) -> Result<Article> {
        // Check and push under one write lock so concurrent inserts cannot both win.
        self.store.write().await.insert(result)
    }

    async fn list_paged(&self, request: PageRequest) -> Result<ArticlePage> {
        Ok(self.store.read().await.list_paged(request))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        Ok(self.store.read().await.find(slug).cloned())
    }
}
