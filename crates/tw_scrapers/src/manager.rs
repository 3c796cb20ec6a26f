use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tw_core::{slugify, Article, ArticleStore, Error, Result};
use tw_inference::ArticleGenerator;

use crate::logging::Logger;
use crate::scrapers::TrendSource;

/// What happened to a single topic during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicOutcome {
    Created(Article),
    /// An article with this slug was already stored, nothing was generated
    AlreadyExists,
    GenerationFailed(String),
    /// Lost an insert race against another writer
    Conflict,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub topics: usize,
    pub created: Vec<Article>,
    pub already_exists: usize,
    pub generation_failed: usize,
    pub conflicts: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: TopicOutcome) {
        match outcome {
            TopicOutcome::Created(article) => self.created.push(article),
            TopicOutcome::AlreadyExists => self.already_exists += 1,
            TopicOutcome::GenerationFailed(_) => self.generation_failed += 1,
            TopicOutcome::Conflict => self.conflicts += 1,
        }
    }
}

/// Drives one pass of scrape, dedupe, generate and store.
pub struct IngestionManager {
    trends: Arc<dyn TrendSource>,
    generator: Arc<ArticleGenerator>,
    store: Arc<dyn ArticleStore>,
    run_lock: Mutex<()>,
    runs: AtomicU64,
}

impl IngestionManager {
    pub fn new(
        trends: Arc<dyn TrendSource>,
        generator: Arc<ArticleGenerator>,
        store: Arc<dyn ArticleStore>,
    ) -> Self {
        Self {
            trends,
            generator,
            store,
            run_lock: Mutex::new(()),
            runs: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> Arc<dyn ArticleStore> {
        self.store.clone()
    }

    /// Runs once and returns the articles created by this run, in topic order.
    ///
    /// Per-topic failures are skipped. Only store failures other than a slug
    /// conflict end the run with an error.
    pub async fn run_ingestion(&self) -> Result<Vec<Article>> {
        Ok(self.run().await?.created)
    }

    /// Same as [`IngestionManager::run_ingestion`] but keeps the per-outcome counts.
    pub async fn run(&self) -> Result<RunSummary> {
        // Runs inside this process never overlap; other processes rely on the
        // store's unique slug.
        let _guard = self.run_lock.lock().await;
        let run_id = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let logger = Logger::new().with_prefix(format!("[run {}]", run_id));

        logger.info(&format!("🔎 Fetching trending topics from {}", self.trends.source()));
        let topics = self.trends.fetch_trending_topics().await;
        if topics.is_empty() {
            logger.warn("📭 No trending topics, nothing to do");
            return Ok(RunSummary::default());
        }
        logger.info(&format!("📋 Processing {} topics", topics.len()));

        let mut summary = RunSummary {
            topics: topics.len(),
            ..RunSummary::default()
        };
        for topic in &topics {
            let topic_logger = logger.clone().with_prefix(format!("[{}]", topic));
            let outcome = self.process_topic(topic, &topic_logger).await?;
            summary.record(outcome);
        }

        logger.info(&format!(
            "✅ Run finished: {} created, {} already existed, {} failed, {} conflicts",
            summary.created.len(),
            summary.already_exists,
            summary.generation_failed,
            summary.conflicts
        ));
        Ok(summary)
    }

    /// Handles one topic. `Err` only for store failures that should stop the run.
    pub async fn process_topic(&self, topic: &str, logger: &Logger) -> Result<TopicOutcome> {
        let slug = slugify(topic);

        if self.store.exists_by_slug(&slug).await? {
            logger.info(&format!("⏭️  Article '{}' already exists, skipping", slug));
            return Ok(TopicOutcome::AlreadyExists);
        }

        logger.info(&format!("🤖 Generating article with {}", self.generator.model_name()));
        let generated = match self.generator.generate(topic).await {
            Ok(generated) => generated,
            Err(e) => {
                logger.warn(&format!("⚠️  Generation failed: {}", e));
                return Ok(TopicOutcome::GenerationFailed(e.to_string()));
            }
        };

        match self.store.insert(&generated).await {
            Ok(article) => {
                logger.info(&format!("💾 Stored '{}'", article.title));
                Ok(TopicOutcome::Created(article))
            }
            Err(Error::Conflict { slug }) => {
                logger.warn(&format!("🔁 '{}' was stored by another writer, skipping", slug));
                Ok(TopicOutcome::Conflict)
            }
            Err(e) => {
                logger.error(&format!("❌ Failed to store article: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tw_core::{ArticlePage, GenerationResult, InferenceModel, PageRequest};
    use tw_inference::models::DummyModel;
    use tw_storage::InMemoryStorage;

    use crate::scrapers::StaticTrendSource;

    /// Dummy output, except for prompts mentioning `fail_on`
    #[derive(Debug)]
    struct FlakyModel {
        fail_on: Option<String>,
        calls: AtomicUsize,
    }

    impl FlakyModel {
        fn new(fail_on: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                fail_on: fail_on.map(str::to_string),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl InferenceModel for FlakyModel {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn generate_text(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_on {
                Some(topic) if prompt.contains(&format!("\"{}\"", topic)) => {
                    Err(Error::Inference("quota exceeded".to_string()))
                }
                _ => DummyModel::new().generate_text(prompt).await,
            }
        }
    }

    /// Wraps a store to count calls or inject failures.
    struct ScriptedStore {
        inner: InMemoryStorage,
        calls: AtomicUsize,
        conflict_on: Option<String>,
        unavailable: bool,
        insert_unavailable: bool,
    }

    impl ScriptedStore {
        fn new() -> Self {
            Self {
                inner: InMemoryStorage::new(),
                calls: AtomicUsize::new(0),
                conflict_on: None,
                unavailable: false,
                insert_unavailable: false,
            }
        }
    }

    #[async_trait]
    impl ArticleStore for ScriptedStore {
        async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(Error::StoreUnavailable("connection refused".to_string()));
            }
            self.inner.exists_by_slug(slug).await
        }

        async fn insert(&self, result: &GenerationResult) -> Result<Article> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.insert_unavailable {
                return Err(Error::StoreUnavailable("disk full".to_string()));
            }
            if self.conflict_on.as_deref() == Some(result.slug.as_str()) {
                return Err(Error::Conflict {
                    slug: result.slug.clone(),
                });
            }
            self.inner.insert(result).await
        }

        async fn list_paged(&self, request: PageRequest) -> Result<ArticlePage> {
            self.inner.list_paged(request).await
        }

        async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
            self.inner.get_by_slug(slug).await
        }
    }

    fn manager(
        topics: &[&str],
        model: Arc<FlakyModel>,
        store: Arc<dyn ArticleStore>,
    ) -> IngestionManager {
        IngestionManager::new(
            Arc::new(StaticTrendSource::new(topics.iter().copied())),
            Arc::new(ArticleGenerator::new(model)),
            store,
        )
    }

    #[tokio::test]
    async fn test_run_creates_articles_in_topic_order() {
        let store = Arc::new(InMemoryStorage::new());
        let manager = manager(&["Solar Eclipse", "ipl final"], FlakyModel::new(None), store.clone());

        let created = manager.run_ingestion().await.unwrap();
        let slugs: Vec<_> = created.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["solar-eclipse", "ipl-final"]);
        assert_eq!(created[0].title, "Solar Eclipse: What You Need to Know");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let store = Arc::new(InMemoryStorage::new());
        let model = FlakyModel::new(None);
        let manager = manager(&["a", "b"], model.clone(), store.clone());

        assert_eq!(manager.run_ingestion().await.unwrap().len(), 2);
        let summary = manager.run().await.unwrap();
        assert!(summary.created.is_empty());
        assert_eq!(summary.already_exists, 2);
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_generation_failure_skips_only_that_topic() {
        let store = Arc::new(InMemoryStorage::new());
        let topics = ["one", "two", "three", "four", "five"];
        let manager = manager(&topics, FlakyModel::new(Some("two")), store.clone());

        let summary = manager.run().await.unwrap();
        assert_eq!(summary.topics, 5);
        assert_eq!(summary.created.len(), 4);
        assert_eq!(summary.generation_failed, 1);
        assert!(!store.exists_by_slug("two").await.unwrap());
        assert!(store.exists_by_slug("five").await.unwrap());
    }

    #[tokio::test]
    async fn test_topics_sharing_a_slug_produce_one_article() {
        let store = Arc::new(InMemoryStorage::new());
        let manager = manager(&["Gold Price", "gold  price"], FlakyModel::new(None), store.clone());

        let summary = manager.run().await.unwrap();
        assert_eq!(summary.created.len(), 1);
        assert_eq!(summary.already_exists, 1);
    }

    #[tokio::test]
    async fn test_insert_conflict_is_skipped() {
        let store = Arc::new(ScriptedStore {
            conflict_on: Some("b".to_string()),
            ..ScriptedStore::new()
        });
        let manager = manager(&["a", "b", "c"], FlakyModel::new(None), store.clone());

        let summary = manager.run().await.unwrap();
        let slugs: Vec<_> = summary.created.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "c"]);
        assert_eq!(summary.conflicts, 1);
    }

    #[tokio::test]
    async fn test_store_outage_propagates() {
        let store = Arc::new(ScriptedStore {
            unavailable: true,
            ..ScriptedStore::new()
        });
        let model = FlakyModel::new(None);
        let manager = manager(&["a"], model.clone(), store);

        let err = manager.run_ingestion().await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_insert_outage_stops_the_run() {
        let store = Arc::new(ScriptedStore {
            insert_unavailable: true,
            ..ScriptedStore::new()
        });
        let model = FlakyModel::new(None);
        let manager = manager(&["a", "b"], model.clone(), store);

        let err = manager.run().await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_scrape_touches_nothing() {
        let store = Arc::new(ScriptedStore::new());
        let model = FlakyModel::new(None);
        let manager = manager(&[], model.clone(), store.clone());

        assert!(manager.run_ingestion().await.unwrap().is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_serialized() {
        let store = Arc::new(InMemoryStorage::new());
        let model = FlakyModel::new(None);
        let manager = Arc::new(manager(&["a", "b", "c"], model.clone(), store.clone()));

        let (first, second) = tokio::join!(manager.run_ingestion(), manager.run_ingestion());
        assert_eq!(first.unwrap().len() + second.unwrap().len(), 3);
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.len().await, 3);
    }
}
