use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use tw_core::{Article, ArticlePage, ArticleStore, Error, GenerationResult, PageRequest, Result};
use uuid::Uuid;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        content TEXT NOT NULL,
        meta_description TEXT NOT NULL DEFAULT '',
        headings TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        seq INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS articles_created_at ON articles (created_at DESC, seq DESC)",
    // Add future migrations here
];

/// Fixed-width RFC 3339 so that text order matches time order
fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn unavailable(context: &str, e: sqlx::Error) -> Error {
    Error::StoreUnavailable(format!("{}: {}", context, e))
}

pub struct SQLiteStorage {
    pool: SqlitePool,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| Error::Database(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| unavailable("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }

    fn row_to_article(row: &SqliteRow) -> Result<Article> {
        let parse_time = |column: &str| -> Result<DateTime<Utc>> {
            let value: String = row.get(column);
            DateTime::parse_from_rfc3339(&value)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| Error::Database(format!("Failed to parse {}: {}", column, e)))
        };
        let id: String = row.get("id");
        let headings: String = row.get("headings");

        Ok(Article {
            id: Uuid::parse_str(&id).map_err(|e| Error::Database(format!("Invalid article id: {}", e)))?,
            title: row.get("title"),
            slug: row.get("slug"),
            content: row.get("content"),
            meta_description: row.get("meta_description"),
            headings: serde_json::from_str(&headings)?,
            created_at: parse_time("created_at")?,
            updated_at: parse_time("updated_at")?,
        })
    }
}

#[async_trait]
impl ArticleStore for SQLiteStorage {
    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let found = sqlx::query("SELECT 1 FROM articles WHERE slug = ? LIMIT 1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to look up slug", e))?;
        Ok(found.is_some())
    }

    async fn insert(&self, result: &GenerationResult) -> Result<Article> {
        let article = Article::from_generation(result, Utc::now());
        let headings = serde_json::to_string(&article.headings)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO articles
            (id, title, slug, content, meta_description, headings, created_at, updated_at, seq)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, (SELECT COALESCE(MAX(seq), 0) + 1 FROM articles))
            "#,
        )
        .bind(article.id.to_string())
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(&article.meta_description)
        .bind(headings)
        .bind(timestamp(&article.created_at))
        .bind(timestamp(&article.updated_at))
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => {
                debug!(slug = %article.slug, "Inserted article");
                Ok(article)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::Conflict {
                slug: article.slug,
            }),
            Err(e) => Err(unavailable("Failed to store article", e)),
        }
    }

    async fn list_paged(&self, request: PageRequest) -> Result<ArticlePage> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to count articles", e))?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            ORDER BY created_at DESC, seq DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(request.limit as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable("Failed to list articles", e))?;

        let articles = rows
            .iter()
            .map(Self::row_to_article)
            .collect::<Result<Vec<_>>>()?;

        Ok(ArticlePage::new(articles, total.max(0) as u64, request))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to get article", e))?;

        row.as_ref().map(Self::row_to_article).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn generated(slug: &str) -> GenerationResult {
        GenerationResult {
            title: format!("Title {}", slug),
            slug: slug.to_string(),
            content: format!("# Title {}\n\n## Intro\n### Detail", slug),
            meta_description: "Summary".to_string(),
            headings: vec!["Intro".to_string(), "Detail".to_string()],
        }
    }

    #[tokio::test]
    async fn test_sqlite_storage_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert!(!storage.exists_by_slug("solar").await.unwrap());

        let article = storage.insert(&generated("solar")).await.unwrap();
        assert!(storage.exists_by_slug("solar").await.unwrap());

        let found = storage.get_by_slug("solar").await.unwrap().unwrap();
        assert_eq!(found.id, article.id);
        assert_eq!(found.headings, vec!["Intro", "Detail"]);
        assert_eq!(found.meta_description, "Summary");
        assert!(storage.get_by_slug("wind").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_unique_slug() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(temp_dir.path().join("test.db"))
            .await
            .unwrap();

        storage.insert(&generated("solar")).await.unwrap();
        let err = storage.insert(&generated("solar")).await.unwrap_err();
        assert!(err.is_conflict());

        let page = storage.list_paged(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_sqlite_pagination() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(temp_dir.path().join("test.db"))
            .await
            .unwrap();

        for i in 0..10 {
            storage.insert(&generated(&format!("a{}", i))).await.unwrap();
        }

        let first = storage.list_paged(PageRequest::new(Some(1), Some(9))).await.unwrap();
        assert_eq!(first.articles.len(), 9);
        assert_eq!(first.total_count, 10);
        assert!(first.has_more());
        assert_eq!(first.articles[0].slug, "a9");

        let second = storage.list_paged(PageRequest::new(Some(2), Some(9))).await.unwrap();
        assert_eq!(second.articles.len(), 1);
        assert_eq!(second.articles[0].slug, "a0");
    }

    #[tokio::test]
    async fn test_sqlite_exact_page() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(temp_dir.path().join("test.db"))
            .await
            .unwrap();

        for i in 0..9 {
            storage.insert(&generated(&format!("a{}", i))).await.unwrap();
        }

        let page = storage.list_paged(PageRequest::new(Some(1), Some(9))).await.unwrap();
        assert_eq!(page.articles.len(), 9);
        assert_eq!(page.total_count, 9);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more());

        let beyond = storage.list_paged(PageRequest::new(Some(2), Some(9))).await.unwrap();
        assert!(beyond.articles.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_reopen_keeps_data() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        {
            let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
            storage.insert(&generated("persisted")).await.unwrap();
        }
        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert!(storage.exists_by_slug("persisted").await.unwrap());
    }
}
