use std::sync::Arc;
use tracing::info;
use tw_core::{ArticleStore, Error, Result};

pub mod backends;

pub use backends::*;

pub const DEFAULT_SQLITE_PATH: &str = "articles.db";

/// Opens the article store named by `kind` (`memory` or `sqlite`).
///
/// `url` is the database location for backends that have one; for SQLite it is a
/// file path, optionally prefixed with `sqlite:`.
#[cfg_attr(not(feature = "sqlite"), allow(unused_variables))]
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleStore>> {
    match kind.to_lowercase().as_str() {
        "memory" => {
            info!("💾 Using in-memory article store");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = url
                .map(|u| u.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
                .unwrap_or(DEFAULT_SQLITE_PATH);
            info!("💾 Using SQLite article store at {}", path);
            Ok(Arc::new(SQLiteStorage::new_with_path(path).await?))
        }
        other => Err(Error::Config(format!(
            "Unsupported storage backend '{}'. Available: {}",
            other,
            available_backends().join(", ")
        ))),
    }
}

pub fn available_backends() -> Vec<&'static str> {
    let mut backends = vec!["memory"];
    if cfg!(feature = "sqlite") {
        backends.push("sqlite");
    }
    backends
}
