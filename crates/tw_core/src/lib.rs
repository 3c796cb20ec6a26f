pub mod models;
pub mod error;
pub mod slug;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::InferenceModel;
pub use slug::slugify;
pub use storage::ArticleStore;
pub use types::{Article, ArticlePage, GenerationResult, PageRequest};

pub type Result<T> = std::result::Result<T, Error>;
