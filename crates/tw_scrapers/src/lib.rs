pub mod logging;
pub mod manager;
pub mod scheduler;
pub mod scrapers;

pub use manager::{IngestionManager, RunSummary, TopicOutcome};
pub use scheduler::spawn_periodic;
pub use scrapers::{GoogleTrendsScraper, StaticTrendSource, TrendSource, TrendsConfig};

