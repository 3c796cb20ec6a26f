use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};
use tw_core::{Error, Result};

use crate::manager::IngestionManager;

/// Runs ingestion every `period` until the returned task is aborted.
///
/// The first run happens one period after start unless `run_on_start` is set.
/// A failed run is logged and the loop keeps going. A zero period, or one too
/// large to schedule, is rejected before anything is spawned.
pub fn spawn_periodic(
    manager: Arc<IngestionManager>,
    period: Duration,
    run_on_start: bool,
) -> Result<JoinHandle<()>> {
    if period.is_zero() {
        return Err(Error::Config("Scheduling interval must be greater than zero".to_string()));
    }
    let now = Instant::now();
    let first_period_end = now
        .checked_add(period)
        .ok_or_else(|| Error::Config(format!("Scheduling interval {:?} is too large", period)))?;
    let start = if run_on_start { now } else { first_period_end };

    Ok(tokio::spawn(async move {
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("⏰ Scheduled ingestion every {:?}", period);
        loop {
            ticker.tick().await;
            match manager.run_ingestion().await {
                Ok(created) => info!("🗓️  Scheduled run created {} articles", created.len()),
                Err(e) => error!("❌ Scheduled run failed: {}", e),
            }
        }
    }))
}
