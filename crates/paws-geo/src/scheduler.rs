//! Scheduled polygon refresh: background task for periodic cache reloads.
//!
//! Two timers drive the cache: a full reload of every enabled region on the
//! refresh interval, and a cheaper staleness check that reloads only regions
//! whose store data changed. Ticks that arrive while a cycle is still
//! running are skipped, not queued.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use paws_core::Timestamp;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::cache::{RefreshKind, RegionPolygonCache};

/// Configuration for the scheduled refresh service.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between full refreshes
    pub refresh_interval: Duration,
    /// Interval between staleness checks
    pub staleness_check_interval: Duration,
    /// Whether the scheduler is enabled
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(12 * 60 * 60),
            staleness_check_interval: Duration::from_secs(5 * 60),
            enabled: true,
        }
    }
}

/// Scheduler for periodic region polygon refresh.
///
/// Spawned by [`RegionPolygonCache::start_background_refresh`]; stops when
/// the cache signals shutdown.
pub struct RefreshScheduler {
    cache: Arc<RegionPolygonCache>,
    config: SchedulerConfig,
    stop: watch::Receiver<bool>,
    /// Time of the last completed full refresh
    last_refresh_at: Arc<RwLock<Option<Timestamp>>>,
}

impl RefreshScheduler {
    pub fn new(
        cache: Arc<RegionPolygonCache>,
        config: SchedulerConfig,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            cache,
            config,
            stop,
            last_refresh_at: Arc::new(RwLock::new(None)),
        }
    }

    pub fn last_refresh(&self) -> Option<Timestamp> {
        *self.last_refresh_at.read()
    }

    /// Runs until shutdown is signalled.
    pub async fn start(self: Arc<Self>) {
        if !self.config.enabled {
            tracing::info!("scheduled polygon refresh is disabled, skipping");
            return;
        }

        tracing::info!(
            refresh_interval_secs = self.config.refresh_interval.as_secs(),
            staleness_check_secs = self.config.staleness_check_interval.as_secs(),
            "starting scheduled polygon refresh"
        );

        let mut full = interval(self.config.refresh_interval);
        let mut stale = interval(self.config.staleness_check_interval);
        full.set_missed_tick_behavior(MissedTickBehavior::Skip);
        stale.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Both intervals fire immediately; the cache builds itself on first use.
        full.tick().await;
        stale.tick().await;

        let mut stop = self.stop.clone();
        loop {
            tokio::select! {
                _ = full.tick() => self.do_refresh(RefreshKind::Full).await,
                _ = stale.tick() => self.do_refresh(RefreshKind::StalenessCheck).await,
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        tracing::info!("scheduled polygon refresh stopping");
                        return;
                    }
                }
            }
        }
    }

    /// Executes one refresh cycle on the blocking pool.
    async fn do_refresh(&self, kind: RefreshKind) {
        let cache = Arc::clone(&self.cache);
        match tokio::task::spawn_blocking(move || cache.run_cycle(kind)).await {
            Ok(Some(summary)) => {
                tracing::info!(
                    kind = ?kind,
                    refreshed = summary.refreshed,
                    unchanged = summary.unchanged,
                    failed = summary.failed,
                    "scheduled polygon refresh completed"
                );
                if kind == RefreshKind::Full {
                    *self.last_refresh_at.write() = Some(Timestamp::now());
                }
            }
            Ok(None) => {
                tracing::debug!(kind = ?kind, "refresh already in flight, skipping tick");
            }
            Err(e) => {
                tracing::error!(error = %e, "scheduled polygon refresh task failed");
            }
        }
    }
}
