//! # Region Polygon Cache
//!
//! In-memory, region-partitioned cache of regulatory boundary polygons.
//!
//! ## Concurrency
//!
//! The set of enabled regions is fixed at construction, so the region map
//! itself is never locked. Each region owns a slot holding an
//! `Arc<Vec<SubregionPolygons>>` snapshot behind a short `RwLock`:
//!
//! - Readers clone the `Arc` and release the lock immediately. They never
//!   wait on a store fetch.
//! - A refresh fetches and parses outside the snapshot lock, then swaps the
//!   whole snapshot in one write. Readers observe the old or the new list,
//!   never a mix.
//! - Refreshes of one region are serialized by a per-slot mutex. Refreshes
//!   of different regions run independently.
//!
//! The first caller to find the cache uninitialized builds every enabled
//! region; concurrent first callers wait for that build rather than
//! repeating it.
//!
//! ## Lifecycle
//!
//! `new` → lazy or explicit `initialize` → optional
//! [`start_background_refresh`](RegionPolygonCache::start_background_refresh)
//! → `shutdown`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use paws_core::{EntityStore, NumberCulture, RegionCode, Timestamp};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::GeoError;
use crate::scheduler::{RefreshScheduler, SchedulerConfig};
use crate::subregion::{sort_subregions, SubregionPolygons};

/// An immutable view of one region's subregions, largest first.
pub type RegionSnapshot = Arc<Vec<SubregionPolygons>>;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Governs separators when parsing stored polygon text.
    pub culture: NumberCulture,
    /// Minimum time between two store staleness checks for one region.
    pub staleness_check_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            culture: NumberCulture::invariant(),
            staleness_check_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// What a refresh cycle does for each enabled region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Unconditionally reload every region.
    Full,
    /// Reload only regions whose store data changed since the last sync.
    StalenessCheck,
}

/// Per-cycle counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Default)]
struct RegionSlot {
    snapshot: RwLock<RegionSnapshot>,
    last_sync: RwLock<Option<Timestamp>>,
    last_staleness_check: Mutex<Option<Instant>>,
    refresh_lock: Mutex<()>,
}

struct BackgroundRefresh {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct RegionPolygonCache {
    store: Arc<dyn EntityStore>,
    config: CacheConfig,
    slots: HashMap<RegionCode, RegionSlot>,
    empty: RegionSnapshot,
    initialized: OnceLock<()>,
    cycle_in_flight: AtomicBool,
    background: Mutex<Option<BackgroundRefresh>>,
}

impl RegionPolygonCache {
    /// A cache over `store` for the regions that have location validation
    /// enabled. Nothing is fetched until first use.
    pub fn new(
        store: Arc<dyn EntityStore>,
        enabled_regions: impl IntoIterator<Item = RegionCode>,
        config: CacheConfig,
    ) -> Self {
        let slots = enabled_regions
            .into_iter()
            .map(|region| (region, RegionSlot::default()))
            .collect();
        Self {
            store,
            config,
            slots,
            empty: Arc::new(Vec::new()),
            initialized: OnceLock::new(),
            cycle_in_flight: AtomicBool::new(false),
            background: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self, region: &RegionCode) -> bool {
        self.slots.contains_key(region)
    }

    /// Enabled regions in code order.
    pub fn enabled_regions(&self) -> Vec<RegionCode> {
        let mut regions: Vec<_> = self.slots.keys().cloned().collect();
        regions.sort();
        regions
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }

    /// Build every enabled region once. Later calls return immediately;
    /// concurrent callers block until the first build completes.
    pub fn initialize(&self) {
        self.initialized.get_or_init(|| {
            let summary = self.refresh_all();
            tracing::info!(
                regions = self.slots.len(),
                refreshed = summary.refreshed,
                failed = summary.failed,
                "region polygon cache initialized"
            );
        });
    }

    /// The last complete snapshot for `region`. Empty if the region has no
    /// location validation enabled or no data.
    pub fn get_polygons(&self, region: &RegionCode) -> RegionSnapshot {
        self.initialize();
        match self.slots.get(region) {
            Some(slot) => slot.snapshot.read().clone(),
            None => Arc::clone(&self.empty),
        }
    }

    /// Time of the last successful refresh of `region`.
    pub fn last_sync(&self, region: &RegionCode) -> Option<Timestamp> {
        self.slots.get(region).and_then(|slot| *slot.last_sync.read())
    }

    /// Reload `region` from the store and swap its snapshot.
    ///
    /// On failure the previous snapshot stays in place. Returns the number
    /// of subregions loaded.
    pub fn refresh(&self, region: &RegionCode) -> Result<usize, GeoError> {
        let slot = self
            .slots
            .get(region)
            .ok_or_else(|| GeoError::RegionNotEnabled(region.clone()))?;
        let _serialized = slot.refresh_lock.lock();
        let started = Instant::now();

        let subregions = match self.load_region(region) {
            Ok(subregions) => subregions,
            Err(e) => {
                tracing::error!(
                    region = %region,
                    error = %e,
                    "region polygon refresh failed, keeping previous snapshot"
                );
                return Err(e);
            }
        };

        let count = subregions.len();
        if count == 0 {
            tracing::warn!(region = %region, "no region polygons found in store");
        }
        *slot.snapshot.write() = Arc::new(subregions);
        *slot.last_sync.write() = Some(Timestamp::now());
        tracing::info!(
            region = %region,
            subregions = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "region polygon cache refreshed"
        );
        Ok(count)
    }

    /// Refresh every enabled region. A failure in one region does not stop
    /// the others.
    pub fn refresh_all(&self) -> RefreshSummary {
        let mut summary = RefreshSummary::default();
        for region in self.enabled_regions() {
            match self.refresh(&region) {
                Ok(_) => summary.refreshed += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Refresh `region` if it has never synced or the store's last-modified
    /// time is at or after the last sync. Both are second precision, so a
    /// record stamped in the same second as the sync may postdate the read
    /// and counts as stale. Checks the store at most once per
    /// staleness-check interval; returns whether a refresh happened.
    pub fn refresh_if_stale(&self, region: &RegionCode) -> Result<bool, GeoError> {
        let slot = self
            .slots
            .get(region)
            .ok_or_else(|| GeoError::RegionNotEnabled(region.clone()))?;
        {
            let mut last_check = slot.last_staleness_check.lock();
            if let Some(at) = *last_check {
                if at.elapsed() < self.config.staleness_check_interval {
                    return Ok(false);
                }
            }
            *last_check = Some(Instant::now());
        }

        let last_sync = *slot.last_sync.read();
        let stale = match last_sync {
            None => true,
            Some(synced) => self
                .store
                .polygons_last_modified(region)?
                .is_some_and(|modified| modified >= synced),
        };
        if stale {
            tracing::debug!(region = %region, "store data newer than cache, refreshing");
            self.refresh(region)?;
        }
        Ok(stale)
    }

    /// Run one refresh cycle unless another is already in flight, in which
    /// case `None` is returned and nothing is done.
    pub fn run_cycle(&self, kind: RefreshKind) -> Option<RefreshSummary> {
        if self
            .cycle_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let _guard = CycleGuard(&self.cycle_in_flight);

        let summary = match kind {
            RefreshKind::Full => self.refresh_all(),
            RefreshKind::StalenessCheck => {
                let mut summary = RefreshSummary::default();
                for region in self.enabled_regions() {
                    match self.refresh_if_stale(&region) {
                        Ok(true) => summary.refreshed += 1,
                        Ok(false) => summary.unchanged += 1,
                        Err(e) => {
                            tracing::error!(region = %region, error = %e, "staleness check failed");
                            summary.failed += 1;
                        }
                    }
                }
                summary
            }
        };
        Some(summary)
    }

    /// Spawn the periodic refresh task on the current tokio runtime.
    /// Calling this while a task is already running does nothing.
    pub fn start_background_refresh(self: &Arc<Self>, config: SchedulerConfig) {
        let mut background = self.background.lock();
        if background.is_some() {
            return;
        }
        let (stop, stop_rx) = watch::channel(false);
        let scheduler = Arc::new(RefreshScheduler::new(Arc::clone(self), config, stop_rx));
        let handle = tokio::spawn(scheduler.start());
        *background = Some(BackgroundRefresh { stop, handle });
    }

    pub fn is_background_refresh_running(&self) -> bool {
        self.background
            .lock()
            .as_ref()
            .is_some_and(|bg| !bg.handle.is_finished())
    }

    /// Stop the background refresh task and release its timers. The task
    /// exits at its next wake-up; an in-flight cycle is allowed to finish.
    pub fn shutdown(&self) {
        if let Some(bg) = self.background.lock().take() {
            // The receiver may already be gone if the task exited.
            let _ = bg.stop.send(true);
            tracing::info!("region polygon cache background refresh stopped");
        }
    }

    fn load_region(&self, region: &RegionCode) -> Result<Vec<SubregionPolygons>, GeoError> {
        let records = self.store.fetch_region_polygons(region)?;
        let mut subregions = Vec::with_capacity(records.len());
        for record in &records {
            match SubregionPolygons::from_record(record, &self.config.culture) {
                Ok(sub) => subregions.push(sub),
                Err(e) => {
                    tracing::warn!(
                        region = %region,
                        subregion = %record.name,
                        error = %e,
                        "skipping unparsable polygon record"
                    );
                }
            }
        }
        sort_subregions(&mut subregions);
        Ok(subregions)
    }
}

impl std::fmt::Debug for RegionPolygonCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionPolygonCache")
            .field("regions", &self.enabled_regions())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
