use std::{
    collections::BTreeMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::time::Instant;
use tracing::debug;

use crate::{Mmsi, VesselRecord, VesselUpdate};

/// Shared store of the latest merged state per vessel.
///
/// Cloning the registry is cheap and every clone refers to the same store. Each merge happens
/// under the write lock, so readers never observe a partially applied update.
#[derive(Debug, Clone, Default)]
pub struct VesselRegistry {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    vessels: RwLock<BTreeMap<Mmsi, VesselRecord>>,
    updates_applied: AtomicU64,
}

impl VesselRegistry {
    pub fn new() -> VesselRegistry {
        VesselRegistry::default()
    }

    pub fn apply(&self, update: VesselUpdate) {
        self.apply_at(update, Instant::now())
    }

    /// Merges the update into the record for its vessel, creating the record if this is the
    /// first time the vessel is seen.
    pub fn apply_at(&self, update: VesselUpdate, now: Instant) {
        let mmsi = update.mmsi();

        // SAFETY: Panics if the lock is poisoned, which only happens if a merge panicked and
        // the store can no longer be trusted.
        let mut vessels = self.inner.vessels.write().unwrap();

        vessels
            .entry(mmsi)
            .or_insert_with(|| {
                debug!(%mmsi, "tracking new vessel");
                VesselRecord::new(mmsi, now)
            })
            .merge(update, now);

        self.inner.updates_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies out every record that has a position, ordered by MMSI. Records holding only
    /// static data stay in the registry and become visible as soon as a position arrives.
    pub fn snapshot(&self) -> Vec<VesselRecord> {
        self.inner
            .vessels
            .read()
            .unwrap()
            .values()
            .filter(|v| v.has_position())
            .cloned()
            .collect()
    }

    /// Removes every record whose last update is older than `now - max_age` and returns how
    /// many were removed.
    pub fn evict(&self, now: Instant, max_age: Duration) -> usize {
        let Some(cutoff) = now.checked_sub(max_age) else {
            return 0;
        };

        let mut vessels = self.inner.vessels.write().unwrap();
        let before = vessels.len();
        vessels.retain(|_, v| v.last_update >= cutoff);

        before - vessels.len()
    }

    /// Number of held records, including those without a position.
    pub fn len(&self) -> usize {
        self.inner.vessels.read().unwrap().len()
    }

    /// Number of records that would be included in a snapshot.
    pub fn visible_len(&self) -> usize {
        self.inner
            .vessels
            .read()
            .unwrap()
            .values()
            .filter(|v| v.has_position())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, mmsi: Mmsi) -> Option<VesselRecord> {
        self.inner.vessels.read().unwrap().get(&mmsi).cloned()
    }

    /// Total number of updates merged since the registry was created.
    pub fn updates_applied(&self) -> u64 {
        self.inner.updates_applied.load(Ordering::Relaxed)
    }
}
