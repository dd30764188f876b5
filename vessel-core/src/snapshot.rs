use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use crate::{VesselRecord, VesselRegistry};

/// Point in time view of every vessel with a known position.
#[derive(Debug, Clone, Serialize)]
pub struct VesselSnapshot {
    pub count: usize,
    pub timestamp: DateTime<Utc>,
    pub vessels: Vec<SnapshotVessel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVessel {
    #[serde(flatten)]
    pub record: VesselRecord,
    /// Seconds since the vessel last reported anything.
    pub age_secs: u64,
}

/// Read only handle to the registry for external consumers.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    registry: VesselRegistry,
}

impl SnapshotReader {
    pub fn new(registry: VesselRegistry) -> SnapshotReader {
        SnapshotReader { registry }
    }

    pub fn read(&self) -> VesselSnapshot {
        let now = Instant::now();

        let vessels: Vec<SnapshotVessel> = self
            .registry
            .snapshot()
            .into_iter()
            .map(|record| SnapshotVessel {
                age_secs: now.saturating_duration_since(record.last_update).as_secs(),
                record,
            })
            .collect();

        VesselSnapshot {
            count: vessels.len(),
            timestamp: Utc::now(),
            vessels,
        }
    }
}
