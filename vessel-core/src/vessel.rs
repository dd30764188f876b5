use serde::Serialize;
use tokio::time::Instant;

use crate::{
    Mmsi, NavigationStatus, PositionUpdate, ShipCategory, StaticUpdate, VesselUpdate,
    valid_heading,
};

/// The merged, latest known state of a single vessel.
///
/// Every attribute apart from the identity is optional until an update carrying it has been
/// observed, and once observed it is only ever replaced by a newer value, never cleared.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselRecord {
    pub mmsi: Mmsi,
    pub ship_name: Option<String>,
    pub imo_number: Option<i32>,
    pub call_sign: Option<String>,
    pub ship_type: Option<i32>,
    pub ship_category: ShipCategory,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cog: Option<f64>,
    pub sog: Option<f64>,
    pub true_heading: Option<i32>,
    pub nav_status: Option<NavigationStatus>,
    pub destination: Option<String>,
    pub time_utc: Option<String>,
    #[serde(skip)]
    pub last_update: Instant,
}

impl VesselRecord {
    pub fn new(mmsi: Mmsi, now: Instant) -> VesselRecord {
        VesselRecord {
            mmsi,
            ship_name: None,
            imo_number: None,
            call_sign: None,
            ship_type: None,
            ship_category: ShipCategory::Unknown,
            latitude: None,
            longitude: None,
            cog: None,
            sog: None,
            true_heading: None,
            nav_status: None,
            destination: None,
            time_utc: None,
            last_update: now,
        }
    }

    /// Whether the vessel has a position and can be shown to readers.
    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// The true heading, or `None` if the transponder reported it as not available.
    pub fn heading(&self) -> Option<i32> {
        self.true_heading.and_then(valid_heading)
    }

    pub fn merge(&mut self, update: VesselUpdate, now: Instant) {
        match update {
            VesselUpdate::Position(p) => self.merge_position(p),
            VesselUpdate::Static(s) => self.merge_static(s),
        }
        self.last_update = now;
    }

    fn merge_position(&mut self, update: PositionUpdate) {
        let PositionUpdate {
            mmsi: _,
            ship_name,
            latitude,
            longitude,
            cog,
            sog,
            true_heading,
            nav_status,
            time_utc,
        } = update;

        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.ship_name = non_empty(ship_name).or(self.ship_name.take());
        self.cog = cog.or(self.cog);
        self.sog = sog.or(self.sog);
        self.true_heading = true_heading.or(self.true_heading);
        self.nav_status = nav_status.or(self.nav_status);
        self.time_utc = time_utc.or(self.time_utc.take());
    }

    fn merge_static(&mut self, update: StaticUpdate) {
        let StaticUpdate {
            mmsi: _,
            ship_name,
            imo_number,
            call_sign,
            ship_type,
            destination,
        } = update;

        if let Some(ship_type) = ship_type {
            self.ship_type = Some(ship_type);
            self.ship_category = ShipCategory::from_code(Some(ship_type));
        }

        self.ship_name = non_empty(ship_name).or(self.ship_name.take());
        self.imo_number = imo_number.or(self.imo_number);
        self.call_sign = non_empty(call_sign).or(self.call_sign.take());
        self.destination = non_empty(destination).or(self.destination.take());
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
