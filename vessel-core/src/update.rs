use crate::{Mmsi, NavigationStatus};

/// Live kinematic state reported by a vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub mmsi: Mmsi,
    pub ship_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub cog: Option<f64>,
    pub sog: Option<f64>,
    pub true_heading: Option<i32>,
    pub nav_status: Option<NavigationStatus>,
    pub time_utc: Option<String>,
}

/// Slowly changing vessel metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticUpdate {
    pub mmsi: Mmsi,
    pub ship_name: Option<String>,
    pub imo_number: Option<i32>,
    pub call_sign: Option<String>,
    pub ship_type: Option<i32>,
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VesselUpdate {
    Position(PositionUpdate),
    Static(StaticUpdate),
}

impl VesselUpdate {
    pub fn mmsi(&self) -> Mmsi {
        match self {
            VesselUpdate::Position(p) => p.mmsi,
            VesselUpdate::Static(s) => s.mmsi,
        }
    }
}

impl From<PositionUpdate> for VesselUpdate {
    fn from(value: PositionUpdate) -> Self {
        VesselUpdate::Position(value)
    }
}

impl From<StaticUpdate> for VesselUpdate {
    fn from(value: StaticUpdate) -> Self {
        VesselUpdate::Static(value)
    }
}

#[cfg(any(test, feature = "test"))]
mod test {
    use super::*;

    impl PositionUpdate {
        pub fn test_default(mmsi: Mmsi) -> PositionUpdate {
            PositionUpdate {
                mmsi,
                ship_name: Some("SJARKEN".to_string()),
                latitude: 40.71,
                longitude: -74.01,
                cog: Some(123.3),
                sog: Some(8.4),
                true_heading: Some(120),
                nav_status: Some(NavigationStatus::UnderWayUsingEngine),
                time_utc: Some("2025-01-01 12:00:00.000000000 +0000 UTC".to_string()),
            }
        }
    }

    impl StaticUpdate {
        pub fn test_default(mmsi: Mmsi) -> StaticUpdate {
            StaticUpdate {
                mmsi,
                ship_name: Some("SJARKEN".to_string()),
                imo_number: Some(9074729),
                call_sign: Some("LK45".to_string()),
                ship_type: Some(70),
                destination: Some("NEW YORK".to_string()),
            }
        }
    }
}
