use serde::{Serialize, Serializer};
use strum::{AsRefStr, EnumIter};

/// Coarse vessel category derived from the AIS ship type code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, strum::Display)]
pub enum ShipCategory {
    Cargo,
    Tanker,
    Passenger,
    Fishing,
    Towing,
    Dredging,
    Diving,
    Military,
    Sailing,
    #[strum(serialize = "Pleasure Craft")]
    PleasureCraft,
    #[strum(serialize = "High Speed Craft")]
    HighSpeedCraft,
    #[strum(serialize = "Pilot Vessel")]
    PilotVessel,
    #[strum(serialize = "Search & Rescue")]
    SearchAndRescue,
    Tug,
    #[strum(serialize = "Port Tender")]
    PortTender,
    #[strum(serialize = "Law Enforcement")]
    LawEnforcement,
    Medical,
    Other,
    #[default]
    Unknown,
}

/// Inclusive ship type ranges, checked in order.
static SHIP_TYPE_RANGES: [(i32, i32, ShipCategory); 18] = [
    (70, 79, ShipCategory::Cargo),
    (80, 89, ShipCategory::Tanker),
    (60, 69, ShipCategory::Passenger),
    (30, 30, ShipCategory::Fishing),
    (31, 32, ShipCategory::Towing),
    (33, 33, ShipCategory::Dredging),
    (34, 34, ShipCategory::Diving),
    (35, 35, ShipCategory::Military),
    (36, 36, ShipCategory::Sailing),
    (37, 37, ShipCategory::PleasureCraft),
    (40, 49, ShipCategory::HighSpeedCraft),
    (50, 50, ShipCategory::PilotVessel),
    (51, 51, ShipCategory::SearchAndRescue),
    (52, 52, ShipCategory::Tug),
    (53, 53, ShipCategory::PortTender),
    (55, 55, ShipCategory::LawEnforcement),
    (58, 58, ShipCategory::Medical),
    (90, 99, ShipCategory::Other),
];

impl ShipCategory {
    pub fn from_code(ship_type: Option<i32>) -> ShipCategory {
        let Some(code) = ship_type else {
            return ShipCategory::Unknown;
        };

        SHIP_TYPE_RANGES
            .iter()
            .find(|(start, end, _)| (*start..=*end).contains(&code))
            .map(|(_, _, category)| *category)
            .unwrap_or_default()
    }
}

impl Serialize for ShipCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_ref())
    }
}
