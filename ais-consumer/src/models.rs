use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use vessel_core::{Mmsi, NavigationStatus, PositionUpdate, StaticUpdate};

use crate::error::{DecodeError, decode_error::MissingFieldSnafu};

/// Sent once after connecting to select which messages the stream should push.
#[derive(Serialize)]
pub struct Subscription {
    #[serde(rename = "APIKey")]
    pub api_key: String,
    #[serde(rename = "BoundingBoxes")]
    pub bounding_boxes: Vec<BoundingBox>,
    #[serde(rename = "FilterMessageTypes")]
    pub filter_message_types: Vec<String>,
}

/// Two `[latitude, longitude]` corners.
pub type BoundingBox = [[f64; 2]; 2];

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum AisMessageType {
    /// Class A position report.
    PositionReport,
    /// Voyage and vessel related data.
    ShipStaticData,
    /// Any of the other message types the stream can emit, which we do not use.
    #[serde(other)]
    Other,
}

/// Convenience struct to deserialize the message type prior to attempting to deserialize the full
/// message.
#[derive(Deserialize)]
pub struct MessageType {
    #[serde(rename = "MessageType")]
    pub message_type: AisMessageType,
}

/// Fields the stream attaches to every message regardless of type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetaData {
    #[serde(rename = "MMSI")]
    pub mmsi: Option<Mmsi>,
    #[serde(rename = "ShipName")]
    pub ship_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_utc: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AisPositionMessage {
    #[serde(rename = "MessageType")]
    pub message_type: AisMessageType,
    #[serde(rename = "MetaData")]
    pub meta_data: MetaData,
    #[serde(rename = "Message")]
    pub message: PositionReportBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PositionReportBody {
    #[serde(rename = "PositionReport")]
    pub position_report: AisPosition,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AisPosition {
    #[serde(rename = "UserID")]
    pub user_id: Option<Mmsi>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cog: Option<f64>,
    pub sog: Option<f64>,
    pub true_heading: Option<i32>,
    pub navigational_status: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AisStaticMessage {
    #[serde(rename = "MessageType")]
    pub message_type: AisMessageType,
    #[serde(rename = "MetaData")]
    pub meta_data: MetaData,
    #[serde(rename = "Message")]
    pub message: ShipStaticDataBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShipStaticDataBody {
    #[serde(rename = "ShipStaticData")]
    pub ship_static_data: AisStatic,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AisStatic {
    #[serde(rename = "UserID")]
    pub user_id: Option<Mmsi>,
    pub name: Option<String>,
    pub imo_number: Option<i32>,
    pub call_sign: Option<String>,
    #[serde(rename = "Type")]
    pub ship_type: Option<i32>,
    pub destination: Option<String>,
}

impl TryFrom<AisPositionMessage> for PositionUpdate {
    type Error = DecodeError;

    fn try_from(value: AisPositionMessage) -> Result<Self, Self::Error> {
        let AisPositionMessage {
            message_type: _,
            meta_data,
            message: PositionReportBody { position_report },
        } = value;

        let AisPosition {
            user_id,
            latitude,
            longitude,
            cog,
            sog,
            true_heading,
            navigational_status,
        } = position_report;

        let mmsi = meta_data
            .mmsi
            .or(user_id)
            .ok_or_else(|| MissingFieldSnafu { field: "MMSI" }.build())?;

        let latitude = meta_data
            .latitude
            .or(latitude)
            .filter(|v| (-90.0..=90.0).contains(v))
            .ok_or_else(|| MissingFieldSnafu { field: "latitude" }.build())?;
        let longitude = meta_data
            .longitude
            .or(longitude)
            .filter(|v| (-180.0..=180.0).contains(v))
            .ok_or_else(|| MissingFieldSnafu { field: "longitude" }.build())?;

        Ok(PositionUpdate {
            mmsi,
            ship_name: clean_text(meta_data.ship_name),
            latitude,
            longitude,
            cog,
            sog,
            true_heading,
            nav_status: navigational_status.and_then(NavigationStatus::from_i32),
            time_utc: meta_data.time_utc,
        })
    }
}

impl TryFrom<AisStaticMessage> for StaticUpdate {
    type Error = DecodeError;

    fn try_from(value: AisStaticMessage) -> Result<Self, Self::Error> {
        let AisStaticMessage {
            message_type: _,
            meta_data,
            message: ShipStaticDataBody { ship_static_data },
        } = value;

        let AisStatic {
            user_id,
            name,
            imo_number,
            call_sign,
            ship_type,
            destination,
        } = ship_static_data;

        let mmsi = meta_data
            .mmsi
            .or(user_id)
            .ok_or_else(|| MissingFieldSnafu { field: "MMSI" }.build())?;

        Ok(StaticUpdate {
            mmsi,
            ship_name: clean_text(name).or_else(|| clean_text(meta_data.ship_name)),
            // 0 is the "not available" value for imo numbers
            imo_number: imo_number.filter(|v| *v != 0),
            call_sign: clean_text(call_sign),
            ship_type,
            destination: clean_text(destination),
        })
    }
}

/// AIS text fields are padded with spaces and `@`, an all padding field carries no value.
fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim_matches(|c: char| c == '@' || c.is_whitespace()).to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl AisPositionMessage {
        pub fn test_default(mmsi: Mmsi) -> AisPositionMessage {
            AisPositionMessage {
                message_type: AisMessageType::PositionReport,
                meta_data: MetaData {
                    mmsi: Some(mmsi),
                    ship_name: Some("SJARKEN             ".to_string()),
                    latitude: Some(40.71),
                    longitude: Some(-74.01),
                    time_utc: Some("2025-01-01 12:00:00.000000000 +0000 UTC".to_string()),
                },
                message: PositionReportBody {
                    position_report: AisPosition {
                        user_id: Some(mmsi),
                        latitude: Some(40.71),
                        longitude: Some(-74.01),
                        cog: Some(123.3),
                        sog: Some(8.4),
                        true_heading: Some(120),
                        navigational_status: Some(0),
                    },
                },
            }
        }
    }

    impl AisStaticMessage {
        pub fn test_default(mmsi: Mmsi) -> AisStaticMessage {
            AisStaticMessage {
                message_type: AisMessageType::ShipStaticData,
                meta_data: MetaData {
                    mmsi: Some(mmsi),
                    ship_name: Some("SJARKEN".to_string()),
                    latitude: Some(40.71),
                    longitude: Some(-74.01),
                    time_utc: Some("2025-01-01 12:00:06.000000000 +0000 UTC".to_string()),
                },
                message: ShipStaticDataBody {
                    ship_static_data: AisStatic {
                        user_id: Some(mmsi),
                        name: Some("SJARKEN@@@@@".to_string()),
                        imo_number: Some(9074729),
                        call_sign: Some("LK45   ".to_string()),
                        ship_type: Some(70),
                        destination: Some("NEW YORK@@@".to_string()),
                    },
                },
            }
        }
    }
}
