use snafu::ResultExt;
use vessel_core::{PositionUpdate, StaticUpdate, VesselUpdate};

use crate::{
    error::{
        DecodeError,
        decode_error::{JsonSnafu, Utf8Snafu},
    },
    models::{AisMessageType, AisPositionMessage, AisStaticMessage, MessageType},
};

/// Parses a raw frame from the stream.
///
/// Returns `Ok(None)` for message types the stream is allowed to send but that carry nothing we
/// track.
pub fn decode(frame: &[u8]) -> Result<Option<VesselUpdate>, DecodeError> {
    let frame = std::str::from_utf8(frame).context(Utf8Snafu)?;
    let message_type: MessageType = serde_json::from_str(frame).context(JsonSnafu)?;

    match message_type.message_type {
        AisMessageType::PositionReport => {
            let val: AisPositionMessage = serde_json::from_str(frame).context(JsonSnafu)?;
            Ok(Some(PositionUpdate::try_from(val)?.into()))
        }
        AisMessageType::ShipStaticData => {
            let val: AisStaticMessage = serde_json::from_str(frame).context(JsonSnafu)?;
            Ok(Some(StaticUpdate::try_from(val)?.into()))
        }
        AisMessageType::Other => Ok(None),
    }
}
