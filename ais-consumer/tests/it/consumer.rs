use std::time::Duration;

use ais_consumer::models::{AisPositionMessage, AisStaticMessage};
use vessel_core::{Mmsi, ShipCategory};

use crate::helper::{
    Session, test, test_settings, test_with_sessions, test_with_settings, wait_until,
};

const LIMIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_position_and_static_messages_are_merged() {
    test(|helper| async move {
        let mmsi = Mmsi::new(257000001);

        let mut position = AisPositionMessage::test_default(mmsi);
        position.message.position_report.true_heading = Some(511);
        helper.ais_source.send_position(&position).await;

        let mut vessel = AisStaticMessage::test_default(mmsi);
        vessel.meta_data.ship_name = None;
        vessel.message.ship_static_data.name = None;
        vessel.message.ship_static_data.ship_type = Some(37);
        helper.ais_source.send_static(&vessel).await;

        wait_until(LIMIT, || {
            helper
                .reader
                .read()
                .vessels
                .first()
                .is_some_and(|v| v.record.ship_type.is_some())
        })
        .await;

        let snapshot = helper.reader.read();
        assert_eq!(snapshot.count, 1);

        let record = &snapshot.vessels[0].record;
        assert_eq!(record.mmsi, mmsi);
        assert_eq!(record.ship_name.as_deref(), Some("SJARKEN"));
        assert_eq!(record.latitude, Some(40.71));
        assert_eq!(record.longitude, Some(-74.01));
        assert_eq!(record.cog, Some(123.3));
        assert_eq!(record.heading(), None);
        assert_eq!(record.ship_category, ShipCategory::PleasureCraft);
        assert_eq!(record.call_sign.as_deref(), Some("LK45"));
        assert_eq!(record.destination.as_deref(), Some("NEW YORK"));
    })
    .await;
}

#[tokio::test]
async fn test_static_only_vessel_becomes_visible_once_positioned() {
    test(|helper| async move {
        let hidden = Mmsi::new(257000001);
        let visible = Mmsi::new(257000002);

        helper
            .ais_source
            .send_static(&AisStaticMessage::test_default(hidden))
            .await;
        helper
            .ais_source
            .send_position(&AisPositionMessage::test_default(visible))
            .await;

        wait_until(LIMIT, || helper.reader.read().count == 1).await;
        assert_eq!(helper.reader.read().vessels[0].record.mmsi, visible);

        helper
            .ais_source
            .send_position(&AisPositionMessage::test_default(hidden))
            .await;

        wait_until(LIMIT, || helper.reader.read().count == 2).await;

        let snapshot = helper.reader.read();
        let record = &snapshot.vessels[0].record;
        assert_eq!(record.mmsi, hidden);
        assert_eq!(record.ship_category, ShipCategory::Cargo);
    })
    .await;
}

#[tokio::test]
async fn test_malformed_frames_do_not_close_the_connection() {
    test(|helper| async move {
        helper.ais_source.send_string("not json".to_string()).await;
        helper.ais_source.send_string("{}".to_string()).await;
        helper
            .ais_source
            .send_string(
                r#"{"MessageType":"PositionReport","MetaData":{"latitude":1.0,"longitude":1.0},"Message":{"PositionReport":{}}}"#
                    .to_string(),
            )
            .await;
        helper
            .ais_source
            .send_position(&AisPositionMessage::test_default(Mmsi::new(1)))
            .await;

        wait_until(LIMIT, || helper.reader.read().count == 1).await;
        assert_eq!(helper.transport.connects().len(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_subscription_carries_key_region_and_message_types() {
    test(|helper| async move {
        wait_until(LIMIT, || !helper.transport.subscriptions().is_empty()).await;

        let subscription = &helper.transport.subscriptions()[0];
        assert_eq!(subscription["APIKey"], "test-key");
        assert_eq!(
            subscription["BoundingBoxes"],
            serde_json::json!([[[24.0, -130.0], [50.0, -60.0]]])
        );
        assert_eq!(
            subscription["FilterMessageTypes"],
            serde_json::json!(["PositionReport", "ShipStaticData"])
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_delay_doubles_until_data_is_received() {
    let frame = serde_json::to_string(&AisPositionMessage::test_default(Mmsi::new(1))).unwrap();

    let sessions = vec![
        Session::Refuse,
        Session::Frames(vec![]),
        Session::Refuse,
        Session::Refuse,
        Session::Frames(vec![frame]),
        Session::Refuse,
    ];

    test_with_sessions(sessions, |helper| async move {
        wait_until(Duration::from_secs(600), || {
            helper.transport.connects().len() == 7
        })
        .await;

        let connects = helper.transport.connects();
        let gaps: Vec<u64> = connects
            .windows(2)
            .map(|w| (w[1] - w[0]).as_secs())
            .collect();

        assert_eq!(gaps, vec![10, 20, 40, 60, 5, 10]);
        assert_eq!(helper.reader.read().count, 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_clean_close_triggers_reconnect() {
    test(|mut helper| async move {
        helper
            .ais_source
            .send_position(&AisPositionMessage::test_default(Mmsi::new(1)))
            .await;
        wait_until(LIMIT, || helper.reader.read().count == 1).await;

        helper.ais_source.close();

        wait_until(Duration::from_secs(60), || {
            helper.transport.connects().len() == 2
        })
        .await;

        let connects = helper.transport.connects();
        assert_eq!((connects[1] - connects[0]).as_secs(), 5);
        // Vessels survive a reconnect.
        assert_eq!(helper.reader.read().count, 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_stale_vessels_are_evicted_periodically() {
    test(|helper| async move {
        helper
            .ais_source
            .send_position(&AisPositionMessage::test_default(Mmsi::new(1)))
            .await;
        wait_until(LIMIT, || helper.reader.read().count == 1).await;

        tokio::time::sleep(Duration::from_secs(4 * 60)).await;
        assert_eq!(helper.reader.read().count, 1);

        helper
            .ais_source
            .send_position(&AisPositionMessage::test_default(Mmsi::new(2)))
            .await;
        wait_until(LIMIT, || helper.reader.read().count == 2).await;

        tokio::time::sleep(Duration::from_secs(2 * 60 + 1)).await;

        let snapshot = helper.reader.read();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.vessels[0].record.mmsi, Mmsi::new(2));
    })
    .await;
}

fn reconnect_gaps(connects: &[tokio::time::Instant]) -> Vec<u64> {
    connects
        .windows(2)
        .map(|w| (w[1] - w[0]).as_secs())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_mid_stream_triggers_reconnect() {
    let frame = serde_json::to_string(&AisPositionMessage::test_default(Mmsi::new(1))).unwrap();

    let sessions = vec![
        Session::FramesThenError(vec![]),
        Session::FramesThenError(vec![frame]),
    ];

    test_with_sessions(sessions, |helper| async move {
        wait_until(Duration::from_secs(60), || {
            helper.transport.connects().len() == 3
        })
        .await;

        assert_eq!(reconnect_gaps(&helper.transport.connects()), vec![10, 5]);
        assert_eq!(helper.reader.read().count, 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_utf8_frames_are_dropped_and_not_counted_as_data() {
    let position = serde_json::to_string(&AisPositionMessage::test_default(Mmsi::new(1))).unwrap();
    let invalid = vec![b'{', 0xff, 0xfe, b'}'];

    let sessions = vec![
        Session::Raw(vec![invalid.clone()]),
        Session::Raw(vec![invalid, position.into_bytes()]),
    ];

    test_with_sessions(sessions, |helper| async move {
        wait_until(Duration::from_secs(60), || {
            helper.transport.connects().len() == 3
        })
        .await;

        // The first session only carried garbage and counts as empty, the second still
        // delivered the position after the bad frame.
        assert_eq!(reconnect_gaps(&helper.transport.connects()), vec![10, 5]);
        assert_eq!(helper.reader.read().count, 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_silent_connection_is_dropped_after_idle_timeout() {
    let mut settings = test_settings();
    settings.idle_timeout = Duration::from_secs(30);

    test_with_settings(settings, |helper| async move {
        wait_until(Duration::from_secs(120), || {
            helper.transport.connects().len() == 2
        })
        .await;

        // 30s of silence, then the doubled empty-cycle delay.
        assert_eq!(reconnect_gaps(&helper.transport.connects()), vec![40]);
    })
    .await;
}
