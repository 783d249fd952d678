use std::f32::consts::PI;

use approx::assert_abs_diff_eq;
use lps::qtm::{FrameBuilder, PacketType};
use lps::{track_packet, LpsConfig, NeedleDetector, TrackOutcome};

const EPS: f32 = 1e-4;

fn detector(extra: &str) -> NeedleDetector {
    let json = format!(
        r#"{{ "needle": {{ "markers": [[0.1, 0.0, 0.0], [0.0, 0.05, 0.0]] }} {extra} }}"#
    );
    let config: LpsConfig = serde_json::from_str(&json).expect("config");
    config.build_detector().expect("detector")
}

fn pose_of(outcome: TrackOutcome) -> lps::Pose {
    match outcome {
        TrackOutcome::Detected { detection, .. } => detection.pose,
        other => panic!("expected a detection, got {other:?}"),
    }
}

#[test]
fn upright_needle_in_clutter() {
    let packet = FrameBuilder::new(42)
        .timestamp_us(1_500_000)
        .quality(1000, 500)
        .marker(-800.0, 300.0, 50.0)
        .marker(400.0, 250.0, 120.0)
        .marker(500.0, 250.0, 120.0)
        .marker(400.0, 300.0, 120.0)
        .marker(1900.0, -700.0, 0.0)
        .build();

    let outcome = track_packet(&packet, &detector("")).expect("track");
    let frame = *outcome.frame().expect("frame");
    assert_eq!(frame.number, 42);
    assert_eq!(frame.timestamp_us, 1_500_000);
    assert_abs_diff_eq!(frame.quality, 0.75);
    assert_eq!(frame.marker_count, 5);

    let pose = pose_of(outcome);
    assert_eq!(pose.frame_id, 42);
    assert_abs_diff_eq!(pose.position.x, 0.4, epsilon = EPS);
    assert_abs_diff_eq!(pose.position.y, 0.25, epsilon = EPS);
    assert_abs_diff_eq!(pose.position.z, 0.12, epsilon = EPS);
    assert_abs_diff_eq!(pose.roll(), 0.0, epsilon = EPS);
    assert_abs_diff_eq!(pose.pitch(), 0.0, epsilon = EPS);
    assert_abs_diff_eq!(pose.yaw(), 0.0, epsilon = EPS);
}

#[test]
fn needle_turned_half_way_reports_pi_yaw() {
    let packet = FrameBuilder::new(7)
        .marker_m(1.0, 1.0, 0.0)
        .marker_m(0.9, 1.0, 0.0)
        .marker_m(1.0, 0.95, 0.0)
        .build();

    let pose = pose_of(track_packet(&packet, &detector("")).expect("track"));
    assert_abs_diff_eq!(pose.yaw(), PI, epsilon = EPS);
}

#[test]
fn position_scale_reports_decimeters() {
    let packet = FrameBuilder::new(1)
        .marker_m(1.0, 2.0, 0.5)
        .marker_m(1.1, 2.0, 0.5)
        .marker_m(1.0, 2.05, 0.5)
        .build();

    let det = detector(r#", "pose": { "position_scale": 10.0 }"#);
    let pose = pose_of(track_packet(&packet, &det).expect("track"));
    assert_abs_diff_eq!(pose.position.x, 10.0, epsilon = 1e-3);
    assert_abs_diff_eq!(pose.position.y, 20.0, epsilon = 1e-3);
    assert_abs_diff_eq!(pose.position.z, 5.0, epsilon = 1e-3);
}

#[test]
fn calls_are_independent() {
    let det = detector("");
    let hit = FrameBuilder::new(1)
        .marker_m(0.0, 0.0, 0.0)
        .marker_m(0.1, 0.0, 0.0)
        .marker_m(0.0, 0.05, 0.0)
        .build();
    let miss = FrameBuilder::new(2).marker_m(0.0, 0.0, 0.0).build();

    let first = track_packet(&hit, &det).expect("track");
    assert!(matches!(track_packet(&miss, &det), Ok(TrackOutcome::NoMatch { .. })));
    assert_eq!(track_packet(&hit, &det).expect("track"), first);
}

#[test]
fn non_data_and_malformed_packets() {
    let det = detector("");
    let xml = FrameBuilder::new(0).packet_type(PacketType::Xml).build();
    assert!(matches!(
        track_packet(&xml, &det),
        Ok(TrackOutcome::Ignored {
            packet_type: PacketType::Xml
        })
    ));

    let mut truncated = FrameBuilder::new(1).marker(1.0, 2.0, 3.0).build();
    truncated.truncate(truncated.len() - 2);
    assert!(track_packet(&truncated, &det).is_err());
}

#[test]
fn non_finite_marker_does_not_hide_the_needle() {
    let packet = FrameBuilder::new(5)
        .marker(f32::NAN, 0.0, 0.0)
        .marker(f32::INFINITY, 200.0, 0.0)
        .marker_m(1.0, 1.0, 0.0)
        .marker_m(1.1, 1.0, 0.0)
        .marker_m(1.0, 1.05, 0.0)
        .build();

    let outcome = track_packet(&packet, &detector("")).expect("track");
    let TrackOutcome::Detected { detection, .. } = outcome else {
        panic!("expected a detection, got {outcome:?}");
    };
    assert_eq!(detection.matched.indices(), vec![2, 3, 4]);
    assert_abs_diff_eq!(detection.pose.position.x, 1.0, epsilon = EPS);
    assert_abs_diff_eq!(detection.pose.yaw(), 0.0, epsilon = EPS);
}
