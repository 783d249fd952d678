//! Generate a short synthetic capture of a needle sweeping around the vertical
//! axis, replay it and print the recovered yaw per frame.
//!
//! ```text
//! cargo run -p lps --example synthetic_replay
//! ```

use lps::qtm::FrameBuilder;
use lps::{replay_capture, LpsConfig, NeedleSpec};
use nalgebra::{Point3, Rotation3, Vector3};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lps::core::init_with_level(log::LevelFilter::Info)?;

    let forward = Point3::new(0.12, 0.0, 0.0);
    let leftward = Point3::new(0.0, 0.06, 0.0);
    let config = LpsConfig::new(NeedleSpec::new(vec![forward, leftward]));
    let detector = config.build_detector()?;

    let origin = Point3::new(1.5, 0.8, 0.3);
    let mut capture = Vec::new();
    for step in 0..12i32 {
        let yaw = step as f32 * std::f32::consts::PI / 6.0;
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), yaw);
        let f = origin + rot * forward.coords;
        let l = origin + rot * leftward.coords;

        let packet = FrameBuilder::new(step)
            .timestamp_us(i64::from(step) * 10_000)
            .marker_m(-1.0, 2.0, 0.0)
            .marker_m(origin.x, origin.y, origin.z)
            .marker_m(f.x, f.y, f.z)
            .marker_m(l.x, l.y, l.z)
            .build();
        capture.extend_from_slice(&packet);
    }

    let report = replay_capture(&capture, &detector);
    for pose in &report.poses {
        println!(
            "frame {:>2}: yaw {:+.3} rad at ({:.3}, {:.3}, {:.3})",
            pose.frame_id,
            pose.yaw(),
            pose.position.x,
            pose.position.y,
            pose.position.z
        );
    }
    println!("detection rate {:.0}%", 100.0 * report.detection_rate());
    Ok(())
}
