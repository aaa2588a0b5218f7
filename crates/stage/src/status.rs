use cubescape_common::CameraMode;
use cubescape_kernel::{RateCap, Scene};
use cubescape_telemetry::TelemetrySnapshot;

/// One-line summary published after every frame. Rates are truncated to
/// whole frames per second.
pub fn format_status(
    scene: Scene,
    camera: CameraMode,
    renderer: &str,
    telemetry: &TelemetrySnapshot,
    cap: RateCap,
) -> String {
    format!(
        "{scene} | {camera} | {renderer} | FPS:{} | 1%:{} | 0.1%:{} | LIM:{cap}",
        telemetry.fps as u32, telemetry.low_1 as u32, telemetry.low_01 as u32,
    )
}
