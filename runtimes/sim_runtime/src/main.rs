// Sim Runtime - headless replay of recorded VR input through the locomotion core
//
// Loads a VR config and an input script, feeds the frames to a
// LocomotionController at a fixed rate, and logs every emitted event. Useful
// for reproducing locomotion bugs without a headset.

use std::path::PathBuf;

use anyhow::Context;
use cgmath::Vector3;
use clap::Parser;
use engine::{logging, profile};
use serde_json::json;
use tracing::info;
use wreckvr::{
    Handedness, LocomotionController, LocomotionEvent, LocomotionListener, MovementUpdate,
    RigTransform, ScriptedInputProvider, VrConfig,
};

#[derive(Parser)]
#[command(name = "sim_runtime")]
#[command(about = "Replay a recorded VR input script through the locomotion core")]
struct Args {
    /// Input script (JSON list of frames with optional repeat counts)
    script: PathBuf,

    /// VR config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comfort preset to apply before replaying (comfort, balanced, free)
    #[arg(short, long)]
    preset: Option<String>,

    /// Simulation rate in frames per second
    #[arg(long, default_value = "72")]
    hz: f32,

    /// Starting rig position as x,y,z
    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    start: String,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    summary: bool,
}

fn parse_position(value: &str) -> anyhow::Result<Vector3<f32>> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Unable to parse start position: {}", value))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => anyhow::bail!("Start position needs three components, got {}", parts.len()),
    }
}

/// Logs controller events as they are dispatched.
struct EventLogger {
    verbose_updates: bool,
}

impl LocomotionListener for EventLogger {
    fn on_movement_start(&mut self) {
        info!("movement started");
    }

    fn on_movement_stop(&mut self) {
        info!("movement stopped");
    }

    fn on_movement_update(&mut self, update: &MovementUpdate) {
        if self.verbose_updates && update.is_moving {
            tracing::debug!(
                "speed {:.3} boost {:.2}",
                update.current_speed,
                update.current_boost_level
            );
        }
    }

    fn on_teleport_start(&mut self, hand: Handedness) {
        info!("teleport charge from {:?} hand", hand);
    }

    fn on_teleport_end(&mut self, committed: bool) {
        info!("teleport charge ended (committed: {})", committed);
    }

    fn on_teleported(&mut self, from: Vector3<f32>, to: Vector3<f32>) {
        info!(
            "teleported ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
            from.x, from.y, from.z, to.x, to.y, to.z
        );
    }

    fn on_snap_turn(&mut self, step: f32) {
        info!("snap turn {:.1} degrees", step.to_degrees());
    }
}

#[derive(Default)]
struct RunStats {
    frames: usize,
    teleports: usize,
    snap_turns: usize,
    movement_starts: usize,
    arc_updates: usize,
}

impl RunStats {
    fn record(&mut self, events: &[LocomotionEvent]) {
        self.frames += 1;
        for event in events {
            match event {
                LocomotionEvent::Teleported { .. } => self.teleports += 1,
                LocomotionEvent::SnapTurn { .. } => self.snap_turns += 1,
                LocomotionEvent::MovementStart => self.movement_starts += 1,
                LocomotionEvent::ArcVisual(_) => self.arc_updates += 1,
                _ => {}
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let log_config = logging::init_logging(logging::DEFAULT_LOG_ENV);
    let args = Args::parse();

    anyhow::ensure!(args.hz.is_finite() && args.hz > 0.0, "--hz must be positive");
    let delta_time = 1.0 / args.hz;
    let start = parse_position(&args.start)?;

    let config = match &args.config {
        Some(path) => VrConfig::load(path)
            .with_context(|| format!("Failed to load VR config {}", path.display()))?,
        None => VrConfig::default(),
    };

    let mut provider = ScriptedInputProvider::load(&args.script)
        .with_context(|| format!("Failed to load input script {}", args.script.display()))?;

    let mut controller = LocomotionController::new(&config).with_rig(RigTransform::new(start, 0.0));
    if let Some(preset) = &args.preset {
        anyhow::ensure!(controller.apply_preset(preset), "Unknown comfort preset: {}", preset);
    }
    controller.add_listener(Box::new(EventLogger {
        verbose_updates: log_config.should_log("locomotion", logging::Level::DEBUG),
    }));

    info!(
        "Replaying {} frames at {} Hz ({:?} locomotion)",
        provider.remaining(),
        args.hz,
        controller.comfort().locomotion_mode()
    );

    let mut stats = RunStats::default();
    while !provider.is_finished() {
        let events = profile!("sim.tick", controller.tick(delta_time, &mut provider));
        stats.record(&events);
    }

    let rig = controller.rig().copied().unwrap_or_default();
    info!(
        "Finished after {} frames ({:.2}s): rig at ({:.3}, {:.3}, {:.3}) yaw {:.1} degrees",
        stats.frames,
        controller.clock().total,
        rig.position.x,
        rig.position.y,
        rig.position.z,
        rig.yaw.to_degrees()
    );

    if args.summary {
        let summary = json!({
            "frames": stats.frames,
            "simulated_seconds": controller.clock().total,
            "teleports": stats.teleports,
            "snap_turns": stats.snap_turns,
            "movement_starts": stats.movement_starts,
            "arc_updates": stats.arc_updates,
            "rig": {
                "position": [rig.position.x, rig.position.y, rig.position.z],
                "yaw": rig.yaw,
            },
            "comfort": controller.comfort(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
