use cgmath::Vector3;
use engine::teleport_log;

use super::{ArcSolution, Landing, TeleportArcSolver, TeleportUI, TeleportVisual, TeleportVisualStyle};
use crate::vr_config::{Handedness, LocomotionConfig};

/// State of one teleport gesture, alive from the press until release or cancellation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportCharge {
    pub origin_controller: Handedness,
    /// Highest charge magnitude seen so far; the arc never shrinks while the stick eases off
    pub max_magnitude_seen: f32,
    /// Floor plane the arc is aimed at
    pub floor_height_override: f32,
    /// Rig height when the charge started
    pub start_height: f32,
}

/// Owns the arc visual, the floor-height override and the commit/cancel
/// protocol of a single teleport gesture. Never writes the rig itself:
/// the committed target is handed back to the caller.
pub struct TeleportSession {
    solver: TeleportArcSolver,
    style: TeleportVisualStyle,
    deadzone: f32,
    floor_adjust_speed: f32,
    floor_adjust_range: f32,
    charge: Option<TeleportCharge>,
    last_solution: Option<ArcSolution>,
}

impl TeleportSession {
    pub fn new(solver: TeleportArcSolver, config: &LocomotionConfig) -> Self {
        TeleportSession {
            solver,
            style: TeleportVisualStyle::default(),
            deadzone: config.deadzone,
            floor_adjust_speed: config.floor_adjust_speed,
            floor_adjust_range: config.floor_adjust_range,
            charge: None,
            last_solution: None,
        }
    }

    pub fn solver(&self) -> &TeleportArcSolver {
        &self.solver
    }

    pub fn is_active(&self) -> bool {
        self.charge.is_some()
    }

    pub fn charge(&self) -> Option<&TeleportCharge> {
        self.charge.as_ref()
    }

    pub fn last_landing(&self) -> Option<Landing> {
        self.last_solution.as_ref().map(|solution| solution.landing)
    }

    /// Begin a charge from `hand`. Returns `false` if a charge is already running.
    pub fn start(&mut self, hand: Handedness, rig_height: f32, magnitude: f32) -> bool {
        if self.charge.is_some() {
            return false;
        }

        self.charge = Some(TeleportCharge {
            origin_controller: hand,
            max_magnitude_seen: sanitize_magnitude(magnitude),
            floor_height_override: rig_height,
            start_height: rig_height,
        });
        self.last_solution = None;
        teleport_log!(DEBUG, "Teleport charge started from {:?} hand at height {:.3}", hand, rig_height);
        true
    }

    /// Advance the active charge by one tick: nudge the floor override with
    /// the off-hand stick, re-solve the arc and build the visual. The marker
    /// level is measured against the rig height at charge start, not the
    /// aim origin.
    ///
    /// Pushing the off-hand stick forward (negative Y) raises the floor.
    pub fn update(
        &mut self,
        delta_time: f32,
        off_hand_stick_y: f32,
        magnitude: f32,
        origin: Vector3<f32>,
        aim_direction: Vector3<f32>,
        show_arc: bool,
    ) -> Option<TeleportVisual> {
        let charge = self.charge.as_mut()?;

        charge.max_magnitude_seen = charge.max_magnitude_seen.max(sanitize_magnitude(magnitude));

        if off_hand_stick_y.is_finite() && off_hand_stick_y.abs() >= self.deadzone && delta_time > 0.0 {
            let nudged =
                charge.floor_height_override - off_hand_stick_y * self.floor_adjust_speed * delta_time;
            charge.floor_height_override = nudged.clamp(
                charge.start_height - self.floor_adjust_range,
                charge.start_height + self.floor_adjust_range,
            );
        }

        let solution = self.solver.solve(
            origin,
            aim_direction,
            charge.max_magnitude_seen,
            charge.floor_height_override,
        );
        let visual = TeleportUI::build_visual(
            &solution,
            charge.floor_height_override,
            charge.start_height,
            show_arc,
            &self.style,
        );
        self.last_solution = Some(solution);
        Some(visual)
    }

    /// End the charge. Returns the rig target when the last landing was valid.
    pub fn commit_or_cancel(&mut self) -> Option<Vector3<f32>> {
        let charge = self.charge.take()?;
        let solution = self.last_solution.take();

        match solution {
            Some(solution) if solution.landing.valid => {
                let landing = solution.landing.position;
                let target = Vector3::new(landing.x, charge.floor_height_override, landing.z);
                teleport_log!(INFO, "Teleport committed to ({:.2}, {:.2}, {:.2})", target.x, target.y, target.z);
                Some(target)
            }
            _ => {
                teleport_log!(DEBUG, "Teleport released without a valid landing");
                None
            }
        }
    }

    /// Drop the active charge without producing a target. Returns whether
    /// a charge was running.
    pub fn cancel(&mut self) -> bool {
        self.last_solution = None;
        let was_active = self.charge.take().is_some();
        if was_active {
            teleport_log!(DEBUG, "Teleport charge cancelled");
        }
        was_active
    }
}

fn sanitize_magnitude(magnitude: f32) -> f32 {
    if magnitude.is_finite() {
        magnitude.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
