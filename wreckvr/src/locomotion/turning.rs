use engine::FrameClock;

/// Yaw change for one tick of smooth turning. Right deflection turns right,
/// which is negative yaw.
pub fn smooth_turn_delta(stick_x: f32, turn_speed: f32, delta_time: f32) -> f32 {
    -stick_x * turn_speed * delta_time
}

/// Cooldown bookkeeping for discrete snap turns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapTurnState {
    last_snap_time: Option<f32>,
}

impl SnapTurnState {
    /// Returns the yaw step to apply this tick, if a snap fires.
    pub fn update(
        &mut self,
        clock: &FrameClock,
        stick_x: f32,
        threshold: f32,
        cooldown: f32,
        angle_degrees: f32,
    ) -> Option<f32> {
        if !stick_x.is_finite() || stick_x.abs() <= threshold {
            return None;
        }

        if let Some(last) = self.last_snap_time {
            if clock.since(last) < cooldown {
                return None;
            }
        }

        self.last_snap_time = Some(clock.total);
        Some(-stick_x.signum() * angle_degrees.to_radians())
    }

    /// Forget the last snap so the next deflection fires immediately.
    pub fn reset(&mut self) {
        self.last_snap_time = None;
    }

    pub fn last_snap_time(&self) -> Option<f32> {
        self.last_snap_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(seconds: f32) -> FrameClock {
        let mut clock = FrameClock::new();
        clock.advance(seconds);
        clock
    }

    #[test]
    fn test_cooldown_blocks_second_snap() {
        let mut state = SnapTurnState::default();
        let step = state.update(&clock_at(0.0), 0.8, 0.5, 0.5, 45.0).unwrap();
        assert!((step + 45f32.to_radians()).abs() < 1e-6);

        assert_eq!(state.update(&clock_at(0.2), 0.8, 0.5, 0.5, 45.0), None);
        assert!(state.update(&clock_at(0.6), 0.8, 0.5, 0.5, 45.0).is_some());
    }

    #[test]
    fn test_left_deflection_turns_left() {
        let mut state = SnapTurnState::default();
        let step = state.update(&clock_at(1.0), -0.9, 0.5, 0.5, 30.0).unwrap();
        assert!(step > 0.0);
    }

    #[test]
    fn test_below_threshold_never_fires() {
        let mut state = SnapTurnState::default();
        assert_eq!(state.update(&clock_at(0.0), 0.5, 0.5, 0.5, 45.0), None);
        assert_eq!(state.last_snap_time(), None);
    }

    #[test]
    fn test_reset_clears_cooldown() {
        let mut state = SnapTurnState::default();
        state.update(&clock_at(0.0), 0.8, 0.5, 0.5, 45.0);
        state.reset();
        assert!(state.update(&clock_at(0.1), 0.8, 0.5, 0.5, 45.0).is_some());
    }

    #[test]
    fn test_smooth_turn_scales_with_time() {
        assert!((smooth_turn_delta(1.0, 2.0, 0.5) + 1.0).abs() < 1e-6);
        assert_eq!(smooth_turn_delta(0.0, 2.0, 0.5), 0.0);
    }
}
