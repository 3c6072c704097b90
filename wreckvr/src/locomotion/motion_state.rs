use serde::Serialize;

/// Remaining distance under which a ramp lands exactly on its target.
const SETTLE_EPSILON: f32 = 1e-4;

/// Move `current` toward `target` by the exponential step `1 - e^(-rate·dt)`.
/// The result never passes `target` and settles on it once within a
/// fraction of a millimeter per second.
pub fn ramp_toward(current: f32, target: f32, rate: f32, delta_time: f32) -> f32 {
    if !current.is_finite() {
        return target;
    }
    if delta_time <= 0.0 || rate <= 0.0 || !delta_time.is_finite() {
        return current;
    }

    let blend = 1.0 - (-rate * delta_time).exp();
    let next = current + (target - current) * blend;
    if (target - next).abs() < SETTLE_EPSILON {
        target
    } else if current <= target {
        next.clamp(current, target)
    } else {
        next.clamp(target, current)
    }
}

/// Continuous movement state, owned by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionState {
    pub is_moving: bool,
    pub current_speed: f32,
    pub target_speed: f32,
    pub current_boost_level: f32,
    pub target_boost_level: f32,
}

/// Read-only snapshot handed to listeners every processed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MovementUpdate {
    pub is_moving: bool,
    pub current_speed: f32,
    pub is_boosted: bool,
    pub current_boost_level: f32,
}

impl MotionState {
    /// Set targets for this tick and ramp toward them.
    pub fn step(
        &mut self,
        target_speed: f32,
        boosted: bool,
        speed_ramp_rate: f32,
        boost_ramp_rate: f32,
        delta_time: f32,
    ) {
        self.target_speed = target_speed.max(0.0);
        self.target_boost_level = if boosted { 1.0 } else { 0.0 };

        let speed_ceiling = self.target_speed.max(self.current_speed);
        self.current_speed = ramp_toward(self.current_speed, self.target_speed, speed_ramp_rate, delta_time)
            .clamp(0.0, speed_ceiling);
        self.current_boost_level = ramp_toward(
            self.current_boost_level,
            self.target_boost_level,
            boost_ramp_rate,
            delta_time,
        )
        .clamp(0.0, 1.0);
    }

    /// Drop to rest immediately, e.g. when the session stops being visible.
    pub fn halt(&mut self) {
        *self = MotionState::default();
    }

    pub fn snapshot(&self) -> MovementUpdate {
        MovementUpdate {
            is_moving: self.is_moving,
            current_speed: self.current_speed,
            is_boosted: self.target_boost_level > 0.0,
            current_boost_level: self.current_boost_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_converges_monotonically() {
        for target in [0.5, 2.0, 6.0] {
            let mut speed = 0.0;
            let mut previous = speed;
            for _ in 0..600 {
                speed = ramp_toward(speed, target, 3.0, 1.0 / 60.0);
                assert!(speed >= previous);
                assert!(speed <= target);
                previous = speed;
            }
            assert_eq!(speed, target);
        }
    }

    #[test]
    fn test_ramp_down_never_undershoots() {
        let mut speed = 6.0;
        for _ in 0..600 {
            let next = ramp_toward(speed, 2.0, 3.0, 1.0 / 90.0);
            assert!(next <= speed && next >= 2.0);
            speed = next;
        }
        assert_eq!(speed, 2.0);
    }

    #[test]
    fn test_large_step_does_not_overshoot() {
        let speed = ramp_toward(0.0, 2.0, 3.0, 100.0);
        assert_eq!(speed, 2.0);
    }

    #[test]
    fn test_zero_delta_keeps_value() {
        assert_eq!(ramp_toward(1.0, 2.0, 3.0, 0.0), 1.0);
        assert_eq!(ramp_toward(1.0, 2.0, 3.0, f32::NAN), 1.0);
    }

    #[test]
    fn test_boost_level_stays_in_unit_range() {
        let mut state = MotionState::default();
        for _ in 0..120 {
            state.step(6.0, true, 3.0, 6.0, 1.0 / 60.0);
            assert!((0.0..=1.0).contains(&state.current_boost_level));
        }
        assert_eq!(state.current_boost_level, 1.0);
        assert!(state.snapshot().is_boosted);

        for _ in 0..600 {
            state.step(2.0, false, 3.0, 6.0, 1.0 / 60.0);
        }
        assert_eq!(state.current_boost_level, 0.0);
        assert_eq!(state.current_speed, 2.0);
    }
}
