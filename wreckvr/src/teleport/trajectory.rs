use cgmath::{InnerSpace, Vector3, vec3};

use crate::vr_config::ArcConfig;

/// One point of the simulated throw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSample {
    pub position: Vector3<f32>,
    /// Seconds since launch
    pub time_offset: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landing {
    pub position: Vector3<f32>,
    /// `false` means "do not teleport"
    pub valid: bool,
}

/// Arc trajectory for one tick of a teleport charge
#[derive(Clone, Debug, PartialEq)]
pub struct ArcSolution {
    /// Samples from the origin up to (and ending at) the landing point
    pub samples: Vec<ArcSample>,
    pub landing: Landing,
    /// Level-ground throw distance the charge mapped to
    pub reach: f32,
}

impl ArcSolution {
    /// Get the arc length (useful for visual feedback)
    pub fn arc_length(&self) -> f32 {
        self.samples
            .windows(2)
            .map(|pair| (pair[1].position - pair[0].position).magnitude())
            .sum()
    }

    /// Get trajectory point at normalized position (0.0 to 1.0)
    pub fn point_at_normalized(&self, t: f32) -> Option<Vector3<f32>> {
        let last = self.samples.len().checked_sub(1)?;
        let scaled = t.clamp(0.0, 1.0) * last as f32;
        let index = scaled as usize;
        if index >= last {
            return Some(self.samples[last].position);
        }

        let t_local = scaled - index as f32;
        let p1 = self.samples[index].position;
        let p2 = self.samples[index + 1].position;

        Some(p1 + (p2 - p1) * t_local)
    }
}

/// Ballistic teleport arc: charge magnitude → reach → launch velocity →
/// sampled parabola → first floor crossing.
#[derive(Clone, Debug, Default)]
pub struct TeleportArcSolver {
    config: ArcConfig,
}

impl TeleportArcSolver {
    pub fn new(config: ArcConfig) -> Self {
        TeleportArcSolver { config }
    }

    pub fn config(&self) -> &ArcConfig {
        &self.config
    }

    /// Map a charge in `[charge_threshold, 1]` onto `[min_reach, max_reach]`
    /// through the reach power curve.
    pub fn reach_for_charge(&self, charge_magnitude: f32) -> f32 {
        let config = &self.config;
        let threshold = config.charge_threshold;
        let charge = if charge_magnitude.is_finite() {
            charge_magnitude.clamp(threshold, 1.0)
        } else {
            threshold
        };
        let normalized = ((charge - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
        config.min_reach + (config.max_reach - config.min_reach) * normalized.powf(config.reach_exponent)
    }

    pub fn solve(
        &self,
        origin: Vector3<f32>,
        aim_direction: Vector3<f32>,
        charge_magnitude: f32,
        floor_height: f32,
    ) -> ArcSolution {
        let reach = self.reach_for_charge(charge_magnitude);
        let height_above_floor = origin.y - floor_height;
        let velocity = self.launch_velocity(aim_direction, reach, height_above_floor);

        let sample_count = self.config.sample_count.max(2);
        let duration = self.flight_duration(velocity, height_above_floor);
        let time_step = duration / (sample_count - 1) as f32;

        let mut samples: Vec<ArcSample> = (0..sample_count)
            .map(|i| {
                let t = i as f32 * time_step;
                ArcSample {
                    position: self.position_at_time(origin, velocity, t),
                    time_offset: t,
                }
            })
            .collect();

        let landing_position = match self.find_floor_crossing(&samples, origin, floor_height) {
            Some((index, sample)) => {
                samples.truncate(index);
                samples.push(sample);
                Some(sample.position)
            }
            None => self.find_fallback(&samples, velocity).map(|index| {
                samples.truncate(index + 1);
                samples[index].position
            }),
        };

        let landing = match landing_position {
            Some(position) => Landing {
                position,
                valid: self.is_valid_landing(position, origin),
            },
            None => Landing {
                position: origin,
                valid: false,
            },
        };

        ArcSolution {
            samples,
            landing,
            reach,
        }
    }

    /// Launch velocity such that a level aim lands `reach` away on a floor
    /// `height_above_floor` below the origin.
    fn launch_velocity(
        &self,
        aim_direction: Vector3<f32>,
        reach: f32,
        height_above_floor: f32,
    ) -> Vector3<f32> {
        let g = -self.config.gravity;

        let aim = if aim_direction.magnitude2() > 1e-8 && aim_direction.magnitude2().is_finite() {
            aim_direction.normalize()
        } else {
            vec3(0.0, 0.0, -1.0)
        };
        let horizontal = vec3(aim.x, 0.0, aim.z);
        // Straight up/down aims have no heading; throw along -Z.
        let heading = if horizontal.magnitude2() > 1e-6 {
            horizontal.normalize()
        } else {
            vec3(0.0, 0.0, -1.0)
        };

        let pitch = aim.y.clamp(-1.0, 1.0).asin();
        let level_elevation = self.config.launch_angle_degrees.to_radians();
        let elevation = (level_elevation + pitch * 0.5)
            .clamp(MIN_ELEVATION_DEGREES.to_radians(), MAX_ELEVATION_DEGREES.to_radians());

        let mut speed = speed_for_distance(reach, level_elevation, height_above_floor, g)
            .unwrap_or_else(|| (reach * g).sqrt());

        if pitch > 0.0 {
            speed *= 1.0 - UPWARD_SPEED_REDUCTION * pitch.sin();
        } else if pitch < -STEEP_DOWN_PITCH_DEGREES.to_radians() {
            let steepness = (-pitch - STEEP_DOWN_PITCH_DEGREES.to_radians())
                / (90.0 - STEEP_DOWN_PITCH_DEGREES).to_radians();
            speed *= 1.0 + STEEP_DOWN_SPEED_BOOST * steepness.clamp(0.0, 1.0);
        }

        let max_reach = self.config.max_reach;
        if landing_distance(speed, elevation, height_above_floor, g).is_some_and(|d| d > max_reach) {
            if let Some(capped) = speed_for_distance(max_reach, elevation, height_above_floor, g) {
                speed = speed.min(capped);
            }
        }

        heading * (speed * elevation.cos()) + vec3(0.0, speed * elevation.sin(), 0.0)
    }

    /// ~2.2× time-to-apex with a floor of `min_flight_time`, stretched to
    /// cover the predicted floor contact when the floor sits far below.
    fn flight_duration(&self, velocity: Vector3<f32>, height_above_floor: f32) -> f32 {
        let g = -self.config.gravity;
        let time_to_apex = velocity.y.max(0.0) / g;
        let estimate = (self.config.flight_time_factor * time_to_apex).max(self.config.min_flight_time);

        match time_to_floor(velocity.y, height_above_floor, g) {
            Some(t) if t * LANDING_TIME_MARGIN > estimate => {
                (t * LANDING_TIME_MARGIN).min(MAX_FLIGHT_TIME)
            }
            _ => estimate,
        }
    }

    fn position_at_time(&self, origin: Vector3<f32>, velocity: Vector3<f32>, t: f32) -> Vector3<f32> {
        origin + velocity * t + vec3(0.0, 0.5 * self.config.gravity * t * t, 0.0)
    }

    /// First downward crossing of the floor plane, interpolated between the
    /// bracketing samples. Returns the index of the sample below the floor
    /// and the interpolated landing.
    ///
    /// Within the rising grace distance a crossing that is still above the
    /// launch height is ignored: that is a raised floor clipping the start of
    /// a lob, not a landing.
    fn find_floor_crossing(
        &self,
        samples: &[ArcSample],
        origin: Vector3<f32>,
        floor_height: f32,
    ) -> Option<(usize, ArcSample)> {
        samples.windows(2).enumerate().find_map(|(i, pair)| {
            let (prev, cur) = (pair[0], pair[1]);
            if prev.position.y < floor_height || cur.position.y >= floor_height {
                return None;
            }
            if cur.position.y > origin.y
                && horizontal_distance(cur.position, origin) < self.config.rising_grace_distance
            {
                return None;
            }

            let fraction = (prev.position.y - floor_height) / (prev.position.y - cur.position.y);
            let mut position = prev.position + (cur.position - prev.position) * fraction;
            position.y = floor_height;
            let time_offset = prev.time_offset + (cur.time_offset - prev.time_offset) * fraction;

            Some((i + 1, ArcSample { position, time_offset }))
        })
    }

    /// Lowest sample that is already falling and far enough along the arc
    /// not to be the apex.
    fn find_fallback(&self, samples: &[ArcSample], velocity: Vector3<f32>) -> Option<usize> {
        let min_index = (samples.len() as f32 * self.config.fallback_min_fraction) as usize;
        samples
            .iter()
            .enumerate()
            .skip(min_index + 1)
            .filter(|(_, sample)| velocity.y + self.config.gravity * sample.time_offset < 0.0)
            .min_by(|(_, a), (_, b)| a.position.y.total_cmp(&b.position.y))
            .map(|(index, _)| index)
    }

    fn is_valid_landing(&self, landing: Vector3<f32>, origin: Vector3<f32>) -> bool {
        if !landing.x.is_finite() || !landing.y.is_finite() || !landing.z.is_finite() {
            return false;
        }

        let tolerance = self.config.distance_tolerance;
        let distance = horizontal_distance(landing, origin);
        distance >= self.config.min_reach - tolerance && distance <= self.config.max_reach + tolerance
    }
}

const MIN_ELEVATION_DEGREES: f32 = -15.0;
const MAX_ELEVATION_DEGREES: f32 = 75.0;
const UPWARD_SPEED_REDUCTION: f32 = 0.25;
const STEEP_DOWN_PITCH_DEGREES: f32 = 30.0;
const STEEP_DOWN_SPEED_BOOST: f32 = 0.1;
const LANDING_TIME_MARGIN: f32 = 1.05;
const MAX_FLIGHT_TIME: f32 = 6.0;

pub fn horizontal_distance(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    vec3(a.x - b.x, 0.0, a.z - b.z).magnitude()
}

/// Launch speed that lands `distance` away at `elevation` on a floor `height`
/// below the origin. `None` when no speed reaches it at that angle.
fn speed_for_distance(distance: f32, elevation: f32, height: f32, g: f32) -> Option<f32> {
    let cos = elevation.cos();
    let denominator = 2.0 * cos * cos * (height + distance * elevation.tan());
    if denominator <= 1e-6 {
        return None;
    }
    let speed = (g * distance * distance / denominator).sqrt();
    speed.is_finite().then_some(speed)
}

/// Positive time at which `y0 + vy t - g t²/2` reaches the floor `height` below.
fn time_to_floor(vertical_speed: f32, height: f32, g: f32) -> Option<f32> {
    let discriminant = vertical_speed * vertical_speed + 2.0 * g * height;
    if discriminant < 0.0 {
        return None;
    }
    let t = (vertical_speed + discriminant.sqrt()) / g;
    (t > 0.0).then_some(t)
}

fn landing_distance(speed: f32, elevation: f32, height: f32, g: f32) -> Option<f32> {
    time_to_floor(speed * elevation.sin(), height, g).map(|t| speed * elevation.cos() * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> TeleportArcSolver {
        TeleportArcSolver::new(ArcConfig::default())
    }

    fn level() -> Vector3<f32> {
        vec3(0.0, 0.0, -1.0)
    }

    #[test]
    fn test_full_charge_level_aim_reaches_max() {
        let solution = solver().solve(vec3(0.0, 0.0, 0.0), level(), 1.0, 0.0);

        assert!(solution.landing.valid);
        let distance = horizontal_distance(solution.landing.position, vec3(0.0, 0.0, 0.0));
        assert!((distance - 30.0).abs() < 0.1, "distance {}", distance);
        assert!(solution.landing.position.z < 0.0);
        assert_eq!(solution.landing.position.y, 0.0);
    }

    #[test]
    fn test_charge_just_above_threshold_lands_near_min() {
        let solution = solver().solve(vec3(0.0, 0.0, 0.0), level(), 0.71, 0.0);

        assert!(solution.landing.valid);
        let distance = horizontal_distance(solution.landing.position, vec3(0.0, 0.0, 0.0));
        assert!((3.0..6.0).contains(&distance), "distance {}", distance);
        assert!(distance < solution.reach + 0.05);
    }

    #[test]
    fn test_landing_distance_bounded_for_all_charges() {
        let solver = solver();
        for origin_height in [0.0, 1.2, 1.6] {
            for step in 0..=30 {
                let charge = 0.7 + 0.01 * step as f32;
                let origin = vec3(0.0, origin_height, 0.0);
                let solution = solver.solve(origin, level(), charge, 0.0);
                let distance = horizontal_distance(solution.landing.position, origin);
                assert!(
                    !solution.landing.valid || (2.95..=30.05).contains(&distance),
                    "charge {} height {} distance {}",
                    charge,
                    origin_height,
                    distance
                );
                assert!(solution.landing.valid, "charge {} height {}", charge, origin_height);
            }
        }
    }

    #[test]
    fn test_reach_is_monotonic_in_charge() {
        let solver = solver();
        let mut previous = 0.0;
        for step in 0..=10 {
            let reach = solver.reach_for_charge(0.7 + 0.03 * step as f32);
            assert!(reach >= previous);
            previous = reach;
        }
        assert_eq!(solver.reach_for_charge(0.2), 3.0);
        assert_eq!(solver.reach_for_charge(5.0), 30.0);
        assert_eq!(solver.reach_for_charge(f32::NAN), 3.0);
    }

    #[test]
    fn test_aiming_up_does_not_overshoot() {
        let aim = vec3(0.0, 1.0, -1.0).normalize();
        let solution = solver().solve(vec3(0.0, 1.5, 0.0), aim, 1.0, 0.0);
        let distance = horizontal_distance(solution.landing.position, vec3(0.0, 1.5, 0.0));
        assert!(distance <= 30.05, "distance {}", distance);
    }

    #[test]
    fn test_deep_floor_override_still_finds_floor() {
        let solution = solver().solve(vec3(0.0, 0.0, 0.0), level(), 1.0, -10.0);
        assert_eq!(solution.landing.position.y, -10.0);
        assert!(solution.landing.valid);
    }

    #[test]
    fn test_unreachable_floor_uses_falling_fallback() {
        // Floor far above the apex: no crossing exists.
        let solution = solver().solve(vec3(0.0, 0.0, 0.0), level(), 0.7, 50.0);
        let samples = solution.samples.len();

        // The fallback must never be the apex or the rising part of the arc.
        assert!(samples > ArcConfig::default().sample_count / 3);
        let last = solution.samples.last().unwrap();
        assert_eq!(last.position, solution.landing.position);
        let peak = solution
            .samples
            .iter()
            .map(|s| s.position.y)
            .fold(f32::MIN, f32::max);
        assert!(solution.landing.position.y < peak);
    }

    #[test]
    fn test_straight_down_short_throw_is_invalid() {
        let solution = solver().solve(vec3(0.0, 1.0, 0.0), vec3(0.0, -1.0, 0.0), 0.7, 0.9);
        assert!(!solution.landing.valid);
    }

    #[test]
    fn test_samples_end_at_landing() {
        let solution = solver().solve(vec3(0.0, 1.0, 0.0), level(), 0.9, 0.0);
        assert_eq!(solution.samples[0].position, vec3(0.0, 1.0, 0.0));
        assert_eq!(solution.samples.last().unwrap().position, solution.landing.position);
        assert!(solution
            .samples
            .windows(2)
            .all(|pair| pair[1].time_offset > pair[0].time_offset));
    }

    #[test]
    fn test_degenerate_aim_is_handled() {
        let solution = solver().solve(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 0.0), 1.0, 0.0);
        assert!(solution.landing.valid);
        assert!(solution.landing.position.z < 0.0);
    }

    #[test]
    fn test_get_arc_length() {
        let solution = solver().solve(vec3(0.0, 2.0, 0.0), vec3(1.0, 0.0, 0.0), 0.8, 0.0);
        let arc_length = solution.arc_length();
        assert!(arc_length > horizontal_distance(solution.landing.position, vec3(0.0, 2.0, 0.0)));
        assert!(arc_length < 60.0);
    }

    #[test]
    fn test_normalized_position_interpolation() {
        let origin = vec3(0.0, 2.0, 0.0);
        let solution = solver().solve(origin, vec3(1.0, 0.0, 0.0), 0.8, 0.0);

        assert_eq!(solution.point_at_normalized(0.0), Some(origin));
        assert_eq!(solution.point_at_normalized(1.0), Some(solution.landing.position));
        let middle = solution.point_at_normalized(0.5).unwrap();
        assert!(middle.x > 0.0 && middle.x < solution.landing.position.x);
    }
}
