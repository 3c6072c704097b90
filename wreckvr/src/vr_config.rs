use std::path::Path;

use engine::locomotion_log;
use serde::{Deserialize, Serialize};

use crate::comfort::ComfortProfile;
use crate::error::{Result, WreckVrError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn other(self) -> Handedness {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

/// Tunables for continuous movement, turning and teleport input handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Horizontal walking speed in units per second
    pub base_speed: f32,
    /// Fly speed along world Y; may not exceed `base_speed`
    pub vertical_speed: f32,
    pub boost_multiplier: f32,
    pub speed_ramp_rate: f32,
    pub boost_ramp_rate: f32,
    /// Stick values with a magnitude below this are treated as zero
    pub deadzone: f32,
    /// Radians per second at full right-stick deflection
    pub smooth_turn_speed: f32,
    pub snap_turn_threshold: f32,
    /// Seconds between two snap turns
    pub snap_turn_cooldown: f32,
    /// Stick magnitude that ends a teleport charge. Must sit below `ArcConfig::charge_threshold`.
    pub teleport_release_threshold: f32,
    /// Floor override change per second at full off-hand deflection
    pub floor_adjust_speed: f32,
    /// Max distance the floor override may move away from the rig height
    pub floor_adjust_range: f32,
    /// Charge used for pinch-started teleports, which have no analog magnitude
    pub hand_charge_magnitude: f32,
    /// Thumb tip to index tip distance (meters) that counts as a pinch
    pub pinch_distance: f32,
    /// Finger tip to wrist distance (meters) under which a hand counts as a fist
    pub fist_distance: f32,
    /// Arc origin height above the rig when no aim pose is tracked
    pub default_eye_height: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        LocomotionConfig {
            base_speed: 2.0,
            vertical_speed: 1.0,
            boost_multiplier: 3.0,
            speed_ramp_rate: 3.0,
            boost_ramp_rate: 6.0,
            deadzone: 0.15,
            smooth_turn_speed: 2.0,
            snap_turn_threshold: 0.5,
            snap_turn_cooldown: 0.5,
            teleport_release_threshold: 0.3,
            floor_adjust_speed: 2.0,
            floor_adjust_range: 10.0,
            hand_charge_magnitude: 0.85,
            pinch_distance: 0.025,
            fist_distance: 0.09,
            default_eye_height: 1.6,
        }
    }
}

/// Constants of the ballistic teleport arc.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    /// Stick magnitude that starts a charge; charges are clamped to `[charge_threshold, 1]`
    pub charge_threshold: f32,
    pub min_reach: f32,
    pub max_reach: f32,
    pub reach_exponent: f32,
    /// Signed, points down
    pub gravity: f32,
    pub sample_count: usize,
    pub flight_time_factor: f32,
    pub min_flight_time: f32,
    /// Elevation of a level aim
    pub launch_angle_degrees: f32,
    /// Horizontal distance travelled before floor crossings count
    pub rising_grace_distance: f32,
    /// Fraction of the samples a fallback landing must lie beyond
    pub fallback_min_fraction: f32,
    /// Slack on the reach bounds absorbing sampling error
    pub distance_tolerance: f32,
}

impl Default for ArcConfig {
    fn default() -> Self {
        ArcConfig {
            charge_threshold: 0.7,
            min_reach: 3.0,
            max_reach: 30.0,
            reach_exponent: 0.7,
            gravity: -9.8,
            sample_count: 40,
            flight_time_factor: 2.2,
            min_flight_time: 1.5,
            launch_angle_degrees: 45.0,
            rising_grace_distance: 1.0,
            fallback_min_fraction: 1.0 / 3.0,
            distance_tolerance: 0.05,
        }
    }
}

/// Everything the locomotion core reads at startup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrConfig {
    pub locomotion: LocomotionConfig,
    pub arc: ArcConfig,
    pub comfort: ComfortProfile,
}

impl VrConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| WreckVrError::io(format!("read {}", path.display()), err))?;
        let config = Self::from_json_str(&content)?;
        locomotion_log!(INFO, "Loaded VR config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: VrConfig =
            serde_json::from_str(json).map_err(|err| WreckVrError::parse("VR config", err))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| WreckVrError::parse("VR config", err))
    }

    pub fn validate(&self) -> Result<()> {
        let loco = &self.locomotion;
        let arc = &self.arc;

        let positive = [
            ("locomotion.base_speed", loco.base_speed),
            ("locomotion.vertical_speed", loco.vertical_speed),
            ("locomotion.boost_multiplier", loco.boost_multiplier),
            ("locomotion.speed_ramp_rate", loco.speed_ramp_rate),
            ("locomotion.boost_ramp_rate", loco.boost_ramp_rate),
            ("locomotion.smooth_turn_speed", loco.smooth_turn_speed),
            ("locomotion.floor_adjust_range", loco.floor_adjust_range),
            ("arc.min_reach", arc.min_reach),
            ("arc.reach_exponent", arc.reach_exponent),
            ("arc.flight_time_factor", arc.flight_time_factor),
            ("arc.min_flight_time", arc.min_flight_time),
        ];
        for (item, value) in positive {
            if !(value > 0.0) {
                return Err(WreckVrError::validation(item, "must be greater than zero"));
            }
        }

        if loco.vertical_speed > loco.base_speed {
            return Err(WreckVrError::validation(
                "locomotion.vertical_speed",
                "must not exceed locomotion.base_speed",
            ));
        }
        if !(0.0..1.0).contains(&loco.deadzone) {
            return Err(WreckVrError::validation("locomotion.deadzone", "must be in [0, 1)"));
        }
        if !(arc.charge_threshold > 0.0 && arc.charge_threshold < 1.0) {
            return Err(WreckVrError::validation("arc.charge_threshold", "must be in (0, 1)"));
        }
        if !(loco.teleport_release_threshold >= 0.0
            && loco.teleport_release_threshold < arc.charge_threshold)
        {
            return Err(WreckVrError::validation(
                "locomotion.teleport_release_threshold",
                "must be below arc.charge_threshold",
            ));
        }
        if !(arc.max_reach > arc.min_reach) {
            return Err(WreckVrError::validation("arc.max_reach", "must exceed arc.min_reach"));
        }
        if !(arc.gravity < 0.0) {
            return Err(WreckVrError::validation("arc.gravity", "must be negative"));
        }
        if arc.sample_count < 2 {
            return Err(WreckVrError::validation("arc.sample_count", "needs at least 2 samples"));
        }
        if !(0.0..1.0).contains(&arc.fallback_min_fraction) {
            return Err(WreckVrError::validation("arc.fallback_min_fraction", "must be in [0, 1)"));
        }

        self.comfort.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comfort::LocomotionMode;

    #[test]
    fn test_defaults_are_valid() {
        assert!(VrConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = VrConfig::from_json_str(
            r#"{ "locomotion": { "base_speed": 4.0 }, "comfort": { "locomotion_mode": "teleport" } }"#,
        )
        .unwrap();

        assert_eq!(config.locomotion.base_speed, 4.0);
        assert_eq!(config.locomotion.deadzone, 0.15);
        assert_eq!(config.arc.max_reach, 30.0);
        assert_eq!(config.comfort.locomotion_mode(), LocomotionMode::Teleport);
    }

    #[test]
    fn test_vertical_speed_capped_by_base_speed() {
        let result = VrConfig::from_json_str(
            r#"{ "locomotion": { "base_speed": 1.5, "vertical_speed": 2.0 } }"#,
        );
        match result {
            Err(WreckVrError::Validation { item, .. }) => assert_eq!(item, "locomotion.vertical_speed"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(
            VrConfig::from_json_str(r#"{ "locomotion": { "base_speed": 1.0, "vertical_speed": 1.0 } }"#)
                .is_ok()
        );
    }

    #[test]
    fn test_release_threshold_must_sit_below_press() {
        let result = VrConfig::from_json_str(
            r#"{ "locomotion": { "teleport_release_threshold": 0.8 } }"#,
        );
        match result {
            Err(WreckVrError::Validation { item, .. }) => {
                assert_eq!(item, "locomotion.teleport_release_threshold")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            VrConfig::from_json_str("{ not json"),
            Err(WreckVrError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = VrConfig::load(Path::new("/definitely/not/here/wreckvr.json"));
        assert!(matches!(result, Err(WreckVrError::Io { .. })));
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let mut config = VrConfig::default();
        config.arc.sample_count = 64;
        let json = config.to_json_string().unwrap();
        assert_eq!(VrConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_handedness_other() {
        assert_eq!(Handedness::Left.other(), Handedness::Right);
        assert_eq!(Handedness::Right.other(), Handedness::Left);
    }
}
