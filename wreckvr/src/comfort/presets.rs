use std::fmt;
use std::str::FromStr;

use crate::error::WreckVrError;

use super::{ComfortProfile, LocomotionMode, TurningMode};

/// Bumped whenever a preset is added, removed or retuned so persisted
/// selections can be migrated.
pub const PRESET_SET_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComfortPreset {
    /// Teleport + snap turning + reduced motion, for players prone to motion sickness
    Comfort,
    /// Smooth movement with snap turning
    Balanced,
    /// Smooth movement and smooth turning at full speed
    Free,
}

impl ComfortPreset {
    pub const ALL: [ComfortPreset; 3] = [
        ComfortPreset::Comfort,
        ComfortPreset::Balanced,
        ComfortPreset::Free,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ComfortPreset::Comfort => "comfort",
            ComfortPreset::Balanced => "balanced",
            ComfortPreset::Free => "free",
        }
    }

    pub fn from_name(name: &str) -> Option<ComfortPreset> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }

    pub fn profile(self) -> ComfortProfile {
        match self {
            ComfortPreset::Comfort => ComfortProfile {
                locomotion_mode: LocomotionMode::Teleport,
                turning_mode: TurningMode::Snap,
                snap_turn_angle_degrees: 30.0,
                reduced_motion: true,
                comfort_speed_multiplier: 0.75,
                show_arc_visual: true,
            },
            ComfortPreset::Balanced => ComfortProfile {
                locomotion_mode: LocomotionMode::Smooth,
                turning_mode: TurningMode::Snap,
                snap_turn_angle_degrees: 45.0,
                reduced_motion: false,
                comfort_speed_multiplier: 1.0,
                show_arc_visual: true,
            },
            ComfortPreset::Free => ComfortProfile {
                locomotion_mode: LocomotionMode::Smooth,
                turning_mode: TurningMode::Smooth,
                snap_turn_angle_degrees: 45.0,
                reduced_motion: false,
                comfort_speed_multiplier: 1.0,
                show_arc_visual: true,
            },
        }
    }
}

impl fmt::Display for ComfortPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComfortPreset {
    type Err = WreckVrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            WreckVrError::validation("comfort preset", format!("unknown preset '{}'", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for preset in ComfortPreset::ALL {
            assert_eq!(preset.name().parse::<ComfortPreset>().unwrap(), preset);
            assert_eq!(preset.to_string(), preset.name());
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(ComfortPreset::from_name("Comfort"), None);
        assert!("".parse::<ComfortPreset>().is_err());
    }

    #[test]
    fn test_every_preset_is_valid() {
        for preset in ComfortPreset::ALL {
            assert!(preset.profile().validate().is_ok(), "{} invalid", preset);
        }
    }

    #[test]
    fn test_comfort_and_free_policies() {
        let comfort = ComfortPreset::Comfort.profile();
        assert_eq!(comfort.locomotion_mode(), LocomotionMode::Teleport);
        assert_eq!(comfort.turning_mode(), TurningMode::Snap);
        assert!(comfort.reduced_motion());

        let free = ComfortPreset::Free.profile();
        assert_eq!(free.locomotion_mode(), LocomotionMode::Smooth);
        assert_eq!(free.turning_mode(), TurningMode::Smooth);
        assert_eq!(free.comfort_speed_multiplier(), 1.0);
    }
}
