use engine::comfort_log;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WreckVrError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocomotionMode {
    Smooth,
    Teleport,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurningMode {
    Smooth,
    Snap,
}

/// Persisted locomotion/turning policy.
///
/// Fields are only reachable through accessors; changes go through
/// [`ComfortProfile::set`] (validated merge) or [`ComfortProfile::replace`]
/// (preset swap), so an out-of-range value never lands in a live profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortProfile {
    pub(super) locomotion_mode: LocomotionMode,
    pub(super) turning_mode: TurningMode,
    pub(super) snap_turn_angle_degrees: f32,
    pub(super) reduced_motion: bool,
    pub(super) comfort_speed_multiplier: f32,
    pub(super) show_arc_visual: bool,
}

impl Default for ComfortProfile {
    fn default() -> Self {
        ComfortProfile {
            locomotion_mode: LocomotionMode::Smooth,
            turning_mode: TurningMode::Snap,
            snap_turn_angle_degrees: 45.0,
            reduced_motion: false,
            comfort_speed_multiplier: 1.0,
            show_arc_visual: true,
        }
    }
}

/// Partial update for a [`ComfortProfile`]; `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortUpdate {
    pub locomotion_mode: Option<LocomotionMode>,
    pub turning_mode: Option<TurningMode>,
    pub snap_turn_angle_degrees: Option<f32>,
    pub reduced_motion: Option<bool>,
    pub comfort_speed_multiplier: Option<f32>,
    pub show_arc_visual: Option<bool>,
}

impl ComfortUpdate {
    pub fn locomotion_mode(mut self, mode: LocomotionMode) -> Self {
        self.locomotion_mode = Some(mode);
        self
    }

    pub fn turning_mode(mut self, mode: TurningMode) -> Self {
        self.turning_mode = Some(mode);
        self
    }

    pub fn snap_turn_angle_degrees(mut self, degrees: f32) -> Self {
        self.snap_turn_angle_degrees = Some(degrees);
        self
    }

    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = Some(reduced);
        self
    }

    pub fn comfort_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.comfort_speed_multiplier = Some(multiplier);
        self
    }

    pub fn show_arc_visual(mut self, show: bool) -> Self {
        self.show_arc_visual = Some(show);
        self
    }
}

/// What a `set`/`replace` call actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComfortChange {
    /// Previous locomotion mode, if it changed
    pub previous_locomotion_mode: Option<LocomotionMode>,
    /// Previous turning mode, if it changed
    pub previous_turning_mode: Option<TurningMode>,
    pub tunables_changed: bool,
    pub rejected_fields: usize,
}

impl ComfortChange {
    pub fn changed(&self) -> bool {
        self.previous_locomotion_mode.is_some()
            || self.previous_turning_mode.is_some()
            || self.tunables_changed
    }

    pub fn left_locomotion_mode(&self, mode: LocomotionMode) -> bool {
        self.previous_locomotion_mode == Some(mode)
    }

    pub fn left_turning_mode(&self, mode: TurningMode) -> bool {
        self.previous_turning_mode == Some(mode)
    }
}

pub fn is_valid_snap_angle(degrees: f32) -> bool {
    degrees > 0.0 && degrees <= 90.0
}

pub fn is_valid_speed_multiplier(multiplier: f32) -> bool {
    multiplier > 0.0 && multiplier <= 2.0
}

impl ComfortProfile {
    pub fn new(
        locomotion_mode: LocomotionMode,
        turning_mode: TurningMode,
        snap_turn_angle_degrees: f32,
        reduced_motion: bool,
        comfort_speed_multiplier: f32,
        show_arc_visual: bool,
    ) -> Result<Self> {
        let profile = ComfortProfile {
            locomotion_mode,
            turning_mode,
            snap_turn_angle_degrees,
            reduced_motion,
            comfort_speed_multiplier,
            show_arc_visual,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn locomotion_mode(&self) -> LocomotionMode {
        self.locomotion_mode
    }

    pub fn turning_mode(&self) -> TurningMode {
        self.turning_mode
    }

    pub fn snap_turn_angle_degrees(&self) -> f32 {
        self.snap_turn_angle_degrees
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn comfort_speed_multiplier(&self) -> f32 {
        self.comfort_speed_multiplier
    }

    pub fn show_arc_visual(&self) -> bool {
        self.show_arc_visual
    }

    /// Merge `update` into the profile. Out-of-range numeric fields are
    /// ignored and keep their prior value.
    pub fn set(&mut self, update: ComfortUpdate) -> ComfortChange {
        let mut change = ComfortChange::default();

        if let Some(mode) = update.locomotion_mode {
            if mode != self.locomotion_mode {
                change.previous_locomotion_mode = Some(self.locomotion_mode);
                self.locomotion_mode = mode;
            }
        }

        if let Some(mode) = update.turning_mode {
            if mode != self.turning_mode {
                change.previous_turning_mode = Some(self.turning_mode);
                self.turning_mode = mode;
            }
        }

        if let Some(degrees) = update.snap_turn_angle_degrees {
            if !is_valid_snap_angle(degrees) {
                comfort_log!(WARN, "Ignoring snap turn angle {} outside (0, 90]", degrees);
                change.rejected_fields += 1;
            } else if degrees != self.snap_turn_angle_degrees {
                self.snap_turn_angle_degrees = degrees;
                change.tunables_changed = true;
            }
        }

        if let Some(multiplier) = update.comfort_speed_multiplier {
            if !is_valid_speed_multiplier(multiplier) {
                comfort_log!(WARN, "Ignoring speed multiplier {} outside (0, 2]", multiplier);
                change.rejected_fields += 1;
            } else if multiplier != self.comfort_speed_multiplier {
                self.comfort_speed_multiplier = multiplier;
                change.tunables_changed = true;
            }
        }

        if let Some(reduced) = update.reduced_motion {
            if reduced != self.reduced_motion {
                self.reduced_motion = reduced;
                change.tunables_changed = true;
            }
        }

        if let Some(show) = update.show_arc_visual {
            if show != self.show_arc_visual {
                self.show_arc_visual = show;
                change.tunables_changed = true;
            }
        }

        if change.changed() {
            comfort_log!(DEBUG, "Comfort profile updated: {:?}", self);
        }

        change
    }

    /// Swap in a whole profile (used by presets).
    pub fn replace(&mut self, profile: ComfortProfile) -> ComfortChange {
        let change = ComfortChange {
            previous_locomotion_mode: (profile.locomotion_mode != self.locomotion_mode)
                .then_some(self.locomotion_mode),
            previous_turning_mode: (profile.turning_mode != self.turning_mode)
                .then_some(self.turning_mode),
            tunables_changed: profile.snap_turn_angle_degrees != self.snap_turn_angle_degrees
                || profile.comfort_speed_multiplier != self.comfort_speed_multiplier
                || profile.reduced_motion != self.reduced_motion
                || profile.show_arc_visual != self.show_arc_visual,
            rejected_fields: 0,
        };
        *self = profile;
        change
    }

    /// Replace the profile with the named preset. Unknown names leave the
    /// profile as it was and return `false`.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        match super::ComfortPreset::from_name(name) {
            Some(preset) => {
                self.replace(preset.profile());
                true
            }
            None => {
                comfort_log!(WARN, "Unknown comfort preset '{}'", name);
                false
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_snap_angle(self.snap_turn_angle_degrees) {
            return Err(WreckVrError::validation(
                "snap_turn_angle_degrees",
                format!("{} is outside (0, 90]", self.snap_turn_angle_degrees),
            ));
        }
        if !is_valid_speed_multiplier(self.comfort_speed_multiplier) {
            return Err(WreckVrError::validation(
                "comfort_speed_multiplier",
                format!("{} is outside (0, 2]", self.comfort_speed_multiplier),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let profile: ComfortProfile =
            serde_json::from_str(json).map_err(|err| WreckVrError::parse("comfort profile", err))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| WreckVrError::parse("comfort profile", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_snap_angle_is_ignored() {
        let mut profile = ComfortProfile::default();
        let change = profile.set(ComfortUpdate::default().snap_turn_angle_degrees(500.0));

        assert!(!change.changed());
        assert_eq!(change.rejected_fields, 1);
        assert_eq!(profile.snap_turn_angle_degrees(), 45.0);

        let again = profile.set(ComfortUpdate::default().snap_turn_angle_degrees(500.0));
        assert!(!again.changed());
        assert_eq!(profile, ComfortProfile::default());
    }

    #[test]
    fn test_invalid_fields_do_not_block_valid_ones() {
        let mut profile = ComfortProfile::default();
        let change = profile.set(
            ComfortUpdate::default()
                .comfort_speed_multiplier(f32::NAN)
                .snap_turn_angle_degrees(0.0)
                .reduced_motion(true),
        );

        assert!(change.changed());
        assert_eq!(change.rejected_fields, 2);
        assert!(profile.reduced_motion());
        assert_eq!(profile.comfort_speed_multiplier(), 1.0);
    }

    #[test]
    fn test_boundaries() {
        let mut profile = ComfortProfile::default();
        assert!(profile.set(ComfortUpdate::default().snap_turn_angle_degrees(90.0)).changed());
        assert!(profile.set(ComfortUpdate::default().comfort_speed_multiplier(2.0)).changed());
        assert!(!profile.set(ComfortUpdate::default().comfort_speed_multiplier(0.0)).changed());
        assert!(!profile.set(ComfortUpdate::default().comfort_speed_multiplier(2.01)).changed());
        assert_eq!(profile.snap_turn_angle_degrees(), 90.0);
        assert_eq!(profile.comfort_speed_multiplier(), 2.0);
    }

    #[test]
    fn test_setting_same_value_is_no_change() {
        let mut profile = ComfortProfile::default();
        let change = profile.set(
            ComfortUpdate::default()
                .locomotion_mode(LocomotionMode::Smooth)
                .snap_turn_angle_degrees(45.0),
        );
        assert!(!change.changed());
    }

    #[test]
    fn test_mode_change_reports_previous_mode() {
        let mut profile = ComfortProfile::default();
        profile.set(ComfortUpdate::default().locomotion_mode(LocomotionMode::Teleport));
        let change = profile.set(
            ComfortUpdate::default()
                .locomotion_mode(LocomotionMode::Smooth)
                .turning_mode(TurningMode::Smooth),
        );

        assert!(change.left_locomotion_mode(LocomotionMode::Teleport));
        assert!(change.left_turning_mode(TurningMode::Snap));
    }

    #[test]
    fn test_apply_preset() {
        let mut profile = ComfortProfile::default();
        assert!(profile.apply_preset("comfort"));
        assert_eq!(profile.locomotion_mode(), LocomotionMode::Teleport);
        assert_eq!(profile.turning_mode(), TurningMode::Snap);
        assert!(profile.reduced_motion());

        let before = profile.clone();
        assert!(!profile.apply_preset("warp-speed"));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_new_validates() {
        assert!(ComfortProfile::new(LocomotionMode::Smooth, TurningMode::Snap, 30.0, false, 1.0, true).is_ok());
        assert!(ComfortProfile::new(LocomotionMode::Smooth, TurningMode::Snap, 120.0, false, 1.0, true).is_err());
    }

    #[test]
    fn test_json_rejects_out_of_range_values() {
        let result = ComfortProfile::from_json_str(r#"{ "comfort_speed_multiplier": 3.5 }"#);
        assert!(matches!(result, Err(WreckVrError::Validation { .. })));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut profile = ComfortProfile::default();
        profile.apply_preset("free");
        let json = profile.to_json_string().unwrap();
        assert_eq!(ComfortProfile::from_json_str(&json).unwrap(), profile);
    }

    #[test]
    fn test_update_deserializes_from_partial_json() {
        let update: ComfortUpdate =
            serde_json::from_str(r#"{ "turning_mode": "smooth" }"#).unwrap();
        assert_eq!(update.turning_mode, Some(TurningMode::Smooth));
        assert_eq!(update.locomotion_mode, None);
    }
}
