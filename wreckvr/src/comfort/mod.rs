// Comfort policy: which locomotion and turning style the player uses, plus
// the named presets offered in the settings UI.

pub mod presets;
pub mod profile;

pub use presets::{ComfortPreset, PRESET_SET_VERSION};
pub use profile::{ComfortChange, ComfortProfile, ComfortUpdate, LocomotionMode, TurningMode};
