// Per-frame locomotion: the controller state machine plus the small pieces
// it is built from (stick filtering, speed ramps, turning, drift correction).

pub mod controller;
pub mod drift;
pub mod events;
pub mod input_fusion;
pub mod motion_state;
pub mod rig;
pub mod turning;

pub use controller::{LocomotionController, LocomotionState};
pub use drift::{correct_drift, wrap_yaw};
pub use events::{EventDispatcher, LocomotionEvent, LocomotionListener};
pub use input_fusion::{CameraBasis, FilteredSticks, apply_deadzone};
pub use motion_state::{MotionState, MovementUpdate, ramp_toward};
pub use rig::{RigTransform, RigWrite};
pub use turning::{SnapTurnState, smooth_turn_delta};
