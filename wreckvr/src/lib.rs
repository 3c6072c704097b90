// VR locomotion core for the wreck viewer
//
// Drives the player rig from per-frame VR input: smooth movement with speed
// ramping and boost, ballistic-arc teleportation, comfort presets, and drift
// correction. Rendering and audio are left to the host; they consume the
// rig transform and the emitted `LocomotionEvent`s.

pub mod comfort;
pub mod error;
pub mod gesture;
pub mod input_context;
pub mod input_provider;
pub mod locomotion;
pub mod teleport;
pub mod vr_config;
pub mod xr_session;

pub use comfort::{ComfortChange, ComfortPreset, ComfortProfile, ComfortUpdate, LocomotionMode, TurningMode};
pub use error::WreckVrError;
pub use input_context::{ControllerState, HandState, InputFrame, InputSource, Pose};
pub use input_provider::{ScriptedInputProvider, VrInputProvider};
pub use locomotion::{
    LocomotionController, LocomotionEvent, LocomotionListener, LocomotionState, MotionState,
    MovementUpdate, RigTransform, RigWrite,
};
pub use teleport::{ArcSample, ArcSolution, Landing, TeleportArcSolver, TeleportSession};
pub use vr_config::{ArcConfig, Handedness, LocomotionConfig, VrConfig};
pub use xr_session::XrSessionState;
