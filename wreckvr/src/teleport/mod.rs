// Ballistic-arc teleportation
//
// The solver is a pure function of aim, charge and floor height. The session
// wraps it with the per-gesture state (charge, floor override) and hands a
// single rig target back on commit; the UI module turns each solution into
// line and marker data for the host renderer.

pub mod arc_renderer;
pub mod teleport_session;
pub mod teleport_ui;
pub mod trajectory;

pub use arc_renderer::{ArcLines, ArcRenderConfig, ArcRenderer};
pub use teleport_session::{TeleportCharge, TeleportSession};
pub use teleport_ui::{FloorLevel, TeleportMarker, TeleportUI, TeleportVisual, TeleportVisualStyle};
pub use trajectory::{ArcSample, ArcSolution, Landing, TeleportArcSolver, horizontal_distance};
