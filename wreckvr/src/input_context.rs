use cgmath::{InnerSpace, Quaternion, Rotation, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::vr_config::Handedness;
use crate::xr_session::XrSessionState;

/// World-space position and orientation of a tracked device.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Pose { position, rotation }
    }

    /// Pointing direction (-Z in device space).
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(vec3(0.0, 0.0, -1.0)).normalize()
    }
}

/// One tracked controller. Axis values are raw, before deadzone filtering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerState {
    pub x_axis: f32,
    /// Pushing the stick forward reports negative values
    pub y_axis: f32,
    pub trigger_value: f32,
    pub grip_pressed: bool,
    /// Stick click / face button used for boost
    pub boost_pressed: bool,
    pub aim: Option<Pose>,
}

impl ControllerState {
    pub fn with_stick(x_axis: f32, y_axis: f32) -> Self {
        ControllerState {
            x_axis,
            y_axis,
            ..Default::default()
        }
    }

    pub fn stick_magnitude(&self) -> f32 {
        (self.x_axis * self.x_axis + self.y_axis * self.y_axis).sqrt()
    }
}

/// World-space joint positions of a tracked hand, in WebXR joint order
/// (see `gesture::joint_indices`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandJoints(pub Vec<Vector3<f32>>);

impl HandJoints {
    pub fn get(&self, index: usize) -> Option<Vector3<f32>> {
        self.0.get(index).copied()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandState {
    pub joints: Option<HandJoints>,
    pub aim: Option<Pose>,
}

impl HandState {
    pub fn is_tracked(&self) -> bool {
        self.joints.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputSource {
    Controller(ControllerState),
    Hand(HandState),
}

impl InputSource {
    pub fn aim(&self) -> Option<Pose> {
        match self {
            InputSource::Controller(controller) => controller.aim,
            InputSource::Hand(hand) => hand.aim,
        }
    }
}

/// Snapshot of all VR input for a single simulation tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    pub left: Option<InputSource>,
    pub right: Option<InputSource>,
    /// Headset orientation relative to the rig. `None` when the view
    /// orientation is unavailable.
    pub head_rotation: Option<Quaternion<f32>>,
    pub session: XrSessionState,
}

impl InputFrame {
    /// An empty frame from a visible immersive session with the head looking down -Z.
    pub fn visible() -> Self {
        InputFrame {
            head_rotation: Some(Quaternion::new(1.0, 0.0, 0.0, 0.0)),
            session: XrSessionState::Visible,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, hand: Handedness, source: InputSource) -> Self {
        match hand {
            Handedness::Left => self.left = Some(source),
            Handedness::Right => self.right = Some(source),
        }
        self
    }

    pub fn with_controller(self, hand: Handedness, controller: ControllerState) -> Self {
        self.with_source(hand, InputSource::Controller(controller))
    }

    pub fn with_hand(self, hand: Handedness, state: HandState) -> Self {
        self.with_source(hand, InputSource::Hand(state))
    }

    pub fn source(&self, hand: Handedness) -> Option<&InputSource> {
        match hand {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }

    pub fn controller(&self, hand: Handedness) -> Option<&ControllerState> {
        match self.source(hand) {
            Some(InputSource::Controller(controller)) => Some(controller),
            _ => None,
        }
    }

    pub fn hand(&self, hand: Handedness) -> Option<&HandState> {
        match self.source(hand) {
            Some(InputSource::Hand(state)) => Some(state),
            _ => None,
        }
    }

    /// Raw stick axes for `hand`; zero when that hand is not a controller.
    pub fn stick(&self, hand: Handedness) -> (f32, f32) {
        self.controller(hand)
            .map(|controller| (controller.x_axis, controller.y_axis))
            .unwrap_or((0.0, 0.0))
    }

    pub fn boost_pressed(&self) -> bool {
        [Handedness::Left, Handedness::Right]
            .into_iter()
            .filter_map(|hand| self.controller(hand))
            .any(|controller| controller.boost_pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_is_zero_for_hands() {
        let frame = InputFrame::visible()
            .with_hand(Handedness::Left, HandState::default())
            .with_controller(Handedness::Right, ControllerState::with_stick(0.5, -0.25));

        assert_eq!(frame.stick(Handedness::Left), (0.0, 0.0));
        assert_eq!(frame.stick(Handedness::Right), (0.5, -0.25));
        assert!(frame.hand(Handedness::Left).is_some());
        assert!(frame.controller(Handedness::Left).is_none());
    }

    #[test]
    fn test_boost_from_either_controller() {
        let boosted = ControllerState {
            boost_pressed: true,
            ..Default::default()
        };
        let frame = InputFrame::visible().with_controller(Handedness::Left, boosted);
        assert!(frame.boost_pressed());
        assert!(!InputFrame::visible().boost_pressed());
    }

    #[test]
    fn test_pose_forward_defaults_to_negative_z() {
        let pose = Pose::new(vec3(0.0, 1.0, 0.0), Quaternion::new(1.0, 0.0, 0.0, 0.0));
        let forward = pose.forward();
        assert!((forward - vec3(0.0, 0.0, -1.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_source_is_tagged_in_json() {
        let json = r#"{
            "session": "visible",
            "right": { "kind": "controller", "x_axis": 0.8 }
        }"#;
        let frame: InputFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.session, XrSessionState::Visible);
        assert_eq!(frame.stick(Handedness::Right), (0.8, 0.0));
        assert!(frame.left.is_none());
    }
}
