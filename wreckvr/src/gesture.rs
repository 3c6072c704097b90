use cgmath::{InnerSpace, Vector3};

use crate::input_context::{HandJoints, HandState};
use crate::vr_config::LocomotionConfig;

/// Joint indices for tracked hands - WebXR `XRHand` ordering
pub mod joint_indices {
    pub const WRIST: usize = 0;

    // Thumb (1-4)
    pub const THUMB_METACARPAL: usize = 1;
    pub const THUMB_PROXIMAL: usize = 2;
    pub const THUMB_DISTAL: usize = 3;
    pub const THUMB_TIP: usize = 4;

    // Index finger (5-9)
    pub const INDEX_METACARPAL: usize = 5;
    pub const INDEX_PROXIMAL: usize = 6;
    pub const INDEX_INTERMEDIATE: usize = 7;
    pub const INDEX_DISTAL: usize = 8;
    pub const INDEX_TIP: usize = 9;

    // Middle finger (10-14)
    pub const MIDDLE_METACARPAL: usize = 10;
    pub const MIDDLE_PROXIMAL: usize = 11;
    pub const MIDDLE_INTERMEDIATE: usize = 12;
    pub const MIDDLE_DISTAL: usize = 13;
    pub const MIDDLE_TIP: usize = 14;

    // Ring finger (15-19)
    pub const RING_METACARPAL: usize = 15;
    pub const RING_PROXIMAL: usize = 16;
    pub const RING_INTERMEDIATE: usize = 17;
    pub const RING_DISTAL: usize = 18;
    pub const RING_TIP: usize = 19;

    // Pinky finger (20-24)
    pub const PINKY_METACARPAL: usize = 20;
    pub const PINKY_PROXIMAL: usize = 21;
    pub const PINKY_INTERMEDIATE: usize = 22;
    pub const PINKY_DISTAL: usize = 23;
    pub const PINKY_TIP: usize = 24;

    pub const JOINT_COUNT: usize = 25;

    pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// Gestures recognised on a single hand for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandGesture {
    pub pinching: bool,
    pub fist: bool,
    /// Direction the hand is pointing, when it can be derived
    pub forward: Option<Vector3<f32>>,
}

impl HandGesture {
    pub fn detect(hand: &HandState, config: &LocomotionConfig) -> HandGesture {
        let Some(joints) = hand.joints.as_ref() else {
            return HandGesture::default();
        };

        let fist = is_fist(joints, config.fist_distance);
        // A closed fist can bring the thumb onto the index tip; it is not a pinch.
        let pinching = !fist && is_pinch(joints, config.pinch_distance);
        let forward = hand_forward(joints).or_else(|| hand.aim.map(|aim| aim.forward()));

        HandGesture {
            pinching,
            fist,
            forward,
        }
    }
}

fn distance(joints: &HandJoints, a: usize, b: usize) -> Option<f32> {
    Some((joints.get(a)? - joints.get(b)?).magnitude())
}

fn is_pinch(joints: &HandJoints, pinch_distance: f32) -> bool {
    distance(joints, joint_indices::THUMB_TIP, joint_indices::INDEX_TIP)
        .is_some_and(|d| d < pinch_distance)
}

fn is_fist(joints: &HandJoints, fist_distance: f32) -> bool {
    joint_indices::FINGER_TIPS.iter().all(|&tip| {
        distance(joints, tip, joint_indices::WRIST).is_some_and(|d| d < fist_distance)
    })
}

/// Wrist towards the middle finger metacarpal.
fn hand_forward(joints: &HandJoints) -> Option<Vector3<f32>> {
    let wrist = joints.get(joint_indices::WRIST)?;
    let knuckle = joints.get(joint_indices::MIDDLE_METACARPAL)?;
    let direction = knuckle - wrist;
    if direction.magnitude2() < 1e-8 {
        return None;
    }
    Some(direction.normalize())
}

#[cfg(test)]
pub(crate) mod test_hands {
    use super::joint_indices::*;
    use crate::input_context::{HandJoints, HandState};
    use cgmath::{Vector3, vec3};

    /// An open hand at `wrist` pointing down -Z with fingers spread.
    pub fn open_hand(wrist: Vector3<f32>) -> HandState {
        let mut joints = vec![wrist; JOINT_COUNT];
        for (finger, tip) in [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP].into_iter().enumerate() {
            let x = -0.03 + finger as f32 * 0.02;
            for joint in (tip - 4)..=tip {
                let along = (joint + 5 - tip) as f32 * 0.04;
                joints[joint] = wrist + vec3(x, 0.0, -along);
            }
        }
        joints[THUMB_METACARPAL] = wrist + vec3(-0.04, 0.0, -0.03);
        joints[THUMB_PROXIMAL] = wrist + vec3(-0.06, 0.0, -0.05);
        joints[THUMB_DISTAL] = wrist + vec3(-0.07, 0.0, -0.07);
        joints[THUMB_TIP] = wrist + vec3(-0.08, 0.0, -0.09);
        HandState {
            joints: Some(HandJoints(joints)),
            aim: None,
        }
    }

    pub fn pinching_hand(wrist: Vector3<f32>) -> HandState {
        let mut hand = open_hand(wrist);
        if let Some(joints) = hand.joints.as_mut() {
            joints.0[THUMB_TIP] = joints.0[INDEX_TIP] + vec3(0.01, 0.0, 0.0);
        }
        hand
    }

    pub fn fist_hand(wrist: Vector3<f32>) -> HandState {
        let mut hand = open_hand(wrist);
        if let Some(joints) = hand.joints.as_mut() {
            for tip in FINGER_TIPS {
                joints.0[tip] = wrist + vec3(0.0, -0.02, -0.05);
            }
        }
        hand
    }
}

#[cfg(test)]
mod tests {
    use super::test_hands::*;
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_open_hand_has_no_gesture() {
        let gesture = HandGesture::detect(&open_hand(vec3(0.0, 1.0, 0.0)), &LocomotionConfig::default());
        assert!(!gesture.pinching);
        assert!(!gesture.fist);
    }

    #[test]
    fn test_pinch_detected() {
        let gesture =
            HandGesture::detect(&pinching_hand(vec3(0.0, 1.0, 0.0)), &LocomotionConfig::default());
        assert!(gesture.pinching);
        assert!(!gesture.fist);
    }

    #[test]
    fn test_fist_is_not_a_pinch() {
        let mut hand = fist_hand(vec3(0.0, 1.0, 0.0));
        if let Some(joints) = hand.joints.as_mut() {
            joints.0[joint_indices::THUMB_TIP] = joints.0[joint_indices::INDEX_TIP];
        }
        let gesture = HandGesture::detect(&hand, &LocomotionConfig::default());
        assert!(gesture.fist);
        assert!(!gesture.pinching);
    }

    #[test]
    fn test_forward_points_along_fingers() {
        let gesture = HandGesture::detect(&open_hand(vec3(2.0, 1.0, 2.0)), &LocomotionConfig::default());
        let forward = gesture.forward.unwrap();
        assert!(forward.z < -0.9);
    }

    #[test]
    fn test_untracked_hand() {
        let gesture = HandGesture::detect(&HandState::default(), &LocomotionConfig::default());
        assert_eq!(gesture, HandGesture::default());
    }

    #[test]
    fn test_missing_joints_never_panic() {
        let hand = HandState {
            joints: Some(HandJoints(vec![vec3(0.0, 0.0, 0.0); 3])),
            aim: None,
        };
        let gesture = HandGesture::detect(&hand, &LocomotionConfig::default());
        assert!(!gesture.pinching);
        assert!(!gesture.fist);
        assert!(gesture.forward.is_none());
    }
}
