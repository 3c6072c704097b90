use cgmath::{Rotation, Vector3, vec3};
use engine::{FrameClock, comfort_log, locomotion_log, teleport_log};

use crate::comfort::{ComfortChange, ComfortPreset, ComfortProfile, ComfortUpdate, LocomotionMode, TurningMode};
use crate::gesture::{HandGesture, joint_indices};
use crate::input_context::{InputFrame, InputSource};
use crate::input_provider::VrInputProvider;
use crate::teleport::{TeleportArcSolver, TeleportSession};
use crate::vr_config::{Handedness, LocomotionConfig, VrConfig};
use crate::xr_session::XrSessionState;

use super::{
    CameraBasis, EventDispatcher, FilteredSticks, LocomotionEvent, LocomotionListener, MotionState,
    RigTransform, RigWrite, SnapTurnState, correct_drift, smooth_turn_delta, wrap_yaw,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocomotionState {
    #[default]
    Idle,
    Moving,
    Charging,
}

#[derive(Clone, Copy, Debug, Default)]
struct Gestures {
    left: HandGesture,
    right: HandGesture,
}

impl Gestures {
    fn detect(frame: &InputFrame, config: &LocomotionConfig) -> Self {
        let detect = |hand: Handedness| {
            frame
                .hand(hand)
                .map(|state| HandGesture::detect(state, config))
                .unwrap_or_default()
        };
        Gestures {
            left: detect(Handedness::Left),
            right: detect(Handedness::Right),
        }
    }

    fn get(&self, hand: Handedness) -> &HandGesture {
        match hand {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    fn pinching_hand(&self) -> Option<Handedness> {
        [Handedness::Right, Handedness::Left]
            .into_iter()
            .find(|&hand| self.get(hand).pinching)
    }

    fn any_fist(&self) -> bool {
        self.left.fist || self.right.fist
    }
}

/// Drives the player rig from per-frame input.
///
/// The controller is the only owner of the rig: every write, including a
/// teleport commit, goes through `apply_rig_transform`. Movement integrates
/// on an unrounded rig; `rig()` exposes its drift-corrected copy, so rounding
/// never accumulates across ticks. Events raised between ticks (comfort
/// changes, session changes) are queued and returned by the next `update`.
pub struct LocomotionController {
    config: LocomotionConfig,
    comfort: ComfortProfile,
    rig: Option<RigTransform>,
    corrected_rig: Option<RigTransform>,
    state: LocomotionState,
    motion: MotionState,
    snap_turn: SnapTurnState,
    teleport: TeleportSession,
    session: XrSessionState,
    clock: FrameClock,
    pending: Vec<LocomotionEvent>,
    listeners: EventDispatcher,
}

impl LocomotionController {
    pub fn new(config: &VrConfig) -> Self {
        LocomotionController {
            config: config.locomotion.clone(),
            comfort: config.comfort.clone(),
            rig: None,
            corrected_rig: None,
            state: LocomotionState::Idle,
            motion: MotionState::default(),
            snap_turn: SnapTurnState::default(),
            teleport: TeleportSession::new(TeleportArcSolver::new(config.arc.clone()), &config.locomotion),
            session: XrSessionState::default(),
            clock: FrameClock::new(),
            pending: Vec::new(),
            listeners: EventDispatcher::default(),
        }
    }

    pub fn with_rig(mut self, rig: RigTransform) -> Self {
        self.attach_rig(rig);
        self
    }

    pub fn attach_rig(&mut self, rig: RigTransform) {
        self.rig = Some(rig);
        self.corrected_rig = Some(correct_drift(rig));
    }

    /// Release the rig; later ticks keep running without writing it.
    pub fn detach_rig(&mut self) -> Option<RigTransform> {
        self.rig = None;
        self.corrected_rig.take()
    }

    /// Drift-corrected rig: millimetre position, yaw in `(-π, π]`.
    pub fn rig(&self) -> Option<&RigTransform> {
        self.corrected_rig.as_ref()
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn comfort(&self) -> &ComfortProfile {
        &self.comfort
    }

    pub fn teleport(&self) -> &TeleportSession {
        &self.teleport
    }

    pub fn session(&self) -> XrSessionState {
        self.session
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn add_listener(&mut self, listener: Box<dyn LocomotionListener>) {
        self.listeners.add(listener);
    }

    pub fn set_comfort(&mut self, update: ComfortUpdate) -> ComfortChange {
        let change = self.comfort.set(update);
        self.on_comfort_changed(change);
        change
    }

    pub fn replace_comfort(&mut self, profile: ComfortProfile) -> ComfortChange {
        let change = self.comfort.replace(profile);
        self.on_comfort_changed(change);
        change
    }

    /// Swap in a named preset. Unknown names keep the current profile.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(preset) = ComfortPreset::from_name(name) else {
            comfort_log!(WARN, "Unknown comfort preset '{}'", name);
            return false;
        };
        comfort_log!(INFO, "Applying comfort preset '{}'", preset);
        self.replace_comfort(preset.profile());
        true
    }

    /// Mirror the XR session visibility. Leaving the visible state cancels
    /// any charge and stops movement.
    pub fn handle_session_change(&mut self, state: XrSessionState) {
        if state == self.session {
            return;
        }
        locomotion_log!(DEBUG, "XR session {:?} -> {:?}", self.session, state);
        self.session = state;

        if !state.allows_movement() {
            self.cancel_charge();
            self.stop_movement();
        }
    }

    /// Poll `provider` once and run a tick with the frame.
    pub fn tick<P: VrInputProvider + ?Sized>(&mut self, delta_time: f32, provider: &mut P) -> Vec<LocomotionEvent> {
        let frame = provider.poll();
        self.update(delta_time, &frame)
    }

    pub fn update(&mut self, delta_time: f32, frame: &InputFrame) -> Vec<LocomotionEvent> {
        let delta_time = self.clock.advance(delta_time);
        self.handle_session_change(frame.session);

        if self.session.allows_movement() {
            let sticks = FilteredSticks::from_frame(frame, self.config.deadzone);
            let gestures = Gestures::detect(frame, &self.config);

            match self.comfort.locomotion_mode() {
                LocomotionMode::Teleport => self.update_teleport(delta_time, frame, &gestures),
                LocomotionMode::Smooth => self.update_continuous(delta_time, frame, &sticks, &gestures),
            }

            // While charging the right stick aims the arc.
            if self.state != LocomotionState::Charging {
                self.update_turning(delta_time, &sticks);
            }

            self.pending
                .push(LocomotionEvent::MovementUpdate(self.motion.snapshot()));
        }

        if let Some(rig) = self.rig {
            self.apply_rig_transform(RigWrite::Replace(RigTransform::new(rig.position, wrap_yaw(rig.yaw))));
        }
        self.corrected_rig = self.rig.map(correct_drift);

        let events = std::mem::take(&mut self.pending);
        self.listeners.dispatch(&events);
        events
    }

    fn update_teleport(&mut self, delta_time: f32, frame: &InputFrame, gestures: &Gestures) {
        if self.motion.is_moving {
            self.stop_movement();
        }

        if !self.teleport.is_active() {
            if let Some((hand, magnitude)) = self.charge_request(frame, gestures) {
                let rig_height = self.rig.map(|rig| rig.position.y).unwrap_or(0.0);
                if self.teleport.start(hand, rig_height, magnitude) {
                    self.state = LocomotionState::Charging;
                    self.pending.push(LocomotionEvent::TeleportStart { hand });
                }
            }
        }

        let Some(hand) = self.teleport.charge().map(|charge| charge.origin_controller) else {
            return;
        };

        let held_magnitude = match frame.source(hand) {
            Some(InputSource::Controller(controller)) => {
                let magnitude = controller.stick_magnitude();
                (magnitude >= self.config.teleport_release_threshold).then_some(magnitude)
            }
            Some(InputSource::Hand(_)) => gestures
                .get(hand)
                .pinching
                .then_some(self.config.hand_charge_magnitude),
            None => None,
        };

        let Some(magnitude) = held_magnitude else {
            self.finish_charge();
            return;
        };

        let (origin, aim) = self.aim_ray(hand, frame, gestures);
        let (_, off_hand_y) = frame.stick(hand.other());
        let show_arc = self.comfort.show_arc_visual();
        if let Some(visual) = self
            .teleport
            .update(delta_time, off_hand_y, magnitude, origin, aim, show_arc)
        {
            self.pending.push(LocomotionEvent::ArcVisual(visual));
        }
    }

    /// A pinch, or the right stick pushed forward past the press threshold.
    /// Sideways deflections are left to turning.
    fn charge_request(&self, frame: &InputFrame, gestures: &Gestures) -> Option<(Handedness, f32)> {
        if let Some(hand) = gestures.pinching_hand() {
            return Some((hand, self.config.hand_charge_magnitude));
        }

        let controller = frame.controller(Handedness::Right)?;
        let magnitude = controller.stick_magnitude();
        let pushed_forward = -controller.y_axis >= controller.x_axis.abs();
        let threshold = self.teleport.solver().config().charge_threshold;
        (pushed_forward && magnitude > threshold).then_some((Handedness::Right, magnitude))
    }

    /// Arc origin and direction: the aim pose when tracked, the wrist and
    /// hand direction for a tracked hand, otherwise the eye point and view.
    fn aim_ray(&self, hand: Handedness, frame: &InputFrame, gestures: &Gestures) -> (Vector3<f32>, Vector3<f32>) {
        if let Some(pose) = frame.source(hand).and_then(InputSource::aim) {
            return (pose.position, pose.forward());
        }

        let wrist = frame
            .hand(hand)
            .and_then(|state| state.joints.as_ref())
            .and_then(|joints| joints.get(joint_indices::WRIST));
        if let (Some(wrist), Some(forward)) = (wrist, gestures.get(hand).forward) {
            return (wrist, forward);
        }

        let rig = self.rig.unwrap_or_default();
        let origin = rig.position + vec3(0.0, self.config.default_eye_height, 0.0);
        let forward = match frame.head_rotation {
            Some(head) => CameraBasis::new(&rig, head).forward,
            None => rig.rotation().rotate_vector(vec3(0.0, 0.0, -1.0)),
        };
        (origin, forward)
    }

    fn finish_charge(&mut self) {
        let committed = match self.teleport.commit_or_cancel() {
            Some(target) => self.teleport_rig(target),
            None => false,
        };
        self.state = LocomotionState::Idle;
        self.pending.push(LocomotionEvent::TeleportEnd { committed });
    }

    fn teleport_rig(&mut self, target: Vector3<f32>) -> bool {
        let Some(from) = self.corrected_rig.map(|rig| rig.position) else {
            teleport_log!(DEBUG, "No rig attached, dropping teleport");
            return false;
        };
        if !self.apply_rig_transform(RigWrite::Place(target)) {
            return false;
        }
        self.pending.push(LocomotionEvent::Teleported { from, to: target });
        true
    }

    fn cancel_charge(&mut self) {
        if self.teleport.cancel() {
            self.state = LocomotionState::Idle;
            self.pending.push(LocomotionEvent::TeleportEnd { committed: false });
        }
    }

    fn update_continuous(
        &mut self,
        delta_time: f32,
        frame: &InputFrame,
        sticks: &FilteredSticks,
        gestures: &Gestures,
    ) {
        let boost_allowed = !self.comfort.reduced_motion();

        if let Some(hand) = gestures.pinching_hand() {
            self.move_with_hand(delta_time, hand, gestures, boost_allowed);
            return;
        }

        // Without a view orientation there is no forward; only flying remains.
        let horizontal = frame
            .head_rotation
            .filter(|_| sticks.has_horizontal_movement());
        let vertical = sticks.right_y != 0.0;
        let moving = horizontal.is_some() || vertical;
        let boosted = moving && boost_allowed && (frame.boost_pressed() || gestures.any_fist());

        let boost = if boosted { self.config.boost_multiplier } else { 1.0 };
        let target_speed = if moving {
            self.config.base_speed * boost * self.comfort.comfort_speed_multiplier()
        } else {
            0.0
        };

        self.set_moving(moving);
        self.motion.step(
            target_speed,
            boosted,
            self.config.speed_ramp_rate,
            self.config.boost_ramp_rate,
            delta_time,
        );

        if let Some(head) = horizontal {
            let basis = CameraBasis::new(&self.rig.unwrap_or_default(), head);
            let direction = basis.movement_direction(sticks.left_x, sticks.left_y);
            self.apply_rig_transform(RigWrite::Translate(direction * self.motion.current_speed * delta_time));
        }

        if vertical {
            let lift = -sticks.right_y
                * self.config.vertical_speed
                * self.comfort.comfort_speed_multiplier()
                * delta_time;
            self.apply_rig_transform(RigWrite::Translate(vec3(0.0, lift, 0.0)));
        }
    }

    /// Pinch movement along the pinching hand, boosted by a fist on the other hand.
    fn move_with_hand(&mut self, delta_time: f32, hand: Handedness, gestures: &Gestures, boost_allowed: bool) {
        let boosted = boost_allowed && gestures.get(hand.other()).fist;
        let boost = if boosted { self.config.boost_multiplier } else { 1.0 };
        let speed = self.config.base_speed * boost;

        self.set_moving(true);
        self.motion.step(
            speed,
            boosted,
            self.config.speed_ramp_rate,
            self.config.boost_ramp_rate,
            delta_time,
        );
        // Hand movement is not ramped.
        self.motion.current_speed = speed;

        if let Some(forward) = gestures.get(hand).forward {
            self.apply_rig_transform(RigWrite::Translate(forward * speed * delta_time));
        }
    }

    fn set_moving(&mut self, moving: bool) {
        if moving == self.motion.is_moving {
            return;
        }
        self.motion.is_moving = moving;

        if moving {
            locomotion_log!(DEBUG, "Movement started");
            self.state = LocomotionState::Moving;
            self.pending.push(LocomotionEvent::MovementStart);
        } else {
            locomotion_log!(DEBUG, "Movement stopped");
            if self.state == LocomotionState::Moving {
                self.state = LocomotionState::Idle;
            }
            self.pending.push(LocomotionEvent::MovementStop);
        }
    }

    fn stop_movement(&mut self) {
        self.set_moving(false);
        self.motion.halt();
    }

    fn update_turning(&mut self, delta_time: f32, sticks: &FilteredSticks) {
        match self.comfort.turning_mode() {
            TurningMode::Smooth => {
                let delta = smooth_turn_delta(sticks.right_x, self.config.smooth_turn_speed, delta_time);
                if delta != 0.0 {
                    self.apply_rig_transform(RigWrite::Rotate(delta));
                }
            }
            TurningMode::Snap => {
                let step = self.snap_turn.update(
                    &self.clock,
                    sticks.right_x,
                    self.config.snap_turn_threshold,
                    self.config.snap_turn_cooldown,
                    self.comfort.snap_turn_angle_degrees(),
                );
                if let Some(step) = step {
                    locomotion_log!(DEBUG, "Snap turn {:.1} degrees", step.to_degrees());
                    self.apply_rig_transform(RigWrite::Rotate(step));
                    self.pending.push(LocomotionEvent::SnapTurn { step });
                }
            }
        }
    }

    fn on_comfort_changed(&mut self, change: ComfortChange) {
        if change.left_locomotion_mode(LocomotionMode::Teleport) {
            self.cancel_charge();
        }
        if change.left_locomotion_mode(LocomotionMode::Smooth) {
            self.stop_movement();
        }
        if change.left_turning_mode(TurningMode::Snap) {
            self.snap_turn.reset();
        }
    }

    /// The single place the rig is mutated. A missing rig turns every write
    /// into a no-op.
    fn apply_rig_transform(&mut self, write: RigWrite) -> bool {
        match self.rig.as_mut() {
            Some(rig) => write.apply(rig),
            None => false,
        }
    }
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::new(&VrConfig::default())
    }
}
