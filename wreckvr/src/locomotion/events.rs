use cgmath::Vector3;

use crate::teleport::TeleportVisual;
use crate::vr_config::Handedness;

use super::MovementUpdate;

/// Everything the controller reports to audio/UI collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum LocomotionEvent {
    MovementStart,
    MovementStop,
    /// Sent every processed tick, moving or not
    MovementUpdate(MovementUpdate),
    TeleportStart { hand: Handedness },
    /// The charge ended; `committed` is true when the rig was moved
    TeleportEnd { committed: bool },
    Teleported { from: Vector3<f32>, to: Vector3<f32> },
    ArcVisual(TeleportVisual),
    /// Signed yaw step of a snap turn, in radians
    SnapTurn { step: f32 },
}

/// Observer for controller events. Every method has an empty default so
/// implementors only override what they care about.
pub trait LocomotionListener {
    fn on_movement_start(&mut self) {}
    fn on_movement_stop(&mut self) {}
    fn on_movement_update(&mut self, _update: &MovementUpdate) {}
    fn on_teleport_start(&mut self, _hand: Handedness) {}
    fn on_teleport_end(&mut self, _committed: bool) {}
    fn on_teleported(&mut self, _from: Vector3<f32>, _to: Vector3<f32>) {}
    fn on_arc_visual(&mut self, _visual: &TeleportVisual) {}
    fn on_snap_turn(&mut self, _step: f32) {}
}

/// Registered listeners, called in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn LocomotionListener>>,
}

impl EventDispatcher {
    pub fn add(&mut self, listener: Box<dyn LocomotionListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, events: &[LocomotionEvent]) {
        for listener in self.listeners.iter_mut() {
            for event in events {
                match event {
                    LocomotionEvent::MovementStart => listener.on_movement_start(),
                    LocomotionEvent::MovementStop => listener.on_movement_stop(),
                    LocomotionEvent::MovementUpdate(update) => listener.on_movement_update(update),
                    LocomotionEvent::TeleportStart { hand } => listener.on_teleport_start(*hand),
                    LocomotionEvent::TeleportEnd { committed } => listener.on_teleport_end(*committed),
                    LocomotionEvent::Teleported { from, to } => listener.on_teleported(*from, *to),
                    LocomotionEvent::ArcVisual(visual) => listener.on_arc_visual(visual),
                    LocomotionEvent::SnapTurn { step } => listener.on_snap_turn(*step),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl LocomotionListener for Recorder {
        fn on_movement_start(&mut self) {
            self.log.borrow_mut().push("start".to_string());
        }

        fn on_teleported(&mut self, _from: Vector3<f32>, to: Vector3<f32>) {
            self.log.borrow_mut().push(format!("teleported {}", to.z));
        }
    }

    #[test]
    fn test_dispatch_calls_overridden_methods_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        dispatcher.add(Box::new(Recorder { log: log.clone() }));

        dispatcher.dispatch(&[
            LocomotionEvent::MovementStart,
            LocomotionEvent::MovementStop,
            LocomotionEvent::Teleported {
                from: vec3(0.0, 0.0, 0.0),
                to: vec3(0.0, 0.0, -4.0),
            },
        ]);

        assert_eq!(*log.borrow(), vec!["start".to_string(), "teleported -4".to_string()]);
        assert_eq!(dispatcher.len(), 1);
    }
}
