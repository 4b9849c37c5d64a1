//! Recording camera sink
//!
//! [`CameraEventLog`] records every notification it receives. Clones share the
//! same buffer, so one handle can be boxed into the controller while another is
//! kept for inspection (debug overlays, replays, tests).

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::sink::{CameraSink, MovementNotification};

/// One recorded notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    StateEntered(MovementNotification),
    MovementInput { move_axis: Vec2, is_sprinting: bool },
    Landed { impact_speed: f32 },
}

/// Shared, append-only log of camera notifications.
#[derive(Debug, Clone, Default)]
pub struct CameraEventLog {
    events: Rc<RefCell<Vec<CameraEvent>>>,
    record_input: bool,
}

impl CameraEventLog {
    /// Log state and landing events only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log the per-tick input notification.
    pub fn with_input_events() -> Self {
        Self {
            record_input: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<CameraEvent> {
        self.events.borrow().clone()
    }

    /// Names of entered states, in order.
    pub fn entered_states(&self) -> Vec<&'static str> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CameraEvent::StateEntered(n) => Some(n.state),
                _ => None,
            })
            .collect()
    }

    /// Impact speeds of every recorded landing.
    pub fn landings(&self) -> Vec<f32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CameraEvent::Landed { impact_speed } => Some(*impact_speed),
                _ => None,
            })
            .collect()
    }

    pub fn last_state(&self) -> Option<MovementNotification> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            CameraEvent::StateEntered(n) => Some(*n),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl CameraSink for CameraEventLog {
    fn on_state_entered(&mut self, notification: MovementNotification) {
        self.events
            .borrow_mut()
            .push(CameraEvent::StateEntered(notification));
    }

    fn on_movement_input(&mut self, move_axis: Vec2, is_sprinting: bool) {
        if self.record_input {
            self.events.borrow_mut().push(CameraEvent::MovementInput {
                move_axis,
                is_sprinting,
            });
        }
    }

    fn on_landed(&mut self, impact_speed: f32) {
        self.events
            .borrow_mut()
            .push(CameraEvent::Landed { impact_speed });
    }
}
