//! Pointer drag to rotation.
//!
//! A drag is anchored on a subject: the rotation at pointer-down expressed in
//! pointer units, `(longitude / sensitivity, -latitude / sensitivity)`. Every
//! move places the subject at its anchor plus the cumulative pointer
//! displacement and converts back, so the rotation is absolute with respect
//! to the drag start rather than accumulated from per-event deltas.

use foundation::math::{Vec2, fmod_turn_deg};

use crate::config::LatitudePolicy;
use crate::rotation::RotationState;

/// Primary mouse button (`MouseEvent.button`).
pub const PRIMARY_BUTTON: i16 = 0;

/// Whether a pointer-down starts a drag: primary button without Ctrl.
pub fn starts_drag(button: i16, ctrl_key: bool) -> bool {
    button == PRIMARY_BUTTON && !ctrl_key
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct DragSession {
    origin: RotationState,
    pointer_start: Vec2,
}

impl DragSession {
    fn subject(&self, sensitivity: f64) -> Vec2 {
        Vec2::new(
            self.origin.longitude / sensitivity,
            -self.origin.latitude / sensitivity,
        )
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone)]
pub struct DragController {
    sensitivity: f64,
    latitude: LatitudePolicy,
    state: DragState,
}

impl DragController {
    pub fn new(sensitivity: f64, latitude: LatitudePolicy) -> Self {
        Self {
            sensitivity,
            latitude,
            state: DragState::Idle,
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    pub fn set_latitude_policy(&mut self, latitude: LatitudePolicy) {
        self.latitude = latitude;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Idle -> Dragging. A second pointer-down restarts the session.
    pub fn begin(&mut self, pointer: Vec2, current: RotationState) {
        self.state = DragState::Dragging(DragSession {
            origin: current,
            pointer_start: pointer,
        });
    }

    /// Rotation for the pointer at `pointer`, or `None` when idle.
    pub fn update(&self, pointer: Vec2) -> Option<RotationState> {
        let DragState::Dragging(session) = self.state else {
            return None;
        };
        let k = self.sensitivity;
        let p = session.subject(k) + (pointer - session.pointer_start);
        Some(RotationState::new(
            fmod_turn_deg(p.x * k),
            self.latitude.apply(-p.y * k),
            session.origin.roll,
        ))
    }

    /// Dragging -> Idle. Returns whether a drag was active.
    pub fn end(&mut self) -> bool {
        let was = self.is_dragging();
        self.state = DragState::Idle;
        was
    }
}
