//! Drag state machine: press/move/release over the wheel.

use crate::color::{Hsv, Rgb};
use crate::geometry::WheelGeometry;
use kurbo::Vec2;

/// Live state of one press-to-release interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Latest pointer offset from the wheel center.
    pub offset: Vec2,
    /// Color derived from that offset.
    pub hsv: Hsv,
    pub color: Rgb,
}

/// Whether a drag is in progress.
#[derive(Debug, Clone, Copy, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// State machine over pointer press/move/release events.
///
/// Moves only update the preview session in place; the single external
/// write happens from the session returned by [`DragController::release`].
/// At most one session is active at a time.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The active session, if a drag is in progress.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Begin a drag at the given offset.
    ///
    /// A press while a drag is already active replaces the session; there is
    /// no queuing.
    pub fn press(&mut self, geometry: &WheelGeometry, offset: Vec2) {
        self.state = DragState::Dragging(derive_session(geometry, offset));
    }

    /// Update the preview from a pointer move. Ignored while idle.
    ///
    /// Each move overwrites the session in place, so however many moves are
    /// coalesced per rendered frame, the last one always wins.
    pub fn motion(&mut self, geometry: &WheelGeometry, offset: Vec2) {
        if let DragState::Dragging(session) = &mut self.state {
            *session = derive_session(geometry, offset);
        }
    }

    /// End the drag, returning the final selection for the caller to commit.
    ///
    /// The selection is re-derived from the release offset, so a plain click
    /// (press immediately followed by release) commits the press position.
    /// Returns `None` when no drag was active.
    pub fn release(&mut self, geometry: &WheelGeometry, offset: Vec2) -> Option<DragSession> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(_) => {
                self.state = DragState::Idle;
                Some(derive_session(geometry, offset))
            }
        }
    }

    /// Abandon any active drag without committing.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

fn derive_session(geometry: &WheelGeometry, offset: Vec2) -> DragSession {
    let (hsv, _) = geometry.point_to_color(offset);
    DragSession { offset, hsv, color: hsv.to_rgb() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WheelConfig;

    fn geometry() -> WheelGeometry {
        WheelGeometry::new(WheelConfig::default())
    }

    #[test]
    fn test_press_move_release() {
        let geometry = geometry();
        let mut drag = DragController::new();
        let p1 = Vec2::new(0.0, -100.0);
        let p2 = Vec2::new(50.0, 0.0);
        let p3 = Vec2::new(0.0, 80.0);

        drag.press(&geometry, p1);
        assert!(drag.is_dragging());
        drag.motion(&geometry, p2);
        drag.motion(&geometry, p3);

        let selection = drag.release(&geometry, p3).unwrap();
        assert!(!drag.is_dragging());

        // The committed color comes from the final position, not the press.
        let (expected, _) = geometry.point_to_color(p3);
        assert_eq!(selection.hsv, expected);
        assert_eq!(selection.color, expected.to_rgb());
    }

    #[test]
    fn test_click_only() {
        let geometry = geometry();
        let mut drag = DragController::new();
        let p1 = Vec2::new(30.0, 40.0);

        drag.press(&geometry, p1);
        let selection = drag.release(&geometry, p1).unwrap();
        assert_eq!(selection.color, geometry.point_to_color(p1).0.to_rgb());
    }

    #[test]
    fn test_release_while_idle_yields_nothing() {
        let geometry = geometry();
        let mut drag = DragController::new();
        assert!(drag.release(&geometry, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_motion_while_idle_is_ignored() {
        let geometry = geometry();
        let mut drag = DragController::new();
        drag.motion(&geometry, Vec2::new(10.0, 10.0));
        assert!(drag.session().is_none());
    }

    #[test]
    fn test_new_press_replaces_session() {
        let geometry = geometry();
        let mut drag = DragController::new();
        drag.press(&geometry, Vec2::new(100.0, 0.0));
        drag.press(&geometry, Vec2::new(0.0, -100.0));

        let session = drag.session().unwrap();
        assert!((session.hsv.h - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_discards_session() {
        let geometry = geometry();
        let mut drag = DragController::new();
        drag.press(&geometry, Vec2::new(10.0, 10.0));
        drag.cancel();
        assert!(!drag.is_dragging());
        assert!(drag.release(&geometry, Vec2::new(10.0, 10.0)).is_none());
    }
}
