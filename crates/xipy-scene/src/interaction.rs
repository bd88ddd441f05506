//! Plane widget interaction state machine.
//!
//! A plane widget reports two kinds of drag: reorienting or pushing the
//! plane itself, and moving the crosshair cursor within the plane. The two
//! resolve differently when the interaction ends:
//!
//! ```text
//!            Start/Move, cursor             Start/Move, no cursor
//!   Idle ---------------------> CursorDrag   Idle -----------------> Reorienting
//!     ^                              |          ^                        |
//!     +---- End: Snap(cursor) -------+          +---- End: Intersect ----+
//! ```
//!
//! Plane moves are applied as they arrive; a cursor drag changes nothing
//! until it ends, then snaps every plane to the cursor.

use crate::plane::{Axis, CutPlane};
use tracing::debug;
use xipy_math::{Affine, Vec3};

/// Stage of a widget interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Button pressed
    Start,
    /// Drag update
    Move,
    /// Button released
    End,
}

/// One callback from a plane widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneEvent {
    /// Plane the widget controls
    pub axis: Axis,
    /// Interaction stage
    pub phase: Phase,
    /// The drag moves the in-plane cursor rather than the plane
    pub cursor_active: bool,
    /// Plane as the widget currently shows it
    pub plane: CutPlane,
    /// Cursor position in voxel coordinates, when the widget has one
    pub cursor_voxel: Option<Vec3>,
}

impl PlaneEvent {
    /// Plane drag event.
    pub fn plane(axis: Axis, phase: Phase, plane: CutPlane) -> Self {
        Self {
            axis,
            phase,
            cursor_active: false,
            plane,
            cursor_voxel: None,
        }
    }

    /// Cursor drag event.
    pub fn cursor(axis: Axis, phase: Phase, plane: CutPlane, cursor_voxel: Vec3) -> Self {
        Self {
            axis,
            phase,
            cursor_active: true,
            plane,
            cursor_voxel: Some(cursor_voxel),
        }
    }
}

/// Current interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No drag in progress
    #[default]
    Idle,
    /// A plane is being moved or reoriented
    Reorienting(Axis),
    /// A cursor is being dragged; planes move when it is released
    CursorDrag(Axis),
}

/// Where the world position ends up after an interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Snap all planes through this world point
    Snap(Vec3),
    /// Publish the intersection of the planes as they stand
    Intersect,
}

/// Outcome of one [`PlaneEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Cursor drag in progress; nothing to update yet
    Deferred,
    /// Replace the plane for `axis`
    Apply {
        /// Plane to replace
        axis: Axis,
        /// New plane
        plane: CutPlane,
    },
    /// Interaction over
    Finish {
        /// Final plane to apply first, for a plane drag
        apply: Option<(Axis, CutPlane)>,
        /// How to derive the new position
        resolution: Resolution,
    },
}

/// Tracks one widget interaction at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneInteraction {
    state: InteractionState,
}

impl PlaneInteraction {
    /// Idle machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Drops any interaction in progress.
    pub fn cancel(&mut self) {
        if self.state != InteractionState::Idle {
            debug!(state = ?self.state, "interaction cancelled");
        }
        self.state = InteractionState::Idle;
    }

    /// Advances on `event`; `affine` maps the cursor voxel into world space.
    pub fn handle(&mut self, event: &PlaneEvent, affine: &Affine) -> Transition {
        let next = match (event.phase, self.state) {
            (Phase::End, state) => {
                self.state = InteractionState::Idle;
                return self.finish(event, state, affine);
            }
            (_, InteractionState::CursorDrag(axis)) => {
                if !event.cursor_active {
                    // Plane moves still apply; the cursor snap stays pending.
                    return Transition::Apply {
                        axis: event.axis,
                        plane: event.plane,
                    };
                }
                InteractionState::CursorDrag(axis)
            }
            (_, _) if event.cursor_active => InteractionState::CursorDrag(event.axis),
            (_, _) => InteractionState::Reorienting(event.axis),
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "interaction state");
            self.state = next;
        }

        match next {
            InteractionState::CursorDrag(_) => Transition::Deferred,
            _ => Transition::Apply {
                axis: event.axis,
                plane: event.plane,
            },
        }
    }

    fn finish(&self, event: &PlaneEvent, state: InteractionState, affine: &Affine) -> Transition {
        let cursor_drag = matches!(state, InteractionState::CursorDrag(_)) || event.cursor_active;
        // A plane widget's final plane counts even while a cursor drag is open.
        let apply = (!event.cursor_active).then_some((event.axis, event.plane));
        match (cursor_drag, event.cursor_voxel) {
            (true, Some(ijk)) => Transition::Finish {
                apply,
                resolution: Resolution::Snap(affine.voxel_to_world(ijk)),
            },
            (true, None) => {
                debug!(axis = %event.axis, "cursor drag ended without a cursor; intersecting");
                Transition::Finish {
                    apply,
                    resolution: Resolution::Intersect,
                }
            }
            (false, _) => Transition::Finish {
                apply,
                resolution: Resolution::Intersect,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_plane(z: f64) -> CutPlane {
        CutPlane::axis_aligned(Axis::Z, Vec3::new(0.0, 0.0, z))
    }

    #[test]
    fn test_plane_drag_applies_then_intersects() {
        let mut m = PlaneInteraction::new();
        let affine = Affine::IDENTITY;
        let t = m.handle(&PlaneEvent::plane(Axis::Z, Phase::Start, z_plane(1.0)), &affine);
        assert_eq!(m.state(), InteractionState::Reorienting(Axis::Z));
        assert_eq!(t, Transition::Apply { axis: Axis::Z, plane: z_plane(1.0) });

        let t = m.handle(&PlaneEvent::plane(Axis::Z, Phase::End, z_plane(2.0)), &affine);
        assert_eq!(m.state(), InteractionState::Idle);
        assert_eq!(
            t,
            Transition::Finish {
                apply: Some((Axis::Z, z_plane(2.0))),
                resolution: Resolution::Intersect,
            }
        );
    }

    #[test]
    fn test_cursor_drag_defers_then_snaps() {
        let mut m = PlaneInteraction::new();
        let affine = Affine::scaled(Vec3::splat(2.0), Vec3::new(-10.0, 0.0, 0.0));
        let ev = PlaneEvent::cursor(Axis::X, Phase::Start, z_plane(0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(m.handle(&ev, &affine), Transition::Deferred);
        let ev = PlaneEvent { phase: Phase::Move, ..ev };
        assert_eq!(m.handle(&ev, &affine), Transition::Deferred);
        assert_eq!(m.state(), InteractionState::CursorDrag(Axis::X));

        let end = PlaneEvent {
            phase: Phase::End,
            cursor_voxel: Some(Vec3::new(5.0, 2.0, 3.0)),
            ..ev
        };
        assert_eq!(
            m.handle(&end, &affine),
            Transition::Finish {
                apply: None,
                resolution: Resolution::Snap(Vec3::new(0.0, 4.0, 6.0)),
            }
        );
        assert_eq!(m.state(), InteractionState::Idle);
    }

    #[test]
    fn test_cursor_end_without_voxel_intersects() {
        let mut m = PlaneInteraction::new();
        let affine = Affine::IDENTITY;
        m.handle(&PlaneEvent::cursor(Axis::Y, Phase::Move, z_plane(0.0), Vec3::ZERO), &affine);
        let end = PlaneEvent {
            cursor_voxel: None,
            ..PlaneEvent::cursor(Axis::Y, Phase::End, z_plane(0.0), Vec3::ZERO)
        };
        let t = m.handle(&end, &affine);
        assert!(matches!(t, Transition::Finish { apply: None, resolution: Resolution::Intersect }));
    }

    #[test]
    fn test_plane_move_during_cursor_drag_keeps_snap_pending() {
        let mut m = PlaneInteraction::new();
        let affine = Affine::IDENTITY;
        m.handle(&PlaneEvent::cursor(Axis::X, Phase::Start, z_plane(0.0), Vec3::ZERO), &affine);
        let t = m.handle(&PlaneEvent::plane(Axis::Z, Phase::Move, z_plane(4.0)), &affine);
        assert_eq!(t, Transition::Apply { axis: Axis::Z, plane: z_plane(4.0) });
        assert_eq!(m.state(), InteractionState::CursorDrag(Axis::X));
    }

    #[test]
    fn test_plane_end_during_cursor_drag_is_applied() {
        let mut m = PlaneInteraction::new();
        let affine = Affine::IDENTITY;
        m.handle(&PlaneEvent::cursor(Axis::X, Phase::Start, z_plane(0.0), Vec3::ZERO), &affine);
        let t = m.handle(&PlaneEvent::plane(Axis::Z, Phase::End, z_plane(3.0)), &affine);
        assert_eq!(
            t,
            Transition::Finish {
                apply: Some((Axis::Z, z_plane(3.0))),
                resolution: Resolution::Intersect,
            }
        );
        assert_eq!(m.state(), InteractionState::Idle);
    }

    #[test]
    fn test_cancel() {
        let mut m = PlaneInteraction::new();
        m.handle(&PlaneEvent::plane(Axis::X, Phase::Start, z_plane(0.0)), &Affine::IDENTITY);
        m.cancel();
        assert_eq!(m.state(), InteractionState::Idle);
    }
}
