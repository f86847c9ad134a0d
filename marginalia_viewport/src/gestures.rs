// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch gesture disambiguation.
//!
//! A single tracker turns a raw touch stream into stroke and pinch actions.
//! The ambiguity it resolves: a touch that begins as a one-finger drag may be
//! the start of a stroke, or the first finger of a pinch. The tracker commits
//! to drawing only while exactly one pointer is down, and once a second
//! pointer has joined, the rest of the gesture can never draw.

use kurbo::{Point, Vec2};

/// A raw pointer event, already projected into view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchEvent {
    /// First pointer down.
    Down { position: Point },
    /// Second pointer down; `midpoint` and `distance` seed the pinch.
    SecondDown { midpoint: Point, distance: f64 },
    /// Single-pointer move.
    Move { position: Point },
    /// Two-pointer move.
    PinchMove { midpoint: Point, distance: f64 },
    /// Second pointer lifted, one remains.
    SecondUp,
    /// Last pointer lifted.
    Up,
}

/// What the caller should do in response to a touch event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureAction {
    /// Nothing to do.
    None,
    /// Start a new stroke at `start` and immediately extend it to `position`.
    ///
    /// `start` is the original touch-down point; the stroke begins there
    /// rather than at the move that confirmed the gesture as a draw.
    BeginStroke { start: Point, position: Point },
    /// Extend the active stroke.
    ExtendStroke { position: Point },
    /// Apply an incremental zoom and pan step.
    Pinch {
        midpoint: Point,
        scale_delta: f64,
        translation: Vec2,
    },
    /// The gesture ended; close the active stroke if any.
    ///
    /// `refresh` asks for a re-render at the settled transform.
    EndStroke { refresh: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    /// One pointer down, not yet moved; may still become a pinch.
    TentativeDraw { start: Point },
    Drawing,
    Panning { midpoint: Point, distance: f64 },
    /// One pointer remains after a pinch; its moves must not draw.
    PostGesture,
}

/// Finite state machine translating [`TouchEvent`]s into [`GestureAction`]s.
#[derive(Debug)]
pub struct GestureTracker {
    phase: Phase,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Whether a stroke is currently being drawn.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.phase == Phase::Drawing
    }

    /// Feeds one event and returns the action it resolves to.
    pub fn handle(&mut self, event: TouchEvent) -> GestureAction {
        match (self.phase, event) {
            (_, TouchEvent::Down { position }) => {
                self.phase = Phase::TentativeDraw { start: position };
                GestureAction::None
            }
            (_, TouchEvent::SecondDown { midpoint, distance }) => {
                log::trace!("gesture committed to panning, midpoint {midpoint:?}");
                self.phase = Phase::Panning { midpoint, distance };
                GestureAction::None
            }
            (Phase::TentativeDraw { start }, TouchEvent::Move { position }) => {
                log::trace!("gesture committed to drawing at {start:?}");
                self.phase = Phase::Drawing;
                GestureAction::BeginStroke { start, position }
            }
            (Phase::Drawing, TouchEvent::Move { position }) => {
                GestureAction::ExtendStroke { position }
            }
            (
                Phase::Panning {
                    midpoint: previous_midpoint,
                    distance: previous_distance,
                },
                TouchEvent::PinchMove { midpoint, distance },
            ) => {
                let scale_delta = if previous_distance > 0.0 {
                    distance / previous_distance
                } else {
                    1.0
                };
                let translation = midpoint - previous_midpoint;
                self.phase = Phase::Panning { midpoint, distance };
                GestureAction::Pinch {
                    midpoint,
                    scale_delta,
                    translation,
                }
            }
            (Phase::Panning { .. }, TouchEvent::SecondUp) => {
                self.phase = Phase::PostGesture;
                // A stroke the pinch interrupted must close here, not at the
                // final lift; the remaining finger can no longer extend it.
                GestureAction::EndStroke { refresh: false }
            }
            (_, TouchEvent::Up) => {
                self.phase = Phase::Idle;
                GestureAction::EndStroke { refresh: true }
            }
            // Moves in any other phase (post-gesture drift, stray pinch
            // events after a pointer count change) resolve to nothing.
            (_, TouchEvent::Move { .. } | TouchEvent::PinchMove { .. } | TouchEvent::SecondUp) => {
                GestureAction::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_without_motion_draws_nothing() {
        let mut tracker = GestureTracker::new();
        assert_eq!(
            tracker.handle(TouchEvent::Down {
                position: Point::new(5.0, 5.0)
            }),
            GestureAction::None
        );
        assert_eq!(
            tracker.handle(TouchEvent::Up),
            GestureAction::EndStroke { refresh: true }
        );
    }

    #[test]
    fn stroke_begins_at_the_touch_down_point() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::Down {
            position: Point::new(5.0, 5.0),
        });
        let action = tracker.handle(TouchEvent::Move {
            position: Point::new(8.0, 6.0),
        });
        assert_eq!(
            action,
            GestureAction::BeginStroke {
                start: Point::new(5.0, 5.0),
                position: Point::new(8.0, 6.0),
            }
        );
        assert!(tracker.is_drawing());
        assert_eq!(
            tracker.handle(TouchEvent::Move {
                position: Point::new(10.0, 9.0)
            }),
            GestureAction::ExtendStroke {
                position: Point::new(10.0, 9.0)
            }
        );
    }

    #[test]
    fn second_finger_converts_the_gesture_to_a_pinch() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::Down {
            position: Point::new(5.0, 5.0),
        });
        tracker.handle(TouchEvent::SecondDown {
            midpoint: Point::new(50.0, 50.0),
            distance: 100.0,
        });
        let action = tracker.handle(TouchEvent::PinchMove {
            midpoint: Point::new(52.0, 51.0),
            distance: 150.0,
        });
        assert_eq!(
            action,
            GestureAction::Pinch {
                midpoint: Point::new(52.0, 51.0),
                scale_delta: 1.5,
                translation: Vec2::new(2.0, 1.0),
            }
        );
        assert!(!tracker.is_drawing());
    }

    #[test]
    fn pinch_deltas_are_relative_to_the_previous_event() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::SecondDown {
            midpoint: Point::new(0.0, 0.0),
            distance: 100.0,
        });
        tracker.handle(TouchEvent::PinchMove {
            midpoint: Point::new(10.0, 0.0),
            distance: 200.0,
        });
        let action = tracker.handle(TouchEvent::PinchMove {
            midpoint: Point::new(10.0, 5.0),
            distance: 100.0,
        });
        assert_eq!(
            action,
            GestureAction::Pinch {
                midpoint: Point::new(10.0, 5.0),
                scale_delta: 0.5,
                translation: Vec2::new(0.0, 5.0),
            }
        );
    }

    #[test]
    fn remaining_finger_after_a_pinch_cannot_draw() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::Down {
            position: Point::new(5.0, 5.0),
        });
        tracker.handle(TouchEvent::SecondDown {
            midpoint: Point::new(50.0, 50.0),
            distance: 100.0,
        });
        tracker.handle(TouchEvent::SecondUp);
        assert_eq!(
            tracker.handle(TouchEvent::Move {
                position: Point::new(60.0, 60.0)
            }),
            GestureAction::None
        );
        assert_eq!(
            tracker.handle(TouchEvent::Up),
            GestureAction::EndStroke { refresh: true }
        );
    }

    #[test]
    fn second_finger_lift_closes_the_interrupted_stroke() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::Down {
            position: Point::new(5.0, 5.0),
        });
        tracker.handle(TouchEvent::Move {
            position: Point::new(8.0, 6.0),
        });
        assert!(tracker.is_drawing());
        tracker.handle(TouchEvent::SecondDown {
            midpoint: Point::new(50.0, 50.0),
            distance: 100.0,
        });
        // The stroke closes as soon as the pinch winds down to one finger,
        // not at the eventual final lift.
        assert_eq!(
            tracker.handle(TouchEvent::SecondUp),
            GestureAction::EndStroke { refresh: false }
        );
    }

    #[test]
    fn lift_during_a_stroke_requests_a_refresh() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::Down {
            position: Point::new(0.0, 0.0),
        });
        tracker.handle(TouchEvent::Move {
            position: Point::new(3.0, 4.0),
        });
        assert_eq!(
            tracker.handle(TouchEvent::Up),
            GestureAction::EndStroke { refresh: true }
        );
        assert!(!tracker.is_drawing());
    }

    #[test]
    fn zero_reference_distance_does_not_scale() {
        let mut tracker = GestureTracker::new();
        tracker.handle(TouchEvent::SecondDown {
            midpoint: Point::new(0.0, 0.0),
            distance: 0.0,
        });
        let GestureAction::Pinch { scale_delta, .. } = tracker.handle(TouchEvent::PinchMove {
            midpoint: Point::new(0.0, 0.0),
            distance: 80.0,
        }) else {
            panic!("expected a pinch action");
        };
        assert_eq!(scale_delta, 1.0);
    }
}
