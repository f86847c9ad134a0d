// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport transform, document stacking, and gesture disambiguation.
//!
//! This crate owns the view side of an annotation session: a
//! [`ViewportState`] holding the global zoom scale and pan offset, a
//! [`DocumentStack`] that lays loaded documents out vertically at a shared
//! reference width, and a [`GestureTracker`] that turns a raw touch stream
//! into stroke and pinch actions.
//!
//! The pieces are deliberately independent. The stack never reads the
//! viewport; callers pass the current scale and pan into every layout and
//! render call, which keeps each piece testable on its own.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Size, Vec2};
//! use marginalia_viewport::{GestureAction, GestureTracker, TouchEvent, ViewportState};
//!
//! let mut viewport = ViewportState::new();
//! viewport.set_viewport_size(Size::new(800.0, 600.0));
//! viewport.set_min_scale(0.5);
//!
//! let mut tracker = GestureTracker::new();
//! tracker.handle(TouchEvent::SecondDown {
//!     midpoint: Point::new(400.0, 300.0),
//!     distance: 100.0,
//! });
//! if let GestureAction::Pinch { midpoint, scale_delta, translation } =
//!     tracker.handle(TouchEvent::PinchMove {
//!         midpoint: Point::new(400.0, 300.0),
//!         distance: 150.0,
//!     })
//! {
//!     viewport.pinch_update(midpoint, scale_delta, translation, Size::new(1600.0, 2400.0));
//! }
//! assert_eq!(viewport.scale(), 0.75);
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod gestures;
mod stack;
mod viewport;

pub use gestures::{GestureAction, GestureTracker, TouchEvent};
pub use stack::{DocumentStack, STACK_MARGIN};
pub use viewport::{MAX_SCALE, RenderGeneration, ViewportState};
