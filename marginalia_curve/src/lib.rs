// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marginalia Curve: freehand ink strokes and smoothing interpolation.
//!
//! This crate models one freehand annotation stroke ([`Curve`]) as the sparse
//! sequence of touch samples captured while the stroke was drawn, and turns it
//! into a smooth curve on demand. Smoothing uses cubic Bézier segments whose
//! control points are estimated from neighboring raw samples with a
//! Catmull-Rom-derived tangent rule, so the curve passes through every sample
//! without overshooting at the endpoints.
//!
//! The crate is headless: rendering output is a sequence of renderer-agnostic
//! [`PathCmd`] commands that any backend (a platform canvas, a PDF content
//! stream writer, an SVG serializer) can consume.
//!
//! ## Coordinate spaces
//!
//! Samples are appended in *screen space* and stored in *layout space*: the
//! owning document's display space at global scale `1.0`. [`Curve::add_point`]
//! performs that conversion from the page's on-screen bounds and the live
//! zoom factor. Layout space makes a stroke independent of the zoom level it
//! was drawn at; projecting back out is a single multiplication:
//!
//! - [`Curve::render_at`] maps into screen space for interactive preview.
//! - [`Curve::export_points`] maps into page-native space for final export,
//!   optionally flipping the Y axis for bottom-left-origin vector targets.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use marginalia_curve::{Curve, StrokeStyle};
//!
//! let mut curve = Curve::new(StrokeStyle::new(2.0, peniko::Color::BLACK));
//!
//! // Page occupies [100, 100]..[600, 1100] on screen at zoom 1.0.
//! let page = Rect::new(100.0, 100.0, 600.0, 1100.0);
//! curve.add_point(Point::new(150.0, 200.0), page, 1.0);
//! curve.add_point(Point::new(250.0, 220.0), page, 1.0);
//! curve.add_point(Point::new(300.0, 300.0), page, 1.0);
//! curve.close();
//!
//! // Three samples interpolate into 3 * (3 - 1) + 1 = 7 points.
//! assert_eq!(curve.interpolate().count(), 7);
//!
//! // Project back into screen space for drawing.
//! let path = curve.render_at(1.0, Vec2::new(100.0, 100.0), 255);
//! assert!(!path.cmds.is_empty());
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

mod path;
mod stroke;

pub use path::{PathCmd, StrokePath, StrokeStyle};
pub use stroke::{Curve, ExportOrigin, Interpolation, FULL_ALPHA, PREVIEW_ALPHA};
