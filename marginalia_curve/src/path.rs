// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer-agnostic path commands and stroke styling.

use kurbo::Point;
use peniko::Color;
use smallvec::SmallVec;

/// A single path construction command.
///
/// Commands use absolute coordinates in whatever space the producer chose
/// (screen space for previews, page-native space for export). Backends are
/// expected to stroke the assembled path with a round cap, matching how the
/// stroke looked while it was being drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Move the current point without drawing.
    MoveTo {
        /// X coordinate of the new point.
        x: f64,
        /// Y coordinate of the new point.
        y: f64,
    },
    /// Draw a line from the current point to the given point.
    LineTo {
        /// X coordinate of the line end.
        x: f64,
        /// Y coordinate of the line end.
        y: f64,
    },
    /// Draw a cubic Bézier curve from the current point to the given point,
    /// using two control points.
    CurveTo {
        /// X coordinate of the first control point.
        x1: f64,
        /// Y coordinate of the first control point.
        y1: f64,
        /// X coordinate of the second control point.
        x2: f64,
        /// Y coordinate of the second control point.
        y2: f64,
        /// X coordinate of the curve end.
        x: f64,
        /// Y coordinate of the curve end.
        y: f64,
    },
}

/// Stroke attributes fixed when a curve is created.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke width in layout units.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

impl StrokeStyle {
    /// Creates a stroke style with the given width and color.
    #[must_use]
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

/// A ready-to-stroke path: commands plus resolved style.
///
/// The width has already been scaled into the commands' coordinate space, and
/// `alpha` carries the preview/full opacity hint; neither requires the backend
/// to know anything about zoom state or stroke lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokePath {
    /// Path construction commands in drawing order.
    pub cmds: SmallVec<[PathCmd; 16]>,
    /// Stroke width in the commands' coordinate space.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
    /// Opacity in `0..=255`; in-progress strokes use a reduced preview value.
    pub alpha: u8,
}

/// Assembles commands from an interpolated point sequence.
///
/// The sequence layout is the one produced by
/// [`Curve::interpolate`](crate::Curve::interpolate): the first point, then
/// control-control-end triples. Fewer than three points degenerate to a line
/// (or, for a single point, a zero-length line that round-cap stroking
/// renders as a dot).
pub(crate) fn cmds_from_interpolated<I>(points: I) -> SmallVec<[PathCmd; 16]>
where
    I: IntoIterator<Item = Point>,
{
    let points: SmallVec<[Point; 16]> = points.into_iter().collect();
    let mut cmds = SmallVec::new();
    let Some(first) = points.first() else {
        return cmds;
    };
    cmds.push(PathCmd::MoveTo {
        x: first.x,
        y: first.y,
    });
    if points.len() < 3 {
        let last = points[points.len() - 1];
        cmds.push(PathCmd::LineTo {
            x: last.x,
            y: last.y,
        });
        return cmds;
    }
    for triple in points[1..].chunks_exact(3) {
        cmds.push(PathCmd::CurveTo {
            x1: triple[0].x,
            y1: triple[0].y,
            x2: triple[1].x,
            y2: triple[1].y,
            x: triple[2].x,
            y: triple[2].y,
        });
    }
    cmds
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{cmds_from_interpolated, PathCmd};

    #[test]
    fn empty_input_yields_no_commands() {
        let cmds = cmds_from_interpolated([]);
        assert!(cmds.is_empty(), "no points should produce no commands");
    }

    #[test]
    fn single_point_becomes_a_dot() {
        let cmds = cmds_from_interpolated([Point::new(3.0, 4.0)]);
        assert_eq!(
            cmds.as_slice(),
            &[
                PathCmd::MoveTo { x: 3.0, y: 4.0 },
                PathCmd::LineTo { x: 3.0, y: 4.0 },
            ],
            "a lone sample strokes as a zero-length line"
        );
    }

    #[test]
    fn two_points_become_a_line() {
        let cmds = cmds_from_interpolated([Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert_eq!(cmds.len(), 2, "move plus one line");
        assert_eq!(cmds[1], PathCmd::LineTo { x: 10.0, y: 0.0 });
    }

    #[test]
    fn triples_become_cubics() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, 0.0),
        ];
        let cmds = cmds_from_interpolated(pts);
        assert_eq!(cmds.len(), 3, "move plus two cubic segments");
        assert!(matches!(cmds[1], PathCmd::CurveTo { .. }));
        let PathCmd::CurveTo { x, y, .. } = cmds[2] else {
            panic!("last command should be a cubic");
        };
        assert_eq!((x, y), (6.0, 0.0), "last cubic ends on the last sample");
    }
}
