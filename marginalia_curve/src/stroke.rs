// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The freehand stroke: raw samples, smoothing, and projection.

use kurbo::{Point, Rect, Vec2};

use crate::path::{cmds_from_interpolated, StrokePath, StrokeStyle};

/// Opacity used while a stroke is still being drawn.
pub const PREVIEW_ALPHA: u8 = 128;

/// Opacity of a finished stroke.
pub const FULL_ALPHA: u8 = 255;

/// Which corner the export target treats as its coordinate origin.
///
/// Vector PDF content streams grow upward from the bottom-left corner, so
/// exported points must be Y-flipped for them. Raster targets keep the
/// top-left origin the stroke was captured in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportOrigin {
    /// Top-left origin, Y grows downward (raster images).
    TopLeft,
    /// Bottom-left origin, Y grows upward (PDF page canvases).
    BottomLeft,
}

/// One freehand ink stroke.
///
/// A curve accumulates raw touch samples while the pointer is down, stored in
/// layout space (the owning document's display space at global scale `1.0`).
/// Closing the curve is irreversible; once closed, further samples are
/// silently ignored and the stroke only leaves its document through undo or
/// a bulk clear.
#[derive(Clone, Debug)]
pub struct Curve {
    points: Vec<Point>,
    style: StrokeStyle,
    closed: bool,
}

impl Curve {
    /// Creates an empty, open stroke with the given style.
    #[must_use]
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            points: Vec::new(),
            style,
            closed: false,
        }
    }

    /// Returns the stroke style fixed at creation.
    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Returns `true` once the stroke has been finished.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of raw samples captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no samples have been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a screen-space sample.
    ///
    /// `page_bounds` is the owning page's current screen-space rect and
    /// `scale` the page's full on-screen zoom factor; the sample is stored as
    /// `(raw - page_bounds.origin) / scale`, i.e. in layout space. No-op on a
    /// closed stroke or with a degenerate scale.
    pub fn add_point(&mut self, raw: Point, page_bounds: Rect, scale: f64) {
        if self.closed || scale <= 0.0 {
            return;
        }
        let local = raw - page_bounds.origin();
        self.points.push((local / scale).to_point());
    }

    /// Finishes the stroke. Irreversible.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns the smoothed point sequence.
    ///
    /// The iterator is lazy, finite, and restartable (each call starts a new
    /// pass over the same unmodified samples, yielding an identical
    /// sequence). For `n` raw samples it yields:
    ///
    /// - `n == 0`: nothing.
    /// - `n == 1`: the sample itself (rendered as a dot).
    /// - `n == 2`: both endpoints (a straight line).
    /// - `n >= 3`: `3 * (n - 1) + 1` points — the first sample followed by
    ///   control-control-end triples, one triple per raw segment. Control
    ///   points follow a Catmull-Rom-derived tangent rule: each segment's
    ///   tangent is estimated from the two raw neighbors, clamped at the
    ///   stroke's ends by reusing the adjacent sample. The first and last
    ///   output points equal the first and last samples exactly.
    #[must_use]
    pub fn interpolate(&self) -> Interpolation<'_> {
        Interpolation {
            points: &self.points,
            pos: 0,
        }
    }

    /// Projects the smoothed stroke into screen space for preview rendering.
    ///
    /// Every interpolated point maps through `p * scale + offset`; the stroke
    /// width scales with the same factor. `alpha` is a rendering hint only
    /// (use [`PREVIEW_ALPHA`] while the stroke is open).
    #[must_use]
    pub fn render_at(&self, scale: f64, offset: Vec2, alpha: u8) -> StrokePath {
        let cmds = cmds_from_interpolated(
            self.interpolate().map(|p| (p.to_vec2() * scale + offset).to_point()),
        );
        StrokePath {
            cmds,
            width: self.style.width * scale,
            color: self.style.color,
            alpha,
        }
    }

    /// Projects the smoothed stroke into page-native space for export.
    ///
    /// `inverse_min_scale` converts layout units back into the page's native
    /// units. For [`ExportOrigin::BottomLeft`] targets each point's Y is
    /// flipped against `page_height` (given in native units); raster targets
    /// must pass [`ExportOrigin::TopLeft`] and receive the points unflipped.
    #[must_use]
    pub fn export_points(
        &self,
        inverse_min_scale: f64,
        page_height: f64,
        origin: ExportOrigin,
    ) -> Vec<Point> {
        self.interpolate()
            .map(|p| {
                let scaled = p.to_vec2() * inverse_min_scale;
                match origin {
                    ExportOrigin::TopLeft => scaled.to_point(),
                    ExportOrigin::BottomLeft => Point::new(scaled.x, page_height - scaled.y),
                }
            })
            .collect()
    }

    /// Like [`Curve::export_points`], but assembled into a ready-to-stroke
    /// path with the width converted into native units.
    #[must_use]
    pub fn export_path(
        &self,
        inverse_min_scale: f64,
        page_height: f64,
        origin: ExportOrigin,
    ) -> StrokePath {
        let cmds =
            cmds_from_interpolated(self.export_points(inverse_min_scale, page_height, origin));
        StrokePath {
            cmds,
            width: self.style.width * inverse_min_scale,
            color: self.style.color,
            alpha: FULL_ALPHA,
        }
    }
}

/// Lazy iterator over a curve's smoothed point sequence.
///
/// Created by [`Curve::interpolate`].
#[derive(Clone, Debug)]
pub struct Interpolation<'a> {
    points: &'a [Point],
    pos: usize,
}

impl Interpolation<'_> {
    fn total(&self) -> usize {
        match self.points.len() {
            n @ (0 | 1 | 2) => n,
            n => 3 * (n - 1) + 1,
        }
    }

    fn get(&self, pos: usize) -> Option<Point> {
        let points = self.points;
        let n = points.len();
        if pos >= self.total() {
            return None;
        }
        if pos == 0 {
            return Some(points[0]);
        }
        if n == 2 {
            return Some(points[1]);
        }
        // Segment i covers raw points [i - 1, i]; outputs are the two control
        // points followed by the segment's end point.
        let i = (pos - 1) / 3 + 1;
        let start = points[i - 1];
        let end = points[i];
        Some(match (pos - 1) % 3 {
            0 => {
                let before = if i > 1 { points[i - 2] } else { start };
                start + (end - before) * 0.25
            }
            1 => {
                let after = if i < n - 1 { points[i + 1] } else { end };
                end - (after - start) * 0.25
            }
            _ => end,
        })
    }
}

impl Iterator for Interpolation<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let out = self.get(self.pos)?;
        self.pos += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Interpolation<'_> {}
