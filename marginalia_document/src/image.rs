// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-page raster image documents.

use std::path::{Path, PathBuf};

use kurbo::{Point, Rect, Size, Vec2};
use log::debug;
use marginalia_curve::{Curve, ExportOrigin, FULL_ALPHA, PREVIEW_ALPHA};

use crate::backend::{BitmapId, ExportBackend, RasterBackend, Surface};
use crate::document::{output_file_name, SaveOptions};
use crate::error::ExportError;

/// A document backed by one decoded raster image.
///
/// The image is a single implicit page; curves attach to it directly.
#[derive(Debug)]
pub struct ImageDocument {
    file_stem: String,
    bitmap: BitmapId,
    size: Size,
    min_scale: f64,
    bounds: Option<Rect>,
    drawing: Vec<Curve>,
}

impl ImageDocument {
    pub(crate) fn new(file_stem: String, bitmap: BitmapId, size: Size) -> Self {
        Self {
            file_stem,
            bitmap,
            size,
            min_scale: 1.0,
            bounds: None,
            drawing: Vec::new(),
        }
    }

    pub(crate) fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// Native pixel size.
    pub(crate) fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub(crate) fn set_min_scale(&mut self, min_scale: f64) {
        debug_assert!(min_scale > 0.0, "fit scale must be positive");
        self.min_scale = min_scale;
    }

    /// Layout-space size: native size normalized by the fit scale.
    pub(crate) fn layout_size(&self) -> Size {
        self.size * self.min_scale
    }

    pub(crate) fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        scale: f64,
        offset: Vec2,
        viewport: Size,
        _refresh: bool,
    ) {
        let rect = Rect::from_origin_size(offset.to_point(), self.size * (self.min_scale * scale));
        self.bounds = Some(rect);
        // Fully off the visible strip: keep the bounds for hit testing but
        // submit nothing.
        if rect.y0 > viewport.height || rect.y1 < 0.0 {
            debug!("skipping off-viewport image '{}'", self.file_stem);
            return;
        }
        surface.draw_bitmap(self.bitmap, rect);
    }

    pub(crate) fn contains(&self, point: Point) -> bool {
        self.bounds.is_some_and(|b| b.contains(point))
    }

    pub(crate) fn add_drawing(&mut self, point: Point, curve: Curve) -> bool {
        if !self.contains(point) {
            return false;
        }
        self.drawing.push(curve);
        true
    }

    pub(crate) fn add_point_to_drawing(&mut self, point: Point, scale: f64) {
        let Some(bounds) = self.bounds else {
            return;
        };
        if let Some(curve) = self.drawing.iter_mut().rev().find(|c| !c.is_closed()) {
            curve.add_point(point, bounds, scale);
        }
    }

    pub(crate) fn render_drawing<S: Surface>(
        &self,
        surface: &mut S,
        scale: f64,
        viewport: Size,
    ) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let clip = bounds.intersect(Rect::from_origin_size(Point::ZERO, viewport));
        if clip.width() <= 0.0 || clip.height() <= 0.0 {
            return;
        }
        for curve in &self.drawing {
            let alpha = if curve.is_closed() {
                FULL_ALPHA
            } else {
                PREVIEW_ALPHA
            };
            let path = curve.render_at(scale, bounds.origin().to_vec2(), alpha);
            surface.stroke_path(&path, clip);
        }
    }

    pub(crate) fn save<E: ExportBackend>(
        &self,
        output_dir: &Path,
        options: &SaveOptions,
        backend: &E,
    ) -> Result<PathBuf, ExportError> {
        let output = output_dir.join(output_file_name(&self.file_stem, "png", options));
        let inverse = 1.0 / self.min_scale;
        let strokes: Vec<_> = self
            .drawing
            .iter()
            .filter(|c| c.is_closed())
            .map(|c| c.export_path(inverse, self.size.height, ExportOrigin::TopLeft))
            .collect();
        backend
            .export_image(self.bitmap, &output, &strokes)
            .map_err(|source| ExportError {
                output: output.clone(),
                source,
            })?;
        Ok(output)
    }

    pub(crate) fn reset(&mut self) {
        self.bounds = None;
    }

    pub(crate) fn close_drawing(&mut self) {
        for curve in &mut self.drawing {
            curve.close();
        }
    }

    pub(crate) fn undo(&mut self) {
        self.drawing.pop();
    }

    pub(crate) fn clear(&mut self) {
        self.drawing.clear();
    }

    pub(crate) fn drawing_len(&self) -> usize {
        self.drawing.len()
    }

    pub(crate) fn release<B: RasterBackend>(&mut self, backend: &mut B) {
        backend.destroy_bitmap(self.bitmap);
    }
}
