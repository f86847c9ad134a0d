// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-page PDF documents.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use log::debug;
use marginalia_curve::{Curve, ExportOrigin, FULL_ALPHA, PREVIEW_ALPHA};

use crate::backend::{BitmapId, ExportBackend, PageExport, RasterBackend, SourceId, Surface};
use crate::document::{output_file_name, SaveOptions};
use crate::error::ExportError;

/// Vertical gap between consecutive pages, in layout units.
pub(crate) const PAGE_MARGIN: f64 = 5.0;

/// A document backed by an open multi-page PDF.
///
/// Pages are stacked vertically with a fixed margin; each page keeps its own
/// screen-space bounds rect and a cached rasterized bitmap, and every curve
/// is tagged with the page it was started on.
#[derive(Debug)]
pub struct PdfDocument {
    file_stem: String,
    source_path: PathBuf,
    source: SourceId,
    page_sizes: Vec<Size>,
    size: Size,
    min_scale: f64,
    page_bounds: HashMap<usize, Rect>,
    page_bitmaps: HashMap<usize, BitmapId>,
    drawing: Vec<(usize, Curve)>,
}

impl PdfDocument {
    pub(crate) fn new(
        file_stem: String,
        source_path: PathBuf,
        source: SourceId,
        page_sizes: Vec<Size>,
    ) -> Self {
        let width = page_sizes.iter().map(|s| s.width).fold(0.0, f64::max);
        let height = page_sizes.iter().map(|s| s.height).sum::<f64>()
            + PAGE_MARGIN * page_sizes.len().saturating_sub(1) as f64;
        Self {
            file_stem,
            source_path,
            source,
            page_sizes,
            size: Size::new(width, height),
            min_scale: 1.0,
            page_bounds: HashMap::new(),
            page_bitmaps: HashMap::new(),
            drawing: Vec::new(),
        }
    }

    pub(crate) fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// Native size of the whole page stack, inter-page margins included.
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

    pub(crate) fn layout_size(&self) -> Size {
        self.size * self.min_scale
    }

    /// Screen-space rect of one page under the given effective scale.
    ///
    /// Also refreshes the page's entry in the bounds cache.
    fn page_rect(&mut self, index: usize, effective_scale: f64, offset: Vec2) -> Rect {
        let top: f64 = self.page_sizes[..index]
            .iter()
            .map(|s| s.height + PAGE_MARGIN)
            .sum();
        let origin = Point::new(offset.x, top * effective_scale + offset.y);
        let rect = Rect::from_origin_size(origin, self.page_sizes[index] * effective_scale);
        self.page_bounds.insert(index, rect);
        rect
    }

    pub(crate) fn render<S: Surface, B: RasterBackend>(
        &mut self,
        surface: &mut S,
        backend: &mut B,
        scale: f64,
        offset: Vec2,
        viewport: Size,
        refresh: bool,
    ) {
        let effective = scale * self.min_scale;
        for index in 0..self.page_sizes.len() {
            let rect = self.page_rect(index, effective, offset);
            // Pages fully off the visible strip are neither drawn nor cached.
            if rect.y0 > viewport.height || rect.y1 < 0.0 {
                debug!("skipping off-viewport page {index}");
                continue;
            }
            let bitmap = if refresh {
                self.rasterize_page(backend, index, effective)
            } else if let Some(&cached) = self.page_bitmaps.get(&index) {
                Some(cached)
            } else {
                self.rasterize_page(backend, index, effective)
            };
            if let Some(bitmap) = bitmap {
                surface.draw_bitmap(bitmap, rect);
            }
        }
    }

    fn rasterize_page<B: RasterBackend>(
        &mut self,
        backend: &mut B,
        index: usize,
        effective_scale: f64,
    ) -> Option<BitmapId> {
        let pixel_size = self.page_sizes[index] * effective_scale;
        if pixel_size.width < 1.0 || pixel_size.height < 1.0 {
            return None;
        }
        match backend.render_pdf_page(self.source, index, pixel_size) {
            Ok(bitmap) => {
                debug!("rasterized page {index} at {pixel_size:?}");
                if let Some(old) = self.page_bitmaps.insert(index, bitmap) {
                    backend.destroy_bitmap(old);
                }
                Some(bitmap)
            }
            Err(err) => {
                // A failed rasterization degrades to skipping the page's
                // draw; the render pass itself never fails.
                debug!("page {index} rasterization failed: {err}");
                None
            }
        }
    }

    fn page_under(&self, point: Point) -> Option<usize> {
        self.page_bounds
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(&index, _)| index)
    }

    pub(crate) fn contains(&self, point: Point) -> bool {
        self.page_under(point).is_some()
    }

    pub(crate) fn add_drawing(&mut self, point: Point, curve: Curve) -> bool {
        match self.page_under(point) {
            Some(index) => {
                self.drawing.push((index, curve));
                true
            }
            None => false,
        }
    }

    pub(crate) fn add_point_to_drawing(&mut self, point: Point, scale: f64) {
        let Some((index, curve)) = self
            .drawing
            .iter_mut()
            .rev()
            .find(|(_, c)| !c.is_closed())
        else {
            return;
        };
        if let Some(&bounds) = self.page_bounds.get(index) {
            curve.add_point(point, bounds, scale);
        }
    }

    pub(crate) fn render_drawing<S: Surface>(&self, surface: &mut S, scale: f64, viewport: Size) {
        let viewport_rect = Rect::from_origin_size(Point::ZERO, viewport);
        for index in 0..self.page_sizes.len() {
            let Some(&bounds) = self.page_bounds.get(&index) else {
                continue;
            };
            let clip = bounds.intersect(viewport_rect);
            if clip.width() <= 0.0 || clip.height() <= 0.0 {
                continue;
            }
            for (_, curve) in self.drawing.iter().filter(|(page, _)| *page == index) {
                let alpha = if curve.is_closed() {
                    FULL_ALPHA
                } else {
                    PREVIEW_ALPHA
                };
                let path = curve.render_at(scale, bounds.origin().to_vec2(), alpha);
                surface.stroke_path(&path, clip);
            }
        }
    }

    pub(crate) fn save<E: ExportBackend>(
        &self,
        output_dir: &Path,
        options: &SaveOptions,
        backend: &E,
    ) -> Result<PathBuf, ExportError> {
        let output = output_dir.join(output_file_name(&self.file_stem, "pdf", options));
        let inverse = 1.0 / self.min_scale;
        let mut pages: Vec<PageExport> = Vec::new();
        for index in 0..self.page_sizes.len() {
            let strokes: Vec<_> = self
                .drawing
                .iter()
                .filter(|(page, curve)| *page == index && curve.is_closed())
                .map(|(_, curve)| {
                    // PDF content streams use a bottom-left origin.
                    let native_height = self.page_sizes[index].height;
                    curve.export_path(inverse, native_height, ExportOrigin::BottomLeft)
                })
                .collect();
            if !strokes.is_empty() {
                pages.push(PageExport {
                    page_index: index,
                    strokes,
                });
            }
        }
        backend
            .export_pdf(&self.source_path, &output, &pages)
            .map_err(|source| ExportError {
                output: output.clone(),
                source,
            })?;
        Ok(output)
    }

    pub(crate) fn reset<B: RasterBackend>(&mut self, backend: &mut B) {
        self.page_bounds.clear();
        for (_, bitmap) in self.page_bitmaps.drain() {
            backend.destroy_bitmap(bitmap);
        }
    }

    pub(crate) fn close_drawing(&mut self) {
        for (_, curve) in &mut self.drawing {
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
        self.reset(backend);
    }
}
