// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits consumed by documents.
//!
//! The engine stays pixel- and byte-free: decoding, rasterization, surface
//! compositing, and output-file encoding all live behind the traits in this
//! module. Resources cross the boundary as small opaque handles whose
//! lifetimes the backend manages, and every geometric quantity the engine
//! hands over is fully resolved (screen-space rects, page-native stroke
//! paths), so backends never need to know about zoom or layout state.

use std::path::Path;

use kurbo::{Rect, Size};
use marginalia_curve::StrokePath;
use peniko::Color;

use crate::error::BoxError;

/// Identifier for a decoded or rasterized bitmap resource.
///
/// This is a small, opaque handle that is stable for the lifetime of the
/// resource. Bitmaps are reused across frames until explicitly destroyed.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmapId(pub u32);

/// Identifier for an opened PDF source.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

/// A decoded raster image.
#[derive(Copy, Clone, Debug)]
pub struct ImageSource {
    /// Handle to the decoded bitmap.
    pub bitmap: BitmapId,
    /// Native pixel size.
    pub size: Size,
}

/// An opened PDF document.
#[derive(Clone, Debug)]
pub struct PdfSource {
    /// Handle to the open document.
    pub source: SourceId,
    /// Native size of each page, in page order.
    pub page_sizes: Vec<Size>,
}

/// Decoding and page rasterization.
///
/// Implementations wrap the platform's image decoder (including any
/// HEIC-specific decode path) and PDF page renderer.
pub trait RasterBackend {
    /// Decodes the image file at `path` into a bitmap.
    fn decode_image(&mut self, path: &Path) -> Result<ImageSource, BoxError>;

    /// Opens the PDF file at `path` and inventories its pages.
    fn open_pdf(&mut self, path: &Path) -> Result<PdfSource, BoxError>;

    /// Rasterizes one page of an open PDF at the given pixel size, over a
    /// white background.
    fn render_pdf_page(
        &mut self,
        source: SourceId,
        page_index: usize,
        pixel_size: Size,
    ) -> Result<BitmapId, BoxError>;

    /// Releases a bitmap the engine no longer references.
    fn destroy_bitmap(&mut self, bitmap: BitmapId);
}

/// A compositing target for one rendered frame.
///
/// Coordinates are viewport pixels. Implementations typically wrap a platform
/// canvas or an off-screen layer bitmap.
pub trait Surface {
    /// Fills the whole surface with a background color.
    fn clear(&mut self, color: Color);

    /// Draws a bitmap scaled into `dest`.
    fn draw_bitmap(&mut self, bitmap: BitmapId, dest: Rect);

    /// Strokes a path with round caps, clipped to `clip`.
    fn stroke_path(&mut self, path: &StrokePath, clip: Rect);
}

/// Strokes to burn into one page of an exported document.
#[derive(Clone, Debug)]
pub struct PageExport {
    /// Zero-based page index in the source document.
    pub page_index: usize,
    /// Finished strokes in page-native coordinates.
    ///
    /// For PDF targets these are already Y-flipped into the bottom-left
    /// origin convention; raster targets receive top-left-origin paths.
    pub strokes: Vec<StrokePath>,
}

/// Output-file writing.
///
/// `&self` receivers: a multi-document save fans exports out across threads,
/// so implementations must be shareable. Each call writes one complete output
/// file or fails without touching engine state.
pub trait ExportBackend: Sync {
    /// Copies the PDF at `source` to `output` with each page's strokes drawn
    /// into its content stream (round cap, stroke color/width per path).
    fn export_pdf(&self, source: &Path, output: &Path, pages: &[PageExport])
        -> Result<(), BoxError>;

    /// Re-encodes `bitmap` to `output` with the strokes composited on top at
    /// native resolution.
    fn export_image(
        &self,
        bitmap: BitmapId,
        output: &Path,
        strokes: &[StrokePath],
    ) -> Result<(), BoxError>;
}
