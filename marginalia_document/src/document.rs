// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The polymorphic document unit.

use std::path::{Path, PathBuf};

use kurbo::{Point, Size, Vec2};
use log::info;
use marginalia_curve::Curve;

use crate::backend::{ExportBackend, RasterBackend, Surface};
use crate::error::{ExportError, LoadError};
use crate::image::ImageDocument;
use crate::pdf::PdfDocument;

/// How exported output files are named.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputNaming {
    /// `<stem>-edited.<ext>`.
    #[default]
    EditedSuffix,
    /// `<stem>_<yyyy-mm-dd-hh-mm-ss>.<ext>`.
    Timestamped,
}

/// Options applied to a save operation.
#[derive(Copy, Clone, Debug, Default)]
pub struct SaveOptions {
    /// Output file naming convention.
    pub naming: OutputNaming,
}

pub(crate) fn output_file_name(stem: &str, ext: &str, options: &SaveOptions) -> String {
    match options.naming {
        OutputNaming::EditedSuffix => format!("{stem}-edited.{ext}"),
        OutputNaming::Timestamped => {
            let stamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
            format!("{stem}_{stamp}.{ext}")
        }
    }
}

/// One loadable unit of the viewport stack: a raster image or a multi-page
/// PDF.
///
/// Both variants share the same contract — hit-testing against cached page
/// bounds, curve ownership, cached rendering, and native-resolution export —
/// dispatched over the enum so new content types can be added without
/// touching the viewport layer.
#[derive(Debug)]
pub enum Document {
    /// A single raster page.
    Image(ImageDocument),
    /// A stack of PDF pages.
    Pdf(PdfDocument),
}

impl Document {
    /// Loads a document from a file path.
    ///
    /// The format resolves from the (lowercased) extension: `pdf` opens the
    /// PDF variant, `png`/`jpg`/`jpeg`/`heic` decode into the image variant,
    /// anything else is [`LoadError::UnsupportedFormat`]. Backend open or
    /// decode failures surface as [`LoadError::SourceUnavailable`]; either
    /// way no partial state is created.
    pub fn create<B: RasterBackend>(path: &Path, backend: &mut B) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let unavailable = |source| LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let document = match extension.as_str() {
            "pdf" => {
                let pdf = backend.open_pdf(path).map_err(unavailable)?;
                Self::Pdf(PdfDocument::new(
                    stem,
                    path.to_path_buf(),
                    pdf.source,
                    pdf.page_sizes,
                ))
            }
            "png" | "jpg" | "jpeg" | "heic" => {
                let image = backend.decode_image(path).map_err(unavailable)?;
                Self::Image(ImageDocument::new(stem, image.bitmap, image.size))
            }
            _ => {
                return Err(LoadError::UnsupportedFormat {
                    extension,
                    path: path.to_path_buf(),
                })
            }
        };
        info!("loaded '{}'", path.display());
        Ok(document)
    }

    /// File name stem used to derive export output names.
    #[must_use]
    pub fn file_stem(&self) -> &str {
        match self {
            Self::Image(doc) => doc.file_stem(),
            Self::Pdf(doc) => doc.file_stem(),
        }
    }

    /// Native content size (for PDFs: the whole page stack, margins
    /// included).
    #[must_use]
    pub fn size(&self) -> Size {
        match self {
            Self::Image(doc) => doc.size(),
            Self::Pdf(doc) => doc.size(),
        }
    }

    /// The document's normalization scale within its stack.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        match self {
            Self::Image(doc) => doc.min_scale(),
            Self::Pdf(doc) => doc.min_scale(),
        }
    }

    /// Sets the normalization scale. Computed once at stack layout time.
    pub fn set_min_scale(&mut self, min_scale: f64) {
        match self {
            Self::Image(doc) => doc.set_min_scale(min_scale),
            Self::Pdf(doc) => doc.set_min_scale(min_scale),
        }
    }

    /// Content size in layout units (native × normalization scale).
    #[must_use]
    pub fn layout_size(&self) -> Size {
        match self {
            Self::Image(doc) => doc.layout_size(),
            Self::Pdf(doc) => doc.layout_size(),
        }
    }

    /// Renders the document's pages into `surface`.
    ///
    /// `scale` is the global viewport scale and `offset` the document's
    /// screen-space origin. Page bounds caches refresh as a side effect;
    /// pages fully outside the viewport's vertical strip are skipped. With
    /// `refresh`, cached page bitmaps are re-rasterized at the current scale.
    pub fn render<S: Surface, B: RasterBackend>(
        &mut self,
        surface: &mut S,
        backend: &mut B,
        scale: f64,
        offset: Vec2,
        viewport: Size,
        refresh: bool,
    ) {
        match self {
            Self::Image(doc) => doc.render(surface, scale, offset, viewport, refresh),
            Self::Pdf(doc) => doc.render(surface, backend, scale, offset, viewport, refresh),
        }
    }

    /// Whether `point` (screen space) falls on any of this document's pages.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        match self {
            Self::Image(doc) => doc.contains(point),
            Self::Pdf(doc) => doc.contains(point),
        }
    }

    /// Attaches a new curve to the page under `point`.
    ///
    /// Returns `false` (and drops the curve) if `point` misses the document.
    pub fn add_drawing(&mut self, point: Point, curve: Curve) -> bool {
        match self {
            Self::Image(doc) => doc.add_drawing(point, curve),
            Self::Pdf(doc) => doc.add_drawing(point, curve),
        }
    }

    /// Forwards a screen-space sample to the most recent still-open curve.
    pub fn add_point_to_drawing(&mut self, point: Point, scale: f64) {
        match self {
            Self::Image(doc) => doc.add_point_to_drawing(point, scale),
            Self::Pdf(doc) => doc.add_point_to_drawing(point, scale),
        }
    }

    /// Composites all curves onto `surface`, clipped per page against the
    /// viewport; open curves draw at preview alpha.
    pub fn render_drawing<S: Surface>(&self, surface: &mut S, scale: f64, viewport: Size) {
        match self {
            Self::Image(doc) => doc.render_drawing(surface, scale, viewport),
            Self::Pdf(doc) => doc.render_drawing(surface, scale, viewport),
        }
    }

    /// Exports the document with all closed curves burned in at native
    /// resolution, returning the written output path.
    pub fn save<E: ExportBackend>(
        &self,
        output_dir: &Path,
        options: &SaveOptions,
        backend: &E,
    ) -> Result<PathBuf, ExportError> {
        let output = match self {
            Self::Image(doc) => doc.save(output_dir, options, backend),
            Self::Pdf(doc) => doc.save(output_dir, options, backend),
        }?;
        info!("saved '{}'", output.display());
        Ok(output)
    }

    /// Drops bounds and bitmap caches (not curves); used when a viewport
    /// resize invalidates cached renders.
    pub fn reset<B: RasterBackend>(&mut self, backend: &mut B) {
        match self {
            Self::Image(doc) => doc.reset(),
            Self::Pdf(doc) => doc.reset(backend),
        }
    }

    /// Closes any still-open curve.
    pub fn close_drawing(&mut self) {
        match self {
            Self::Image(doc) => doc.close_drawing(),
            Self::Pdf(doc) => doc.close_drawing(),
        }
    }

    /// Removes the most recently added curve.
    pub fn undo(&mut self) {
        match self {
            Self::Image(doc) => doc.undo(),
            Self::Pdf(doc) => doc.undo(),
        }
    }

    /// Removes all curves.
    pub fn clear(&mut self) {
        match self {
            Self::Image(doc) => doc.clear(),
            Self::Pdf(doc) => doc.clear(),
        }
    }

    /// Number of curves currently attached.
    #[must_use]
    pub fn drawing_len(&self) -> usize {
        match self {
            Self::Image(doc) => doc.drawing_len(),
            Self::Pdf(doc) => doc.drawing_len(),
        }
    }

    /// Releases all backend resources this document holds.
    pub fn release<B: RasterBackend>(&mut self, backend: &mut B) {
        match self {
            Self::Image(doc) => doc.release(backend),
            Self::Pdf(doc) => doc.release(backend),
        }
    }
}
