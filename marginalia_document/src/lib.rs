// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marginalia Document: the loadable units of an annotation viewport.
//!
//! A [`Document`] is either a single raster image or a multi-page PDF. Both
//! variants own their annotation curves, know their native content size and
//! stack-normalization scale, cache per-page screen bounds and rendered page
//! bitmaps, and can burn their finished curves into an exported output file
//! at native resolution.
//!
//! The crate is deliberately free of pixels and bytes. Decoding,
//! rasterization, frame compositing, and output encoding are all consumed
//! through the collaborator traits in [`backend`] ([`RasterBackend`],
//! [`Surface`], [`ExportBackend`]); documents hand those collaborators fully
//! resolved geometry — screen-space rects and page-native stroke paths — and
//! opaque resource handles.
//!
//! ## Coordinate spaces
//!
//! - **Native**: a page's unscaled pixel/point dimensions, as decoded.
//! - **Layout**: native × the document's `min_scale`, the space the stack is
//!   laid out in at global zoom `1.0` (all stack members share a width
//!   there). Curves are stored in per-page layout coordinates.
//! - **Screen**: layout × the global zoom, plus the pan offset.
//!
//! Export inverts `min_scale` to return to native units, Y-flipping for PDF
//! targets (bottom-left origin) but not raster ones.

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

mod backend;
mod document;
mod error;
mod image;
mod pdf;

pub use backend::{
    BitmapId, ExportBackend, ImageSource, PageExport, PdfSource, RasterBackend, SourceId, Surface,
};
pub use document::{Document, OutputNaming, SaveOptions};
pub use error::{BoxError, ExportError, LoadError};
pub use image::ImageDocument;
pub use pdf::PdfDocument;
