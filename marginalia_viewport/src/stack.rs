// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical document stacking and hit dispatch.

use kurbo::{Point, Size, Vec2};
use marginalia_curve::Curve;
use marginalia_document::{Document, RasterBackend, Surface};

/// Gap around and between stacked documents, in layout units.
pub const STACK_MARGIN: f64 = 10.0;

/// The ordered list of loaded documents, stacked top to bottom.
///
/// Layout normalizes every member against the widest one: at global scale
/// `1.0` all documents share the stack's reference width, each drawn at its
/// own `min_scale`. The stack knows nothing about gestures or zoom state; the
/// caller supplies the global scale and pan for every pass.
#[derive(Debug, Default)]
pub struct DocumentStack {
    documents: Vec<Document>,
}

impl DocumentStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document to the bottom of the stack.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Borrows a document by stack index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// Mutably borrows a document by stack index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.documents.get_mut(index)
    }

    /// Iterates the documents in stack order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Mutably iterates the documents in stack order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.iter_mut()
    }

    /// Normalizes the stack against `viewport` and returns the fit scale.
    ///
    /// Each document's `min_scale` is set so all members share the widest
    /// document's width at global scale `1.0`; the returned fit scale maps
    /// that reference width onto the viewport width and becomes the
    /// viewport's lower zoom bound. Called once per measured viewport size.
    pub fn layout(&mut self, viewport: Size) -> f64 {
        let reference_width = self
            .documents
            .iter()
            .map(|d| d.size().width)
            .fold(0.0, f64::max);
        if reference_width <= 0.0 {
            return 1.0;
        }
        for document in &mut self.documents {
            let width = document.size().width;
            if width > 0.0 {
                document.set_min_scale(reference_width / width);
            }
        }
        if viewport.width > 0.0 {
            viewport.width / reference_width
        } else {
            1.0
        }
    }

    /// Layout-space extent of the whole stack, margins included.
    ///
    /// This is the content rect pan clamping operates on.
    #[must_use]
    pub fn extents(&self) -> Size {
        let width = self
            .documents
            .iter()
            .map(|d| d.layout_size().width)
            .fold(0.0, f64::max);
        let height: f64 = self
            .documents
            .iter()
            .map(|d| d.layout_size().height + STACK_MARGIN)
            .sum();
        Size::new(
            width + 2.0 * STACK_MARGIN,
            height + STACK_MARGIN,
        )
    }

    /// Screen-space origin of the document at `index`.
    ///
    /// `index` must be less than [`DocumentStack::len`].
    #[must_use]
    pub fn document_offset(&self, index: usize, scale: f64, pan: Vec2) -> Vec2 {
        debug_assert!(index < self.documents.len(), "document index out of bounds");
        let top: f64 = self.documents[..index]
            .iter()
            .map(|d| d.layout_size().height + STACK_MARGIN)
            .sum();
        Vec2::new(STACK_MARGIN, STACK_MARGIN + top) * scale + pan
    }

    /// Renders every document's pages, then overlays all drawings.
    ///
    /// Page bounds caches refresh as a side effect, so hit-testing is valid
    /// for exactly this transform until the next pass.
    pub fn render<S: Surface, B: RasterBackend>(
        &mut self,
        surface: &mut S,
        backend: &mut B,
        scale: f64,
        pan: Vec2,
        viewport: Size,
        refresh: bool,
    ) {
        for index in 0..self.documents.len() {
            let offset = self.document_offset(index, scale, pan);
            self.documents[index].render(surface, backend, scale, offset, viewport, refresh);
        }
        for document in &self.documents {
            document.render_drawing(surface, scale, viewport);
        }
    }

    /// Index of the first document whose rendered bounds contain `point`.
    #[must_use]
    pub fn document_under(&self, point: Point) -> Option<usize> {
        self.documents.iter().position(|d| d.contains(point))
    }

    /// Attaches a new curve to the document under `point`.
    ///
    /// Returns the receiving document's index, or `None` if the point missed
    /// every document (the curve is dropped).
    pub fn add_drawing(&mut self, point: Point, curve: Curve) -> Option<usize> {
        let index = self.document_under(point)?;
        self.documents[index].add_drawing(point, curve);
        Some(index)
    }

    /// Forwards a stroke sample to the document owning the active curve.
    pub fn draw_on_documents(&mut self, point: Point, scale: f64) {
        for document in &mut self.documents {
            document.add_point_to_drawing(point, scale);
        }
    }

    /// Closes every still-open curve across the stack.
    pub fn close_all_drawings(&mut self) {
        for document in &mut self.documents {
            document.close_drawing();
        }
    }

    /// Drops every document's bounds and bitmap caches.
    pub fn reset_all<B: RasterBackend>(&mut self, backend: &mut B) {
        for document in &mut self.documents {
            document.reset(backend);
        }
    }

    /// Releases every document's backend resources and empties the stack.
    pub fn release_all<B: RasterBackend>(&mut self, backend: &mut B) {
        for document in &mut self.documents {
            document.release(backend);
        }
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use kurbo::Rect;
    use marginalia_curve::StrokePath;
    use marginalia_document::{
        BitmapId, BoxError, ImageSource, PdfSource, RasterBackend, SourceId, Surface,
    };
    use peniko::Color;

    use super::*;

    /// Backend that fabricates bitmaps and infers image sizes from the stem.
    struct StubBackend {
        next_bitmap: u32,
        sizes: Vec<Size>,
    }

    impl StubBackend {
        fn new(sizes: Vec<Size>) -> Self {
            Self {
                next_bitmap: 0,
                sizes,
            }
        }
    }

    impl RasterBackend for StubBackend {
        fn decode_image(&mut self, _path: &Path) -> Result<ImageSource, BoxError> {
            let size = self.sizes.remove(0);
            self.next_bitmap += 1;
            Ok(ImageSource {
                bitmap: BitmapId(self.next_bitmap),
                size,
            })
        }

        fn open_pdf(&mut self, _path: &Path) -> Result<PdfSource, BoxError> {
            unimplemented!("stack tests use image documents only")
        }

        fn render_pdf_page(
            &mut self,
            _source: SourceId,
            _page_index: usize,
            _pixel_size: Size,
        ) -> Result<BitmapId, BoxError> {
            unimplemented!()
        }

        fn destroy_bitmap(&mut self, _bitmap: BitmapId) {}
    }

    #[derive(Default)]
    struct RecordingSurface {
        bitmaps: Vec<Rect>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, _color: Color) {}

        fn draw_bitmap(&mut self, _bitmap: BitmapId, dest: Rect) {
            self.bitmaps.push(dest);
        }

        fn stroke_path(&mut self, _path: &StrokePath, _clip: Rect) {}
    }

    fn stack_of(sizes: Vec<Size>) -> (DocumentStack, StubBackend) {
        let mut backend = StubBackend::new(sizes);
        let mut stack = DocumentStack::new();
        for i in 0..backend.sizes.len() {
            let document =
                Document::create(Path::new(&format!("/tmp/doc-{i}.png")), &mut backend).unwrap();
            stack.push(document);
        }
        (stack, backend)
    }

    #[test]
    fn layout_normalizes_against_the_widest_document() {
        let (mut stack, _) = stack_of(vec![Size::new(200.0, 100.0), Size::new(100.0, 50.0)]);
        let fit = stack.layout(Size::new(400.0, 600.0));
        assert_eq!(fit, 2.0);
        assert_eq!(stack.get(0).unwrap().min_scale(), 1.0);
        assert_eq!(stack.get(1).unwrap().min_scale(), 2.0);
        // Both members now share the reference width in layout units.
        assert_eq!(stack.get(0).unwrap().layout_size().width, 200.0);
        assert_eq!(stack.get(1).unwrap().layout_size().width, 200.0);
    }

    #[test]
    fn extents_include_margins_between_and_around_documents() {
        let (mut stack, _) = stack_of(vec![Size::new(200.0, 100.0), Size::new(100.0, 50.0)]);
        stack.layout(Size::new(400.0, 600.0));
        // Heights in layout units: 100 and 50 * 2 = 100.
        assert_eq!(stack.extents(), Size::new(220.0, 230.0));
    }

    #[test]
    fn document_offsets_stack_vertically_and_follow_the_transform() {
        let (mut stack, _) = stack_of(vec![Size::new(200.0, 100.0), Size::new(100.0, 50.0)]);
        stack.layout(Size::new(400.0, 600.0));
        assert_eq!(
            stack.document_offset(0, 1.0, Vec2::ZERO),
            Vec2::new(10.0, 10.0)
        );
        assert_eq!(
            stack.document_offset(1, 1.0, Vec2::ZERO),
            Vec2::new(10.0, 120.0)
        );
        assert_eq!(
            stack.document_offset(1, 2.0, Vec2::new(-5.0, -5.0)),
            Vec2::new(15.0, 235.0)
        );
    }

    #[test]
    #[should_panic(expected = "document index out of bounds")]
    fn document_offset_requires_a_valid_index() {
        let stack = DocumentStack::new();
        let _ = stack.document_offset(0, 1.0, Vec2::ZERO);
    }

    #[test]
    fn hit_dispatch_routes_to_the_rendered_document() {
        let (mut stack, mut backend) =
            stack_of(vec![Size::new(200.0, 100.0), Size::new(100.0, 50.0)]);
        stack.layout(Size::new(400.0, 600.0));
        let mut surface = RecordingSurface::default();
        stack.render(
            &mut surface,
            &mut backend,
            1.0,
            Vec2::ZERO,
            Size::new(400.0, 600.0),
            false,
        );
        assert_eq!(surface.bitmaps.len(), 2);
        assert_eq!(stack.document_under(Point::new(50.0, 50.0)), Some(0));
        assert_eq!(stack.document_under(Point::new(50.0, 150.0)), Some(1));
        // Inside the inter-document margin.
        assert_eq!(stack.document_under(Point::new(50.0, 115.0)), None);
    }

    #[test]
    fn empty_stack_layout_falls_back_to_unit_scale() {
        let mut stack = DocumentStack::new();
        assert_eq!(stack.layout(Size::new(400.0, 600.0)), 1.0);
        assert!(stack.is_empty());
    }
}
