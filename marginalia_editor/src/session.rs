// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing editor session.

use std::fmt;
use std::path::PathBuf;

use kurbo::{Point, Size};
use log::{info, warn};
use marginalia_curve::{Curve, StrokeStyle};
use marginalia_document::{
    Document, ExportBackend, ExportError, LoadError, RasterBackend, SaveOptions, Surface,
};
use marginalia_viewport::{
    DocumentStack, GestureAction, GestureTracker, RenderGeneration, TouchEvent, ViewportState,
};
use rayon::prelude::*;

use crate::options::EditorOptions;

/// A document that failed to load while the rest of the stack continued.
#[derive(Debug)]
pub struct LoadFailure {
    /// Index into [`EditorOptions::file_paths`].
    pub index: usize,
    /// The path that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub error: LoadError,
}

/// Result of a [`EditorSession::save`] call.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Every document exported; output paths in stack order.
    Saved(Vec<PathBuf>),
    /// At least one export failed; all in-flight exports were allowed to
    /// finish before reporting. Curves are retained.
    Failed(Vec<(usize, ExportError)>),
}

impl SaveOutcome {
    /// Whether every document exported successfully.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// What single-pointer gestures do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    /// One finger pans the viewport.
    Scroll,
    /// One finger draws.
    Draw,
}

/// Callback fired once per save with the outcome.
pub type SaveCallback = Box<dyn Fn(&SaveOutcome) + Send>;

/// An open annotation session over a stack of documents.
///
/// The session wires the crates together: it loads the stack, routes touch
/// events through the gesture tracker into either the viewport transform or
/// the active curve, owns the cross-document undo stack, and fans saves out
/// across documents. Hosts drive it with [`handle_touch`] and redraw whenever
/// a call reports the frame is stale.
///
/// [`handle_touch`]: EditorSession::handle_touch
pub struct EditorSession {
    options: EditorOptions,
    stack: DocumentStack,
    viewport: ViewportState,
    tracker: GestureTracker,
    mode: InteractionMode,
    /// Document index per stroke, most recent last.
    undo_stack: Vec<usize>,
    failures: Vec<LoadFailure>,
    generation: RenderGeneration,
    /// Anchor for single-finger panning in scroll mode.
    pan_anchor: Option<Point>,
    save_options: SaveOptions,
    on_save: Option<SaveCallback>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("documents", &self.stack.len())
            .field("mode", &self.mode)
            .field("viewport", &self.viewport)
            .field("undo_depth", &self.undo_stack.len())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Loads every source in `options.file_paths` and builds the stack.
    ///
    /// A document that fails to load is skipped and recorded in
    /// [`load_failures`]; the rest of the stack still comes up.
    ///
    /// [`load_failures`]: EditorSession::load_failures
    pub fn new<B: RasterBackend>(options: EditorOptions, backend: &mut B) -> Self {
        let mut stack = DocumentStack::new();
        let mut failures = Vec::new();
        for (index, path) in options.file_paths.iter().enumerate() {
            match Document::create(path, backend) {
                Ok(document) => stack.push(document),
                Err(error) => {
                    warn!("skipping '{}': {error}", path.display());
                    failures.push(LoadFailure {
                        index,
                        path: path.clone(),
                        error,
                    });
                }
            }
        }
        info!(
            "session opened with {} of {} documents",
            stack.len(),
            options.file_paths.len()
        );
        let mode = if options.start_with_edit {
            InteractionMode::Draw
        } else {
            InteractionMode::Scroll
        };
        Self {
            options,
            stack,
            viewport: ViewportState::new(),
            tracker: GestureTracker::new(),
            mode,
            undo_stack: Vec::new(),
            failures,
            generation: RenderGeneration::new(),
            pan_anchor: None,
            save_options: SaveOptions::default(),
            on_save: None,
        }
    }

    /// Documents that were skipped during load.
    #[must_use]
    pub fn load_failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// The loaded document stack.
    #[must_use]
    pub fn stack(&self) -> &DocumentStack {
        &self.stack
    }

    /// The current viewport transform.
    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// The current single-pointer interaction mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// The session options as supplied by the host.
    #[must_use]
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// How exported files are named.
    pub fn set_output_naming(&mut self, naming: marginalia_document::OutputNaming) {
        self.save_options.naming = naming;
    }

    /// Registers the callback fired once per [`save`] call.
    ///
    /// [`save`]: EditorSession::save
    pub fn set_on_save(&mut self, callback: SaveCallback) {
        self.on_save = Some(callback);
    }

    /// Marker for the transform state a render pass captures.
    ///
    /// Hosts that rasterize off-thread compare this against
    /// [`is_generation_current`] at completion and discard stale frames.
    ///
    /// [`is_generation_current`]: EditorSession::is_generation_current
    #[must_use]
    pub fn render_generation(&self) -> u64 {
        self.generation.current()
    }

    /// Whether a previously captured generation still reflects the transform.
    #[must_use]
    pub fn is_generation_current(&self, generation: u64) -> bool {
        self.generation.is_current(generation)
    }

    /// Switches single-pointer gestures to panning.
    ///
    /// Any in-progress stroke is closed.
    pub fn scroll_action(&mut self) {
        self.stack.close_all_drawings();
        self.mode = InteractionMode::Scroll;
    }

    /// Switches single-pointer gestures to drawing.
    pub fn draw_action(&mut self) {
        self.mode = InteractionMode::Draw;
    }

    /// Adopts a measured viewport size: lays the stack out, re-fits the zoom
    /// bounds, and invalidates cached renders.
    pub fn set_viewport_size<B: RasterBackend>(&mut self, size: Size, backend: &mut B) {
        self.viewport.set_viewport_size(size);
        let fit = self.stack.layout(size);
        self.viewport.set_min_scale(fit);
        self.viewport.clamp_pan(self.content_size());
        self.stack.reset_all(backend);
        self.generation.bump();
    }

    /// Feeds one touch event through the gesture tracker.
    ///
    /// Returns `true` when the frame is stale and the host should redraw.
    pub fn handle_touch(&mut self, event: TouchEvent) -> bool {
        match self.tracker.handle(event) {
            GestureAction::None => false,
            GestureAction::BeginStroke { start, position } => match self.mode {
                InteractionMode::Draw => {
                    self.begin_stroke(start, position);
                    true
                }
                InteractionMode::Scroll => {
                    self.pan_anchor = Some(start);
                    self.pan_to(position)
                }
            },
            GestureAction::ExtendStroke { position } => match self.mode {
                InteractionMode::Draw => {
                    self.stack.draw_on_documents(position, self.viewport.scale());
                    true
                }
                InteractionMode::Scroll => self.pan_to(position),
            },
            GestureAction::Pinch {
                midpoint,
                scale_delta,
                translation,
            } => {
                let changed = self.viewport.pinch_update(
                    midpoint,
                    scale_delta,
                    translation,
                    self.content_size(),
                );
                if changed {
                    self.generation.bump();
                }
                changed
            }
            GestureAction::EndStroke { refresh } => {
                self.stack.close_all_drawings();
                self.pan_anchor = None;
                if refresh {
                    self.generation.bump();
                }
                // Closed strokes composite at full opacity, so the frame is
                // stale even without a bitmap refresh.
                true
            }
        }
    }

    /// Renders one frame: background fill, pages, then curves.
    ///
    /// `refresh` forces page bitmaps to re-rasterize at the current scale.
    pub fn render<S: Surface, B: RasterBackend>(
        &mut self,
        surface: &mut S,
        backend: &mut B,
        refresh: bool,
    ) {
        surface.clear(self.options.view_background_color);
        self.stack.render(
            surface,
            backend,
            self.viewport.scale(),
            self.viewport.pan(),
            self.viewport.viewport_size(),
            refresh,
        );
    }

    /// Removes the most recent stroke, regardless of which document holds it.
    ///
    /// No-op when nothing is left to undo.
    pub fn undo(&mut self) {
        if let Some(index) = self.undo_stack.pop() {
            if let Some(document) = self.stack.get_mut(index) {
                document.undo();
            }
        }
    }

    /// Removes every stroke from every document.
    pub fn clear(&mut self) {
        for document in self.stack.iter_mut() {
            document.clear();
        }
        self.undo_stack.clear();
    }

    /// Exports every document with its closed strokes burned in.
    ///
    /// Per-document exports run concurrently and all run to completion; one
    /// failure fails the whole save but loses no curves. On success the page
    /// caches are flushed so the next render reflects the written files.
    pub fn save<B: RasterBackend, E: ExportBackend>(
        &mut self,
        output_dir: &std::path::Path,
        exporter: &E,
        backend: &mut B,
    ) -> SaveOutcome {
        let documents: Vec<&Document> = self.stack.iter().collect();
        let results: Vec<Result<PathBuf, ExportError>> = documents
            .par_iter()
            .map(|document| document.save(output_dir, &self.save_options, exporter))
            .collect();
        let mut paths = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(path) => paths.push(path),
                Err(error) => errors.push((index, error)),
            }
        }
        let outcome = if errors.is_empty() {
            self.stack.reset_all(backend);
            self.generation.bump();
            SaveOutcome::Saved(paths)
        } else {
            for (index, error) in &errors {
                warn!("export of document {index} failed: {error}");
            }
            SaveOutcome::Failed(errors)
        };
        if let Some(callback) = &self.on_save {
            callback(&outcome);
        }
        outcome
    }

    /// Releases backend resources for every document and empties the stack.
    pub fn release<B: RasterBackend>(&mut self, backend: &mut B) {
        self.stack.release_all(backend);
        self.undo_stack.clear();
    }

    fn content_size(&self) -> Size {
        self.stack.extents()
    }

    fn begin_stroke(&mut self, start: Point, position: Point) {
        // Divide out the zoom so the stroke keeps its on-page weight
        // regardless of the scale it was drawn at.
        let width = self.options.line_width * self.viewport.min_scale() / self.viewport.scale();
        let style = StrokeStyle::new(width, self.options.line_color);
        if let Some(index) = self.stack.add_drawing(start, Curve::new(style)) {
            self.undo_stack.push(index);
            self.stack.draw_on_documents(start, self.viewport.scale());
            self.stack.draw_on_documents(position, self.viewport.scale());
        }
    }

    fn pan_to(&mut self, position: Point) -> bool {
        let Some(anchor) = self.pan_anchor else {
            return false;
        };
        let delta = position - anchor;
        self.pan_anchor = Some(position);
        if delta.hypot() == 0.0 {
            return false;
        }
        self.viewport.pan_by(delta, self.content_size());
        self.generation.bump();
        true
    }
}
