// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global scale and pan state.

use kurbo::{Point, Size, Vec2};

/// Upper zoom bound, as a multiple of the fit scale.
pub const MAX_SCALE: f64 = 5.0;

/// Incremental scale deltas within `1.0 ±` this value are sensor noise.
const SCALE_NOISE_EPSILON: f64 = 0.01;

/// Incremental per-axis translations below this are sensor noise.
const PAN_NOISE_THRESHOLD: f64 = 1.0;

/// Scroll/zoom state of the whole document stack.
///
/// `ViewportState` composes incremental two-finger gesture deltas into a
/// global uniform scale and a pan offset. Scale is clamped to
/// `[min_scale, MAX_SCALE * min_scale]` where `min_scale` is the fit scale
/// established at first layout; pan is clamped per axis after every update so
/// the content stack never scrolls fully out of view.
///
/// The state has a single logical owner: transform composition is
/// order-dependent (each update reads `previous_scale` and the pan written by
/// the immediately preceding event), so concurrent writers are a design
/// error, not a data race to engineer around.
#[derive(Clone, Debug)]
pub struct ViewportState {
    scale: f64,
    previous_scale: f64,
    min_scale: f64,
    pan: Vec2,
    viewport_size: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Creates a viewport at fit scale with no pan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            previous_scale: 1.0,
            min_scale: 1.0,
            pan: Vec2::ZERO,
            viewport_size: Size::ZERO,
        }
    }

    /// Current global scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale value before the most recent scale mutation.
    #[must_use]
    pub fn previous_scale(&self) -> f64 {
        self.previous_scale
    }

    /// The fit scale acting as the lower zoom bound.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Current pan offset in viewport pixels.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Last measured container size.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Records the measured container size.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Adopts the fit scale computed at layout time.
    ///
    /// Layout re-fits the view: the scale snaps to the new fit and the
    /// incremental-gesture baseline resets to it.
    pub fn set_min_scale(&mut self, min_scale: f64) {
        debug_assert!(min_scale > 0.0, "fit scale must be positive");
        self.min_scale = min_scale;
        self.scale = min_scale;
        self.previous_scale = self.scale;
    }

    /// Sets the global scale, clamped into `[min_scale, MAX_SCALE * min_scale]`.
    ///
    /// The pre-mutation value is retained as [`ViewportState::previous_scale`].
    pub fn set_scale(&mut self, scale: f64) {
        self.previous_scale = self.scale;
        self.scale = scale.clamp(self.min_scale, MAX_SCALE * self.min_scale);
    }

    /// Applies one incremental two-finger update anchored at `midpoint`.
    ///
    /// `scale_delta` is the ratio of the current to the previous inter-finger
    /// distance and `translation` the midpoint movement since the previous
    /// event. `content` is the stack's layout-space extent (margins
    /// included), used for pan clamping.
    ///
    /// Scaling is pinned under the gesture: with effective ratio `r`
    /// (post-clamp), the new pan is `pan * r + midpoint * (1 - r) +
    /// translation`, which keeps the content point under `midpoint`
    /// stationary before the translation applies.
    ///
    /// Returns `false` without touching any state when the update is within
    /// the noise gate (scale delta within `1 ± 0.01` and translation under
    /// one pixel per axis).
    pub fn pinch_update(
        &mut self,
        midpoint: Point,
        scale_delta: f64,
        translation: Vec2,
        content: Size,
    ) -> bool {
        if (scale_delta - 1.0).abs() <= SCALE_NOISE_EPSILON
            && translation.x.abs() < PAN_NOISE_THRESHOLD
            && translation.y.abs() < PAN_NOISE_THRESHOLD
        {
            return false;
        }
        let old_scale = self.scale;
        self.set_scale(old_scale * scale_delta);
        // The effective ratio accounts for clamping; a clamped zoom must not
        // shift the anchor either.
        let ratio = self.scale / old_scale;
        self.pan = self.pan * ratio + midpoint.to_vec2() * (1.0 - ratio) + translation;
        self.clamp_pan(content);
        true
    }

    /// Pans by a raw delta in viewport pixels (single-finger scroll mode).
    pub fn pan_by(&mut self, delta: Vec2, content: Size) {
        self.pan += delta;
        self.clamp_pan(content);
    }

    /// Clamps the pan so the scaled content never leaves the viewport.
    ///
    /// Per axis the valid range is `[viewport - content * scale, 0]`; when
    /// the scaled content is smaller than the viewport the range degenerates
    /// and the pan pins to the near (zero) edge.
    pub fn clamp_pan(&mut self, content: Size) {
        let low_x = self.viewport_size.width - content.width * self.scale;
        let low_y = self.viewport_size.height - content.height * self.scale;
        self.pan.x = self.pan.x.max(low_x).min(0.0);
        self.pan.y = self.pan.y.max(low_y).min(0.0);
    }

    /// Resets scale and pan to the fit state.
    pub fn reset(&mut self) {
        self.scale = self.min_scale;
        self.previous_scale = self.min_scale;
        self.pan = Vec2::ZERO;
    }
}

/// Monotonic counter distinguishing superseded render requests.
///
/// Rendering may be offloaded to a background worker, but a completed render
/// only counts if its generation is still current: a fresh transform update
/// bumps the generation, implicitly cancelling any in-flight render for an
/// older viewport state.
#[derive(Clone, Debug, Default)]
pub struct RenderGeneration {
    current: u64,
}

impl RenderGeneration {
    /// Creates a generation counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest issued generation.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Starts a new render request, superseding all earlier ones.
    pub fn bump(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    /// Whether a completed render for `generation` may still be presented.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::{RenderGeneration, ViewportState, MAX_SCALE};

    fn viewport_500x1000_fit_half() -> ViewportState {
        let mut vp = ViewportState::new();
        vp.set_viewport_size(Size::new(500.0, 1000.0));
        vp.set_min_scale(0.5);
        vp
    }

    #[test]
    fn scale_stays_clamped_under_any_delta_sequence() {
        let mut vp = viewport_500x1000_fit_half();
        let content = Size::new(1000.0, 2000.0);
        let m = Point::new(250.0, 500.0);
        for delta in [3.0, 3.0, 0.1, 0.1, 0.1, 10.0, 0.02, 4.0, 0.5] {
            vp.pinch_update(m, delta, Vec2::ZERO, content);
            assert!(
                vp.scale() >= vp.min_scale() - 1e-12
                    && vp.scale() <= MAX_SCALE * vp.min_scale() + 1e-12,
                "scale {} escaped the clamp range",
                vp.scale()
            );
        }
    }

    #[test]
    fn fit_scale_scenario_clamps_as_specified() {
        // 1000x2000 image in a 500x1000 viewport: fit scale 0.5. A pinch
        // from distance 100 to 150 is a 1.5 delta.
        let mut vp = viewport_500x1000_fit_half();
        let content = Size::new(1000.0, 2000.0);
        vp.pinch_update(Point::new(250.0, 500.0), 1.5, Vec2::ZERO, content);
        assert!(
            (vp.scale() - (1.5_f64 * 0.5).min(MAX_SCALE * 0.5)).abs() < 1e-12,
            "got {}",
            vp.scale()
        );
        assert!((vp.previous_scale() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_pinned_under_the_midpoint() {
        let mut vp = viewport_500x1000_fit_half();
        let content = Size::new(2000.0, 4000.0);
        let midpoint = Point::new(250.0, 500.0);
        // Content point under the midpoint before the update.
        let world_before = (midpoint.to_vec2() - vp.pan()) / vp.scale();
        vp.pinch_update(midpoint, 1.5, Vec2::ZERO, content);
        let screen_after = world_before * vp.scale() + vp.pan();
        assert!(
            (screen_after.x - midpoint.x).abs() < 1e-9
                && (screen_after.y - midpoint.y).abs() < 1e-9,
            "anchor moved from {midpoint:?} to {screen_after:?}"
        );
    }

    #[test]
    fn pan_never_leaves_content_bounds() {
        let mut vp = viewport_500x1000_fit_half();
        let content = Size::new(1020.0, 4030.0);
        let m = Point::new(100.0, 100.0);
        for translation in [
            Vec2::new(-5000.0, -5000.0),
            Vec2::new(9000.0, 9000.0),
            Vec2::new(-37.0, 1500.0),
        ] {
            vp.pinch_update(m, 1.2, translation, content);
            let low_x = 500.0 - content.width * vp.scale();
            let low_y = 1000.0 - content.height * vp.scale();
            assert!(vp.pan().x <= 0.0 && vp.pan().x >= low_x.min(0.0), "x escaped");
            assert!(vp.pan().y <= 0.0 && vp.pan().y >= low_y.min(0.0), "y escaped");
        }
    }

    #[test]
    fn small_content_pins_to_near_edge() {
        let mut vp = viewport_500x1000_fit_half();
        // Scaled content smaller than the viewport on both axes.
        let content = Size::new(100.0, 100.0);
        vp.pan_by(Vec2::new(300.0, -300.0), content);
        assert_eq!(vp.pan(), Vec2::ZERO, "degenerate clamp range pins to zero");
    }

    #[test]
    fn noise_gated_updates_change_nothing() {
        let mut vp = viewport_500x1000_fit_half();
        let content = Size::new(1000.0, 2000.0);
        let before_scale = vp.scale();
        let before_pan = vp.pan();
        let applied = vp.pinch_update(
            Point::new(250.0, 500.0),
            1.005,
            Vec2::new(0.4, -0.7),
            content,
        );
        assert!(!applied, "jitter must be ignored");
        assert_eq!(vp.scale(), before_scale);
        assert_eq!(vp.pan(), before_pan);
    }

    #[test]
    fn set_min_scale_refits_the_view() {
        let mut vp = ViewportState::new();
        vp.set_viewport_size(Size::new(500.0, 1000.0));
        vp.set_scale(3.0);
        vp.set_min_scale(0.5);
        assert_eq!(vp.scale(), 0.5);
        assert_eq!(vp.previous_scale(), 0.5, "baseline resets with the fit");
    }

    #[test]
    fn stale_generations_are_rejected() {
        let mut generation = RenderGeneration::new();
        let first = generation.bump();
        let second = generation.bump();
        assert!(!generation.is_current(first), "superseded render discarded");
        assert!(generation.is_current(second));
    }
}
