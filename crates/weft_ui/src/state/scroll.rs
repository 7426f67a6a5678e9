//! Scroll-view state: offset, content size, viewport size.

use crate::layout::Size;

/// Persistent scroll position of one scroll view.
///
/// The offset is kept inside `[0, max(0, content - viewport)]` on both axes
/// after every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    offset: (f32, f32),
    content: Size,
    viewport: Size,
}

impl ScrollState {
    /// Current offset.
    #[must_use]
    pub const fn offset(&self) -> (f32, f32) {
        self.offset
    }

    /// Content size recorded by the last layout.
    #[must_use]
    pub const fn content(&self) -> Size {
        self.content
    }

    /// Viewport size recorded by the last layout.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Largest allowed offset on each axis.
    #[must_use]
    pub fn max_offset(&self) -> (f32, f32) {
        (
            (self.content.width - self.viewport.width).max(0.0),
            (self.content.height - self.viewport.height).max(0.0),
        )
    }

    /// Records new extents and re-clamps the offset.
    pub fn set_extents(&mut self, content: Size, viewport: Size) {
        self.content = content;
        self.viewport = viewport;
        self.set_offset(self.offset.0, self.offset.1);
    }

    /// Sets the offset, clamped. NaN becomes zero.
    pub fn set_offset(&mut self, x: f32, y: f32) {
        let (max_x, max_y) = self.max_offset();
        let clamp = |v: f32, max: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        self.offset = (clamp(x, max_x), clamp(y, max_y));
    }

    /// Moves the offset by a delta. Returns true if it changed.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) -> bool {
        let before = self.offset;
        self.set_offset(self.offset.0 + dx, self.offset.1 + dy);
        before != self.offset
    }

    /// Fraction of the content visible, per axis (1.0 when it all fits).
    #[must_use]
    pub fn visible_fraction(&self) -> (f32, f32) {
        let fraction = |view: f32, content: f32| {
            if content <= 0.0 || view >= content {
                1.0
            } else {
                (view / content).max(0.0)
            }
        };
        (
            fraction(self.viewport.width, self.content.width),
            fraction(self.viewport.height, self.content.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_stays_in_range() {
        let contents = [0.0, 50.0, 100.0, 150.0, 1000.0];
        let viewports = [0.0, 10.0, 100.0, 400.0];
        let deltas = [-1e6, -37.0, -1.0, 0.0, 0.5, 13.0, 99.0, 1e6];

        for &content in &contents {
            for &viewport in &viewports {
                let mut state = ScrollState::default();
                state.set_extents(Size::new(content, content), Size::new(viewport, viewport));
                for &delta in &deltas {
                    state.scroll_by(delta, -delta);
                    let max = (content - viewport).max(0.0);
                    let (x, y) = state.offset();
                    assert!((0.0..=max).contains(&x), "x={x} max={max}");
                    assert!((0.0..=max).contains(&y), "y={y} max={max}");
                }
            }
        }
    }

    #[test]
    fn test_small_content_forces_zero() {
        let mut state = ScrollState::default();
        state.set_extents(Size::new(100.0, 400.0), Size::new(100.0, 200.0));
        state.set_offset(0.0, 150.0);
        assert_eq!(state.offset(), (0.0, 150.0));

        // Content shrinks below the viewport.
        state.set_extents(Size::new(100.0, 50.0), Size::new(100.0, 200.0));
        assert_eq!(state.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_nan_offset_is_zero() {
        let mut state = ScrollState::default();
        state.set_extents(Size::new(10.0, 500.0), Size::new(10.0, 100.0));
        state.set_offset(f32::NAN, f32::NAN);
        assert_eq!(state.offset(), (0.0, 0.0));
    }
}
