//! Numeric style parameters and scoped layout overrides.
//!
//! Style is plain data handed in by the caller. Layout overrides are pushed
//! for the duration of a scope and resolve to the nearest enclosing value.

use serde::{Deserialize, Serialize};

use crate::layout::{Alignment, Sizing};
use crate::text::FontId;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns true if painting this color would change nothing.
    #[must_use]
    pub fn is_invisible(self) -> bool {
        self.a <= 0.0
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Numeric style parameters shared by every control of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Inset of button/text-box content.
    pub padding: f32,
    /// Inset of row/column/scroll-view content.
    pub container_padding: f32,
    /// Default gap between container children.
    pub spacing: f32,
    /// Font used for every text run.
    pub font: FontId,
    /// Line height passed to the text measurer.
    pub line_height: f32,
    /// Text color.
    pub text: Color,
    /// Button background at rest.
    pub button: Color,
    /// Button background under the pointer.
    pub button_hovered: Color,
    /// Button background while pressed.
    pub button_pressed: Color,
    /// Background of the control holding keyboard focus.
    pub focused: Color,
    /// Check marks, slider thumbs, text cursor.
    pub accent: Color,
    /// Slider track, checkbox/radio box.
    pub track: Color,
    /// Text box background.
    pub text_box: Color,
    /// Text selection highlight.
    pub selection: Color,
    /// Scroll-view background.
    pub scroll_background: Color,
    /// Scrollbar thumb.
    pub scrollbar: Color,
    /// Scrollbar thickness.
    pub scrollbar_width: f32,
    /// Side of the checkbox/radio box.
    pub check_size: f32,
    /// Default slider width.
    pub slider_width: f32,
    /// Slider thumb width.
    pub slider_thumb_width: f32,
    /// Default text-box width.
    pub text_box_width: f32,
    /// Text cursor width.
    pub cursor_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            padding: 4.0,
            container_padding: 0.0,
            spacing: 4.0,
            font: FontId(0),
            line_height: 16.0,
            text: Color::rgba(0.9, 0.9, 0.9, 1.0),
            button: Color::rgba(0.12, 0.12, 0.16, 1.0),
            button_hovered: Color::rgba(0.18, 0.18, 0.24, 1.0),
            button_pressed: Color::rgba(0.08, 0.08, 0.1, 1.0),
            focused: Color::rgba(0.16, 0.22, 0.3, 1.0),
            accent: Color::rgba(0.3, 0.7, 1.0, 1.0),
            track: Color::rgba(0.2, 0.2, 0.25, 1.0),
            text_box: Color::rgba(0.05, 0.05, 0.08, 1.0),
            selection: Color::rgba(0.3, 0.5, 0.8, 0.5),
            scroll_background: Color::TRANSPARENT,
            scrollbar: Color::rgba(0.4, 0.4, 0.45, 0.8),
            scrollbar_width: 6.0,
            check_size: 14.0,
            slider_width: 160.0,
            slider_thumb_width: 10.0,
            text_box_width: 160.0,
            cursor_width: 1.0,
        }
    }
}

/// One scope's worth of layout overrides. `None` fields inherit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutOverride {
    /// Width sizing.
    pub width: Option<Sizing>,
    /// Height sizing.
    pub height: Option<Sizing>,
    /// Cross-axis alignment within the parent.
    pub align: Option<Alignment>,
    /// Gap between children of containers declared in scope.
    pub spacing: Option<f32>,
}

impl LayoutOverride {
    /// An override that changes nothing.
    pub const NONE: Self = Self {
        width: None,
        height: None,
        align: None,
        spacing: None,
    };

    /// Overrides width.
    #[must_use]
    pub const fn width(mut self, width: Sizing) -> Self {
        self.width = Some(width);
        self
    }

    /// Overrides height.
    #[must_use]
    pub const fn height(mut self, height: Sizing) -> Self {
        self.height = Some(height);
        self
    }

    /// Overrides alignment.
    #[must_use]
    pub const fn align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    /// Overrides spacing.
    #[must_use]
    pub const fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Fields of `inner` win; unset fields fall back to `self`.
    #[must_use]
    pub fn merged_with(self, inner: Self) -> Self {
        Self {
            width: inner.width.or(self.width),
            height: inner.height.or(self.height),
            align: inner.align.or(self.align),
            spacing: inner.spacing.or(self.spacing),
        }
    }
}

/// LIFO stack of layout overrides.
///
/// Each entry stores the already-merged result, so resolving the effective
/// override is O(1) regardless of depth.
#[derive(Debug, Clone, Default)]
pub struct OverrideStack {
    resolved: Vec<LayoutOverride>,
}

impl OverrideStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolved: Vec::with_capacity(16),
        }
    }

    /// Pushes an override and returns the depth to restore on scope exit.
    pub fn push(&mut self, layer: LayoutOverride) -> usize {
        let depth = self.resolved.len();
        let merged = self.effective().merged_with(layer);
        self.resolved.push(merged);
        depth
    }

    /// Restores the stack to `depth`, dropping everything pushed since.
    pub fn restore(&mut self, depth: usize) {
        self.resolved.truncate(depth);
    }

    /// Current depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.resolved.len()
    }

    /// Empties the stack.
    pub fn clear(&mut self) {
        self.resolved.clear();
    }

    /// Nearest enclosing value for every field.
    #[must_use]
    pub fn effective(&self) -> LayoutOverride {
        self.resolved.last().copied().unwrap_or(LayoutOverride::NONE)
    }
}
