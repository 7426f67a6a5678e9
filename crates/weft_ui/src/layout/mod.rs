//! Layout system for control positioning.
//!
//! Two passes per window per frame:
//! 1. **Measure** (leaf to root) - intrinsic size of every control
//! 2. **Arrange** (root to leaf) - containers split their rectangle among children
//!
//! All sizes and positions are `f32`. Negative sizes are clamped to zero.

mod flow;
mod solver;

pub use flow::{FlowItem, Layout};
pub use solver::LayoutSolver;

use serde::{Deserialize, Serialize};

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrinks the rectangle by the given amount on all sides, never below zero size.
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        let width = (self.width - amount * 2.0).max(0.0);
        let height = (self.height - amount * 2.0).max(0.0);
        Self::new(self.x + amount, self.y + amount, width, height)
    }
}

/// A width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the extent along `direction`.
    #[must_use]
    pub const fn main(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    /// Returns the extent across `direction`.
    #[must_use]
    pub const fn cross(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.height,
            Direction::Vertical => self.width,
        }
    }

    /// Builds a size from main/cross extents.
    #[must_use]
    pub const fn from_axes(direction: Direction, main: f32, cross: f32) -> Self {
        match direction {
            Direction::Horizontal => Self::new(main, cross),
            Direction::Vertical => Self::new(cross, main),
        }
    }
}

/// How a control is sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Sizing {
    /// Sized by content: text extent, image pixels, or children.
    #[default]
    Fit,
    /// Exact size in pixels (negative values clamp to zero).
    Fixed(f32),
    /// Share of the parent's leftover space, proportional to the weight.
    Fill(f32),
}

impl Sizing {
    /// Equal-weight fill.
    pub const FILL: Self = Self::Fill(1.0);

    /// Returns the fill weight, or None if not fill-sized.
    #[must_use]
    pub fn fill_weight(self) -> Option<f32> {
        match self {
            Self::Fill(weight) => Some(weight.max(0.0)),
            _ => None,
        }
    }

    /// Resolves the measured extent given the content extent.
    #[must_use]
    pub fn resolve(self, content: f32) -> f32 {
        match self {
            Self::Fixed(size) => size.max(0.0),
            Self::Fit | Self::Fill(_) => content.max(0.0),
        }
    }
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right).
    #[default]
    Horizontal,
    /// Vertical (top to bottom).
    Vertical,
}

/// Cross-axis alignment of a child within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Align to start (left/top).
    #[default]
    Start,
    /// Align to center.
    Center,
    /// Align to end (right/bottom).
    End,
    /// Stretch to fill available space.
    Stretch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(50.0, 30.0));
        assert!(!rect.contains(5.0, 30.0));
        assert!(!rect.contains(50.0, 80.0));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);

        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
        assert_eq!(a.intersection(&Rect::new(200.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_shrink_never_negative() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0).shrink(5.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_sizing_resolve_clamps() {
        assert_eq!(Sizing::Fixed(-10.0).resolve(50.0), 0.0);
        assert_eq!(Sizing::Fixed(30.0).resolve(50.0), 30.0);
        assert_eq!(Sizing::Fit.resolve(50.0), 50.0);
        assert_eq!(Sizing::Fill(-1.0).fill_weight(), Some(0.0));
    }
}
