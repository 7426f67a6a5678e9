//! Row/column flow: measuring and arranging one container's children.

use super::{Alignment, Direction, Rect, Size, Sizing};

/// One child as seen by its container's flow.
#[derive(Debug, Clone, Copy)]
pub struct FlowItem {
    /// Measured size from the measure pass.
    pub measured: Size,
    /// Sizing along the container's flow axis.
    pub main: Sizing,
    /// Sizing across the container's flow axis.
    pub cross: Sizing,
    /// Cross-axis alignment.
    pub align: Alignment,
}

impl FlowItem {
    /// A child with a fixed measured size, aligned to start.
    #[must_use]
    pub const fn fixed(measured: Size) -> Self {
        Self {
            measured,
            main: Sizing::Fit,
            cross: Sizing::Fit,
            align: Alignment::Start,
        }
    }
}

/// Flow parameters of a row or column.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Flow axis.
    pub direction: Direction,
    /// Gap between consecutive children.
    pub gap: f32,
    /// Padding around content.
    pub padding: f32,
}

impl Layout {
    /// Creates a layout flowing along `direction` with no gap or padding.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            gap: 0.0,
            padding: 0.0,
        }
    }

    /// Sets the gap between elements.
    #[must_use]
    pub const fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Sets padding around content.
    #[must_use]
    pub const fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    fn total_gap(&self, count: usize) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let gaps = count.saturating_sub(1) as f32;
        self.gap.max(0.0) * gaps
    }

    /// Content size of a container holding `items`: sum along the flow axis,
    /// max across it, plus gaps and padding.
    #[must_use]
    pub fn measure(&self, items: &[FlowItem]) -> Size {
        let dir = self.direction;
        let main: f32 = items.iter().map(|item| item.measured.main(dir)).sum();
        let cross = items
            .iter()
            .map(|item| item.measured.cross(dir))
            .fold(0.0_f32, f32::max);
        let pad = self.padding.max(0.0) * 2.0;
        Size::from_axes(dir, main + self.total_gap(items.len()) + pad, cross + pad)
    }

    /// Lays out `items` within `bounds`, appending one rect per item to `out`.
    ///
    /// Non-fill children get their measured flow extent; fill children split
    /// whatever is left (never below zero) in proportion to their weights.
    pub fn arrange(&self, bounds: Rect, items: &[FlowItem], out: &mut Vec<Rect>) {
        if items.is_empty() {
            return;
        }

        let dir = self.direction;
        let content = bounds.shrink(self.padding.max(0.0));
        let main_extent = content.size().main(dir);
        let cross_extent = content.size().cross(dir);
        let gap = self.gap.max(0.0);

        let mut fixed_total = 0.0;
        let mut fill_weight = 0.0;
        for item in items {
            match item.main.fill_weight() {
                Some(weight) => fill_weight += weight,
                None => fixed_total += item.measured.main(dir),
            }
        }
        let remaining = (main_extent - fixed_total - self.total_gap(items.len())).max(0.0);

        let (main_start, cross_start) = match dir {
            Direction::Horizontal => (content.x, content.y),
            Direction::Vertical => (content.y, content.x),
        };

        let mut cursor = main_start;
        for item in items {
            let main = match item.main.fill_weight() {
                Some(weight) if fill_weight > 0.0 => remaining * weight / fill_weight,
                Some(_) => 0.0,
                None => item.measured.main(dir),
            };

            let stretch = item.align == Alignment::Stretch || item.cross.fill_weight().is_some();
            let cross = if stretch {
                cross_extent
            } else {
                item.measured.cross(dir)
            };
            let cross_pos = match item.align {
                Alignment::Start | Alignment::Stretch => cross_start,
                Alignment::Center => cross_start + (cross_extent - cross) * 0.5,
                Alignment::End => cross_start + cross_extent - cross,
            };

            let rect = match dir {
                Direction::Horizontal => Rect::new(cursor, cross_pos, main, cross),
                Direction::Vertical => Rect::new(cross_pos, cursor, cross, main),
            };
            out.push(rect);
            cursor += main + gap;
        }
    }
}
