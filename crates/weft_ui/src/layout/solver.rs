//! Two-pass layout over a control tree.

use super::{Direction, FlowItem, Layout, Rect, Size, Sizing};
use crate::state::{ControlStore, ScrollState};
use crate::style::Style;
use crate::text::{TextMeasurer, TextRun};
use crate::widget::{Control, ControlFlags, ControlKind, ControlTree};

/// Measures and arranges a [`ControlTree`].
///
/// Holds scratch buffers only; reusing one solver across frames avoids
/// per-frame allocation.
#[derive(Debug, Default)]
pub struct LayoutSolver {
    children: Vec<usize>,
    items: Vec<FlowItem>,
    rects: Vec<Rect>,
}

impl LayoutSolver {
    /// Creates a solver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: Vec::with_capacity(64),
            items: Vec::with_capacity(64),
            rects: Vec::with_capacity(64),
        }
    }

    /// Measure pass, leaf to root.
    ///
    /// Children always sit at higher indices than their parent, so walking the
    /// arena backwards visits every child before its container.
    pub fn measure(
        &mut self,
        tree: &mut ControlTree,
        store: &ControlStore,
        style: &Style,
        measurer: &dyn TextMeasurer,
    ) {
        for index in (0..tree.len()).rev() {
            let content = if tree.nodes()[index].kind.is_container() {
                self.collect(tree, index);
                container_layout(&tree.nodes()[index], style).measure(&self.items)
            } else {
                intrinsic_size(tree, &tree.nodes()[index], store, style, measurer)
            };

            let node = &mut tree.nodes_mut()[index];
            node.content = content;
            node.measured = if node.kind == ControlKind::ScrollView {
                // A fill-sized viewport asks for nothing; it takes what is left.
                Size::new(
                    viewport_extent(node.width, content.width),
                    viewport_extent(node.height, content.height),
                )
            } else {
                Size::new(node.width.resolve(content.width), node.height.resolve(content.height))
            };
        }
    }

    /// Arrange pass, root to leaf.
    ///
    /// The root takes `viewport`. Scroll views lay their children out over the
    /// full content extent, shifted by the clamped offset from `store`, and
    /// clip them to the viewport. Every control's final size is cached in
    /// `store` as next frame's size hint.
    pub fn arrange(
        &mut self,
        tree: &mut ControlTree,
        store: &mut ControlStore,
        viewport: Rect,
        style: &Style,
    ) {
        if let Some(root) = tree.nodes_mut().first_mut() {
            root.rect = viewport;
            root.clip = Some(viewport);
        }

        for index in 0..tree.len() {
            let node = &tree.nodes()[index];
            store.set_size_hint(node.id, node.rect.size());
            if !node.kind.is_container() {
                continue;
            }

            let (bounds, clip) = if node.kind == ControlKind::ScrollView {
                let view = node.rect;
                let scroll = store.scroll_mut(node.id, ScrollState::default);
                scroll.set_extents(node.content, view.size());
                let (ox, oy) = scroll.offset();
                let bounds = Rect::new(
                    view.x - ox,
                    view.y - oy,
                    node.content.width.max(view.width),
                    node.content.height.max(view.height),
                );
                let clip = match node.clip {
                    Some(outer) => outer
                        .intersection(&view)
                        .unwrap_or(Rect::new(view.x, view.y, 0.0, 0.0)),
                    None => view,
                };
                (bounds, Some(clip))
            } else {
                (node.rect, node.clip)
            };

            let layout = container_layout(node, style);
            self.collect(tree, index);
            self.rects.clear();
            layout.arrange(bounds, &self.items, &mut self.rects);

            let nodes = tree.nodes_mut();
            for (&child, &rect) in self.children.iter().zip(&self.rects) {
                nodes[child].rect = rect;
                nodes[child].clip = clip;
            }
        }
    }

    /// Fills the scratch buffers with the children of `index`.
    fn collect(&mut self, tree: &ControlTree, index: usize) {
        let direction = tree.nodes()[index].kind.direction();
        self.children.clear();
        self.items.clear();
        for child in tree.children(index) {
            let control = &tree.nodes()[child];
            let (main, cross) = match direction {
                Direction::Horizontal => (control.width, control.height),
                Direction::Vertical => (control.height, control.width),
            };
            self.children.push(child);
            self.items.push(FlowItem {
                measured: control.measured,
                main,
                cross,
                align: control.align,
            });
        }
    }
}

fn container_layout(node: &Control, style: &Style) -> Layout {
    Layout::new(node.kind.direction())
        .with_gap(node.spacing)
        .with_padding(style.container_padding)
}

fn viewport_extent(sizing: Sizing, content: f32) -> f32 {
    match sizing {
        Sizing::Fill(_) => 0.0,
        other => other.resolve(content),
    }
}

/// Wrap width for a wrapping text control: its fixed width, or for fill
/// width the width it was arranged at last frame.
fn wrap_width(control: &Control, store: &ControlStore) -> f32 {
    if !control.flags.has(ControlFlags::WRAP) {
        return 0.0;
    }
    match control.width {
        Sizing::Fixed(width) => width.max(0.0),
        Sizing::Fill(_) => store.size_hint(control.id).map_or(0.0, |hint| hint.width),
        Sizing::Fit => 0.0,
    }
}

/// Content size of a leaf control.
fn intrinsic_size(
    tree: &ControlTree,
    control: &Control,
    store: &ControlStore,
    style: &Style,
    measurer: &dyn TextMeasurer,
) -> Size {
    let label = tree.label(control);
    let text = |wrap_width: f32| {
        measurer.measure(&TextRun {
            font: style.font,
            line_height: style.line_height,
            text: label,
            wrap_width,
        })
    };
    let pad = style.padding.max(0.0) * 2.0;

    match control.kind {
        ControlKind::Text => text(wrap_width(control, store)),
        ControlKind::Image => control.image.map_or(Size::ZERO, |image| image.size),
        ControlKind::Button | ControlKind::Selectable => {
            let size = text(0.0);
            Size::new(size.width + pad, size.height + pad)
        }
        ControlKind::Checkbox | ControlKind::Radio => {
            let size = if label.is_empty() { Size::ZERO } else { text(0.0) };
            let gap = if label.is_empty() { 0.0 } else { style.spacing };
            Size::new(
                style.check_size + gap + size.width,
                style.check_size.max(size.height),
            )
        }
        ControlKind::Slider => Size::new(
            style.slider_width,
            style.line_height.max(style.check_size) + pad,
        ),
        ControlKind::TextBox => Size::new(style.text_box_width, style.line_height + pad),
        ControlKind::Spacer
        | ControlKind::Root
        | ControlKind::Row
        | ControlKind::Column
        | ControlKind::ScrollView => Size::ZERO,
    }
}
