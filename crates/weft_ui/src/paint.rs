//! Paint pass: turns the arranged tree into batched quads.
//!
//! Controls are painted in arena order, which is declaration order with
//! every container before its children. A scroll view's scrollbar is painted
//! once its whole subtree is done, so it sits on top of the content.

use crate::layout::{Rect, Size};
use crate::render::Batcher;
use crate::router::Router;
use crate::state::ControlStore;
use crate::style::{Color, Style};
use crate::text::{Glyph, TextMeasurer, TextRun};
use crate::widget::{Control, ControlFlags, ControlKind, ControlTree, Interaction};

/// Everything the paint pass reads.
pub struct Painter<'a> {
    /// Arranged tree.
    pub tree: &'a ControlTree,
    /// Persistent state (toggles, values, text, scroll).
    pub store: &'a ControlStore,
    /// Routing results for hover/press/focus visuals.
    pub router: &'a Router,
    /// Colors and metrics.
    pub style: &'a Style,
    /// Glyph source.
    pub measurer: &'a dyn TextMeasurer,
}

impl Painter<'_> {
    /// Paints every control into `batcher`.
    pub fn paint(&self, batcher: &mut Batcher<'_>) {
        let nodes = self.tree.nodes();
        let mut open_views: Vec<usize> = Vec::new();

        for (index, control) in nodes.iter().enumerate() {
            while let Some(&view) = open_views.last() {
                if nodes[view].subtree_end > index {
                    break;
                }
                open_views.pop();
                self.scrollbars(&nodes[view], batcher);
            }

            batcher.set_clip(control.clip);
            self.control(control, batcher);
            if control.kind == ControlKind::ScrollView {
                open_views.push(index);
            }
        }

        while let Some(view) = open_views.pop() {
            self.scrollbars(&nodes[view], batcher);
        }
    }

    fn control(&self, control: &Control, batcher: &mut Batcher<'_>) {
        let style = self.style;
        let rect = control.rect;
        let label = self.tree.label(control);
        let interaction = self.router.response(control.id).interaction();
        let focused = self.router.focus().is_focused(control.id);

        match control.kind {
            ControlKind::Root | ControlKind::Row | ControlKind::Column | ControlKind::Spacer => {}
            ControlKind::ScrollView => batcher.solid(rect, style.scroll_background),
            ControlKind::Text => {
                let wrap = if control.flags.has(ControlFlags::WRAP) {
                    rect.width
                } else {
                    0.0
                };
                self.text(batcher, label, (rect.x, rect.y), wrap, style.text);
            }
            ControlKind::Image => {
                if let Some(image) = control.image {
                    batcher.textured(rect, image.uv, image.texture, Color::WHITE);
                }
            }
            ControlKind::Button => {
                let background = match interaction {
                    Interaction::Pressed => style.button_pressed,
                    Interaction::Hovered => style.button_hovered,
                    Interaction::Focused => style.focused,
                    Interaction::Idle => style.button,
                };
                batcher.solid(rect, background);
                let size = self.text_size(label);
                let (cx, cy) = rect.center();
                let origin = (cx - size.width * 0.5, cy - size.height * 0.5);
                self.text(batcher, label, origin, 0.0, style.text);
            }
            ControlKind::Checkbox | ControlKind::Radio => {
                let check = style.check_size;
                let mark = Rect::new(rect.x, rect.y + (rect.height - check) * 0.5, check, check);
                batcher.solid(mark, if focused { style.focused } else { style.track });

                let on = if control.kind == ControlKind::Checkbox {
                    self.store.toggle(control.id).copied().unwrap_or(false)
                } else {
                    self.is_selected(control)
                };
                if on {
                    batcher.solid(mark.shrink(check * 0.2), style.accent);
                }

                let size = self.text_size(label);
                let origin = (
                    mark.right() + style.spacing,
                    rect.y + (rect.height - size.height) * 0.5,
                );
                self.text(batcher, label, origin, 0.0, style.text);
            }
            ControlKind::Selectable => {
                if self.is_selected(control) {
                    batcher.solid(rect, style.selection);
                } else if matches!(interaction, Interaction::Hovered | Interaction::Pressed) {
                    batcher.solid(rect, style.button_hovered);
                } else if focused {
                    batcher.solid(rect, style.focused);
                }
                let size = self.text_size(label);
                let origin = (
                    rect.x + style.padding,
                    rect.y + (rect.height - size.height) * 0.5,
                );
                self.text(batcher, label, origin, 0.0, style.text);
            }
            ControlKind::Slider => {
                batcher.solid(rect, if focused { style.focused } else { style.track });
                let (min, max) = control.range;
                let value = self.store.value(control.id).copied().unwrap_or(min);
                let span = max - min;
                let t = if span.abs() > f32::EPSILON {
                    ((value - min) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let thumb = style.slider_thumb_width.min(rect.width).max(0.0);
                let x = rect.x + t * (rect.width - thumb);
                batcher.solid(Rect::new(x, rect.y, thumb, rect.height), style.accent);
            }
            ControlKind::TextBox => self.text_box(control, focused, batcher),
        }
    }

    fn text_box(&self, control: &Control, focused: bool, batcher: &mut Batcher<'_>) {
        let style = self.style;
        let rect = control.rect;
        batcher.solid(rect, if focused { style.focused } else { style.text_box });

        let inner = rect.shrink(style.padding);
        let clip = match control.clip {
            Some(outer) => outer.intersection(&inner),
            None => Some(inner),
        };
        batcher.set_clip(Some(clip.unwrap_or(Rect::new(inner.x, inner.y, 0.0, 0.0))));

        let Some(edit) = self.store.text_edit(control.id) else {
            return;
        };
        let text = edit.text();
        let origin = (inner.x, rect.y + (rect.height - style.line_height) * 0.5);

        if focused {
            if let Some(selection) = edit.selection() {
                let x0 = self.text_size(&text[..selection.start]).width;
                let x1 = self.text_size(&text[..selection.end]).width;
                batcher.solid(
                    Rect::new(origin.0 + x0, origin.1, x1 - x0, style.line_height),
                    style.selection,
                );
            }
        }
        self.text(batcher, text, origin, 0.0, style.text);
        if focused {
            let x = self.text_size(&text[..edit.cursor()]).width;
            batcher.solid(
                Rect::new(origin.0 + x, origin.1, style.cursor_width, style.line_height),
                style.accent,
            );
        }
        batcher.set_clip(control.clip);
    }

    fn scrollbars(&self, view: &Control, batcher: &mut Batcher<'_>) {
        let Some(scroll) = self.store.scroll(view.id) else {
            return;
        };
        let style = self.style;
        let rect = view.rect;
        let bar = style.scrollbar_width.max(0.0);
        let (fx, fy) = scroll.visible_fraction();
        let (ox, oy) = scroll.offset();
        let (mx, my) = scroll.max_offset();
        batcher.set_clip(view.clip);

        if fy < 1.0 && my > 0.0 {
            let length = (rect.height * fy).max(bar * 2.0).min(rect.height);
            let y = rect.y + (rect.height - length) * (oy / my);
            batcher.solid(Rect::new(rect.right() - bar, y, bar, length), style.scrollbar);
        }
        if fx < 1.0 && mx > 0.0 {
            let length = (rect.width * fx).max(bar * 2.0).min(rect.width);
            let x = rect.x + (rect.width - length) * (ox / mx);
            batcher.solid(Rect::new(x, rect.bottom() - bar, length, bar), style.scrollbar);
        }
    }

    fn is_selected(&self, control: &Control) -> bool {
        self.store.select(control.group) == Some(&Some(control.id))
    }

    fn text_size(&self, text: &str) -> Size {
        self.measurer.measure(&self.run(text, 0.0))
    }

    fn run<'t>(&self, text: &'t str, wrap_width: f32) -> TextRun<'t> {
        TextRun {
            font: self.style.font,
            line_height: self.style.line_height,
            text,
            wrap_width,
        }
    }

    fn text(
        &self,
        batcher: &mut Batcher<'_>,
        text: &str,
        origin: (f32, f32),
        wrap_width: f32,
        color: Color,
    ) {
        if text.is_empty() || color.is_invisible() {
            return;
        }
        let sink: &mut dyn FnMut(Glyph) =
            &mut |glyph: Glyph| batcher.textured(glyph.dst, glyph.uv, glyph.texture, color);
        self.measurer
            .measure_and_emit(&self.run(text, wrap_width), origin, Some(sink));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ControlId;
    use crate::layout::LayoutSolver;
    use crate::render::{AllResident, TextureId, WindowRender};
    use crate::state::ScrollState;
    use crate::text::MonospaceMeasurer;

    fn paint(tree: &mut ControlTree, store: &mut ControlStore) -> WindowRender {
        let style = Style::default();
        let measurer = MonospaceMeasurer::new(8.0, TextureId(7));
        let mut solver = LayoutSolver::new();
        tree.finish();
        solver.measure(tree, store, &style, &measurer);
        solver.arrange(tree, store, Rect::new(0.0, 0.0, 300.0, 200.0), &style);

        let router = Router::new();
        let mut out = WindowRender::new(usize::MAX, usize::MAX);
        let mut batcher = Batcher::begin(&mut out, &AllResident);
        Painter {
            tree,
            store,
            router: &router,
            style: &style,
            measurer: &measurer,
        }
        .paint(&mut batcher);
        batcher.finish().1.unwrap();
        out
    }

    #[test]
    fn test_button_background_then_glyphs() {
        let mut tree = ControlTree::new();
        let mut store = ControlStore::new();
        let mut button = Control::new(ControlId::new(1), ControlKind::Button);
        button.label = tree.intern("OK");
        tree.push(button);

        let out = paint(&mut tree, &mut store);
        let commands = out.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].texture, None);
        assert_eq!(commands[1].texture, Some(TextureId(7)));
        assert_eq!(commands[1].index_count, 12);
    }

    #[test]
    fn test_scrollbar_painted_after_children() {
        let mut tree = ControlTree::new();
        let mut store = ControlStore::new();
        let mut view = Control::new(ControlId::new(1), ControlKind::ScrollView);
        view.height = crate::layout::Sizing::Fixed(50.0);
        let (view_index, _) = tree.push(view);
        tree.open(view_index);
        for i in 0..5 {
            let mut text = Control::new(ControlId::new(10 + i), ControlKind::Text);
            text.label = tree.intern("row");
            tree.push(text);
        }
        tree.close(ControlKind::ScrollView).unwrap();
        store.scroll_mut(ControlId::new(1), ScrollState::default);

        let out = paint(&mut tree, &mut store);
        let last = out.commands().last().copied().unwrap();
        assert_eq!(last.texture, None);
        // Thumb hugs the right edge of the viewport.
        let thumb = &out.vertices()[out.vertices().len() - 4..];
        assert_eq!(thumb[1].position[0], 300.0);
        assert_eq!(thumb[0].position[1], 0.0);
    }

    #[test]
    fn test_clipped_rows_emit_nothing() {
        let mut tree = ControlTree::new();
        let mut store = ControlStore::new();
        let mut view = Control::new(ControlId::new(1), ControlKind::ScrollView);
        view.height = crate::layout::Sizing::Fixed(16.0);
        let (view_index, _) = tree.push(view);
        tree.open(view_index);
        for i in 0..4 {
            let mut text = Control::new(ControlId::new(10 + i), ControlKind::Text);
            text.label = tree.intern("abc");
            tree.push(text);
        }
        tree.close(ControlKind::ScrollView).unwrap();

        let out = paint(&mut tree, &mut store);
        // Only the first row is inside the 16px viewport: 3 glyphs, plus the thumb.
        assert_eq!(out.vertices().len(), (3 + 1) * 4);
    }
}
