//! Input/focus routing.
//!
//! Runs once per frame after layout. Hit-tests the arranged tree, drives the
//! press/activate state machine, moves keyboard focus, and applies edits to
//! the persistent store. Results are kept as per-control [`Response`]s until
//! the next routing pass.

use std::collections::HashMap;

use tracing::trace;

use crate::focus::FocusCursor;
use crate::id::ControlId;
use crate::input::{InputAction, InputSnapshot, MouseButton};
use crate::state::{ControlStore, ScrollState, TextEditState};
use crate::style::Style;
use crate::text::{TextMeasurer, TextRun};
use crate::widget::{Control, ControlKind, ControlTree, Response};

/// Who is holding a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressSource {
    Pointer,
    Key,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    id: ControlId,
    source: PressSource,
}

/// Read-only parameters of one routing pass.
#[derive(Clone, Copy)]
pub struct RouteParams<'a> {
    /// Style used for hit geometry (padding, thumb width, font).
    pub style: &'a Style,
    /// Measurer used to place the text cursor under the pointer.
    pub measurer: &'a dyn TextMeasurer,
    /// Pixels scrolled per wheel unit.
    pub wheel_step: f32,
    /// Number of keyboard steps across a slider's range.
    pub slider_key_steps: u32,
}

/// Per-window input router.
#[derive(Debug, Default)]
pub struct Router {
    focus: FocusCursor,
    pressed: Option<Press>,
    hovered: Option<ControlId>,
    last_mouse: Option<(f32, f32)>,
    responses: HashMap<ControlId, Response>,
}

impl Router {
    /// Creates an idle router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the last routing pass for `id`.
    #[must_use]
    pub fn response(&self, id: ControlId) -> Response {
        self.responses.get(&id).copied().unwrap_or_default()
    }

    /// Focused control.
    #[must_use]
    pub const fn focused(&self) -> Option<ControlId> {
        self.focus.focused()
    }

    /// Focus cursor.
    #[must_use]
    pub const fn focus(&self) -> &FocusCursor {
        &self.focus
    }

    /// Topmost interactive control under the pointer.
    #[must_use]
    pub const fn hovered(&self) -> Option<ControlId> {
        self.hovered
    }

    /// Control currently held by the pointer or the activate key.
    #[must_use]
    pub fn pressed(&self) -> Option<ControlId> {
        self.pressed.map(|p| p.id)
    }

    fn response_mut(&mut self, id: ControlId) -> &mut Response {
        self.responses.entry(id).or_default()
    }

    /// Routes one frame of input. Returns true if a scroll offset changed,
    /// in which case the caller re-arranges before painting.
    pub fn route(
        &mut self,
        tree: &ControlTree,
        store: &mut ControlStore,
        input: &InputSnapshot,
        params: &RouteParams<'_>,
    ) -> bool {
        self.responses.clear();

        if !self.focus.sync(tree.tab_order(), |id| tree.contains(id)) {
            trace!("focus target not declared this frame, focus cleared");
        }
        if self.pressed.is_some_and(|p| !tree.contains(p.id)) {
            self.pressed = None;
        }

        let (mx, my) = input.mouse();
        let hit = hit_test(tree, mx, my);
        self.hovered = hit.map(|i| tree.nodes()[i].id);
        if let Some(id) = self.hovered {
            self.response_mut(id).hovered = true;
        }

        let mut scroll_changed = false;
        if input.wheel != (0.0, 0.0) {
            if let Some(view) = scroll_target(tree, mx, my) {
                let id = tree.nodes()[view].id;
                scroll_changed |= store.scroll_mut(id, ScrollState::default).scroll_by(
                    -input.wheel.0 * params.wheel_step,
                    -input.wheel.1 * params.wheel_step,
                );
            }
        }

        let just_pressed = input.mouse_pressed(MouseButton::Left);
        if just_pressed {
            match hit {
                Some(index) => self.press(tree, store, index, input, params),
                None => {
                    self.commit_focused(tree, store);
                    self.focus.clear();
                }
            }
        }

        if let Some(press) = self.pressed.filter(|p| p.source == PressSource::Pointer) {
            if !just_pressed && input.mouse_down(MouseButton::Left) {
                if let Some(index) = tree.index_of(press.id) {
                    scroll_changed |= self.drag(tree, store, index, input, params);
                }
            }
        }

        if input.mouse_released(MouseButton::Left) {
            if let Some(press) = self.pressed.filter(|p| p.source == PressSource::Pointer) {
                self.pressed = None;
                match hit {
                    Some(index) if tree.nodes()[index].id == press.id => {
                        self.activate(tree, store, index, PressSource::Pointer);
                    }
                    _ => trace!(id = press.id.raw(), "press cancelled"),
                }
            }
        }

        for &action in input.actions() {
            self.action(tree, store, action, input, params);
        }

        if !input.text.is_empty() {
            self.text_input(tree, store, &input.text);
        }

        if let Some(id) = self.focus.focused() {
            self.response_mut(id).focused = true;
        }
        if let Some(press) = self.pressed {
            self.response_mut(press.id).pressed = true;
        }
        self.last_mouse = Some((mx, my));
        scroll_changed
    }

    fn press(
        &mut self,
        tree: &ControlTree,
        store: &mut ControlStore,
        index: usize,
        input: &InputSnapshot,
        params: &RouteParams<'_>,
    ) {
        let control = &tree.nodes()[index];
        let id = control.id;
        self.pressed = Some(Press {
            id,
            source: PressSource::Pointer,
        });
        self.response_mut(id).press_started = true;
        trace!(id = id.raw(), kind = ?control.kind, "pressed");

        if control.is_focusable() {
            if !self.focus.is_focused(id) {
                self.commit_focused(tree, store);
                self.focus.focus(id, tree.tab_order());
                self.response_mut(id).focus_pressed = true;
                trace!(id = id.raw(), "focus moved by press");
            }
        } else {
            self.commit_focused(tree, store);
            self.focus.clear();
        }

        match control.kind {
            ControlKind::Slider => {
                let changed = set_slider(store, control, slider_value_at(control, input.mouse_x, params.style));
                self.response_mut(id).changed |= changed;
            }
            ControlKind::TextBox => {
                let edit = store.text_edit_mut(id, || TextEditState::new(""));
                let pos = cursor_at(control, edit.text(), input.mouse_x, params);
                edit.set_cursor(pos, input.modifiers.shift);
            }
            _ => {}
        }
    }

    fn drag(
        &mut self,
        tree: &ControlTree,
        store: &mut ControlStore,
        index: usize,
        input: &InputSnapshot,
        params: &RouteParams<'_>,
    ) -> bool {
        let control = &tree.nodes()[index];
        let (mx, my) = input.mouse();
        let (lx, ly) = self.last_mouse.unwrap_or((mx, my));

        match control.kind {
            ControlKind::Slider => {
                let changed = set_slider(store, control, slider_value_at(control, mx, params.style));
                self.response_mut(control.id).changed |= changed;
                false
            }
            ControlKind::TextBox => {
                let edit = store.text_edit_mut(control.id, || TextEditState::new(""));
                let pos = cursor_at(control, edit.text(), mx, params);
                edit.set_cursor(pos, true);
                false
            }
            ControlKind::ScrollView => store
                .scroll_mut(control.id, ScrollState::default)
                .scroll_by(lx - mx, ly - my),
            _ => false,
        }
    }

    /// Applies toggle/select/radio policy on top of activation.
    fn activate(
        &mut self,
        tree: &ControlTree,
        store: &mut ControlStore,
        index: usize,
        source: PressSource,
    ) {
        let control = &tree.nodes()[index];
        let id = control.id;
        trace!(id = id.raw(), kind = ?control.kind, "activated");

        let changed = match control.kind {
            ControlKind::Checkbox => {
                let value = store.toggle_mut(id, || false);
                *value = !*value;
                true
            }
            ControlKind::Radio => {
                let register = store.select_mut(control.group, || None);
                let changed = *register != Some(id);
                *register = Some(id);
                changed
            }
            ControlKind::Selectable => {
                let register = store.select_mut(control.group, || None);
                *register = if *register == Some(id) { None } else { Some(id) };
                true
            }
            ControlKind::TextBox if source == PressSource::Key => store
                .text_edit_mut(id, || TextEditState::new(""))
                .commit(),
            _ => false,
        };

        let response = self.response_mut(id);
        response.activated = true;
        response.changed |= changed;
    }

    fn action(
        &mut self,
        tree: &ControlTree,
        store: &mut ControlStore,
        action: InputAction,
        input: &InputSnapshot,
        params: &RouteParams<'_>,
    ) {
        match action {
            InputAction::FocusNext | InputAction::FocusPrevious => {
                self.commit_focused(tree, store);
                self.pressed = self.pressed.filter(|p| p.source == PressSource::Pointer);
                let order = tree.tab_order();
                let target = if action == InputAction::FocusNext {
                    self.focus.next(order)
                } else {
                    self.focus.previous(order)
                };
                trace!(target = ?target.map(ControlId::raw), "focus navigation");
            }
            InputAction::ActivatePressed => {
                if let Some(id) = self.focus.focused() {
                    self.pressed = Some(Press {
                        id,
                        source: PressSource::Key,
                    });
                    self.response_mut(id).press_started = true;
                }
            }
            InputAction::ActivateReleased => {
                let Some(press) = self.pressed.filter(|p| p.source == PressSource::Key) else {
                    return;
                };
                self.pressed = None;
                if self.focus.is_focused(press.id) {
                    if let Some(index) = tree.index_of(press.id) {
                        self.activate(tree, store, index, PressSource::Key);
                    }
                }
            }
            InputAction::Left
            | InputAction::Right
            | InputAction::Up
            | InputAction::Down
            | InputAction::Home
            | InputAction::End
            | InputAction::Backspace
            | InputAction::Delete => {
                let Some(control) = self.focus.focused().and_then(|id| tree.find(id)) else {
                    return;
                };
                let changed = match control.kind {
                    ControlKind::TextBox => {
                        edit_text(store, control.id, action, input.modifiers.shift)
                    }
                    ControlKind::Slider => step_slider(store, control, action, params),
                    _ => false,
                };
                self.response_mut(control.id).changed |= changed;
            }
        }
    }

    fn text_input(&mut self, tree: &ControlTree, store: &mut ControlStore, text: &str) {
        let Some(control) = self.focus.focused().and_then(|id| tree.find(id)) else {
            return;
        };
        if control.kind != ControlKind::TextBox {
            return;
        }
        let edit = store.text_edit_mut(control.id, || TextEditState::new(""));
        let mut changed = false;
        let mut buf = [0u8; 4];
        for c in text.chars().filter(|c| !c.is_control()) {
            changed |= edit.insert(c.encode_utf8(&mut buf));
        }
        self.response_mut(control.id).changed |= changed;
    }

    /// Commits the focused text box before focus moves away from it.
    fn commit_focused(&mut self, tree: &ControlTree, store: &mut ControlStore) {
        let Some(control) = self.focus.focused().and_then(|id| tree.find(id)) else {
            return;
        };
        if control.kind != ControlKind::TextBox {
            return;
        }
        if store
            .text_edit_mut(control.id, || TextEditState::new(""))
            .commit()
        {
            self.response_mut(control.id).changed = true;
        }
    }
}

/// Topmost interactive control under `(x, y)`, honoring clip ancestors.
#[must_use]
pub fn hit_test(tree: &ControlTree, x: f32, y: f32) -> Option<usize> {
    tree.iter_reverse()
        .find(|(_, c)| c.is_interactive() && c.hit(x, y))
        .map(|(i, _)| i)
}

/// Innermost scroll view whose visible viewport contains `(x, y)`.
fn scroll_target(tree: &ControlTree, x: f32, y: f32) -> Option<usize> {
    tree.iter_reverse()
        .find(|(_, c)| c.kind == ControlKind::ScrollView && c.hit(x, y))
        .map(|(i, _)| i)
}

fn slider_value_at(control: &Control, x: f32, style: &Style) -> f32 {
    let (min, max) = control.range;
    let thumb = style.slider_thumb_width.max(0.0);
    let track = (control.rect.width - thumb).max(0.0);
    let t = if track > 0.0 {
        ((x - control.rect.x - thumb * 0.5) / track).clamp(0.0, 1.0)
    } else {
        0.0
    };
    min + t * (max - min)
}

fn set_slider(store: &mut ControlStore, control: &Control, value: f32) -> bool {
    let (min, max) = control.range;
    let slot = store.value_mut(control.id, || min);
    let value = value.clamp(min.min(max), max.max(min));
    let changed = (*slot - value).abs() > f32::EPSILON;
    *slot = value;
    changed
}

fn step_slider(
    store: &mut ControlStore,
    control: &Control,
    action: InputAction,
    params: &RouteParams<'_>,
) -> bool {
    let (min, max) = control.range;
    #[allow(clippy::cast_precision_loss)]
    let step = (max - min) / params.slider_key_steps.max(1) as f32;
    let current = store.value(control.id).copied().unwrap_or(min);
    let target = match action {
        InputAction::Left | InputAction::Down => current - step,
        InputAction::Right | InputAction::Up => current + step,
        InputAction::Home => min,
        InputAction::End => max,
        _ => return false,
    };
    set_slider(store, control, target)
}

fn edit_text(store: &mut ControlStore, id: ControlId, action: InputAction, shift: bool) -> bool {
    let edit = store.text_edit_mut(id, || TextEditState::new(""));
    match action {
        InputAction::Left => edit.move_left(shift),
        InputAction::Right => edit.move_right(shift),
        InputAction::Home => edit.home(shift),
        InputAction::End => edit.end(shift),
        InputAction::Backspace => return edit.backspace(),
        InputAction::Delete => return edit.delete(),
        _ => {}
    }
    false
}

/// Byte offset in `text` closest to the pointer at `x`.
fn cursor_at(control: &Control, text: &str, x: f32, params: &RouteParams<'_>) -> usize {
    let local = x - (control.rect.x + params.style.padding);
    let width = |end: usize| {
        params
            .measurer
            .measure(&TextRun {
                font: params.style.font,
                line_height: params.style.line_height,
                text: &text[..end],
                wrap_width: 0.0,
            })
            .width
    };

    let mut prev = 0.0;
    for (i, c) in text.char_indices() {
        let next = width(i + c.len_utf8());
        if local < (prev + next) * 0.5 {
            return i;
        }
        prev = next;
    }
    text.len()
}
