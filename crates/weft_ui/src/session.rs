//! UI session, windows and the per-frame declaration API.
//!
//! ```text
//! UiSession::begin_frame ─► Frame::{text, button, row, ...} ─► Frame::end
//!                                                                │
//!        measure ─► arrange ─► route ─► (re-arrange) ─► paint ◄──┘
//!                                                         │
//! UiSession::{response, render, focused, ...} ◄───────────┘
//! ```
//!
//! Declarations never answer "was I clicked". Routing runs after layout in
//! `Frame::end`; results are read through the session afterwards. Stateful
//! declarations return the value the control held going into this frame.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut, RangeInclusive};

use tracing::{debug, warn};
use weft_core::CoreError;

use crate::config::UiConfig;
use crate::error::{UiError, UiResult};
use crate::id::{discriminator, ControlId, IdStack};
use crate::input::InputSnapshot;
use crate::layout::{LayoutSolver, Rect, Sizing};
use crate::paint::Painter;
use crate::render::{AllResident, Batcher, TextureResolver, WindowRender};
use crate::router::{RouteParams, Router};
use crate::state::{ControlStore, ScrollState, TextEditState};
use crate::style::{LayoutOverride, OverrideStack};
use crate::text::TextMeasurer;
use crate::widget::{Control, ControlFlags, ControlKind, ControlTree, ImageRef, Response};

/// Identifies one window of a session. Windows are fully independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WindowId(pub u32);

impl WindowId {
    /// The default window.
    pub const MAIN: Self = Self(0);
}

/// A declaration's id plus the value its control held going into the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declared<T> {
    /// Control identity, for queries after the frame ends.
    pub id: ControlId,
    /// Prior-frame value.
    pub value: T,
}

/// Statistics for one finished frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSummary {
    /// Controls declared, the root excluded.
    pub controls: usize,
    /// Draw commands emitted.
    pub draw_calls: usize,
    /// Vertices emitted.
    pub vertices: usize,
    /// Indices emitted.
    pub indices: usize,
    /// Usage errors repaired during the frame.
    pub usage_errors: usize,
    /// Render buffer failure, if geometry was cut short.
    pub buffer_error: Option<CoreError>,
    /// Persistent entries garbage-collected after the frame.
    pub collected: usize,
}

/// Everything a window keeps between frames.
struct WindowContext {
    ids: IdStack,
    overrides: OverrideStack,
    tree: ControlTree,
    store: ControlStore,
    router: Router,
    solver: LayoutSolver,
    render: WindowRender,
    /// Id-stack depth at each open container.
    containers: Vec<usize>,
    /// Open groups with the id-stack depth they were opened at.
    groups: Vec<(ControlId, usize)>,
    usage_errors: Vec<UiError>,
    summary: FrameSummary,
}

impl WindowContext {
    fn new(config: &UiConfig) -> Self {
        Self {
            ids: IdStack::new(),
            overrides: OverrideStack::new(),
            tree: ControlTree::new(),
            store: ControlStore::new(),
            router: Router::new(),
            solver: LayoutSolver::new(),
            render: WindowRender::new(config.max_vertices, config.max_indices),
            containers: Vec::with_capacity(16),
            groups: Vec::new(),
            usage_errors: Vec::new(),
            summary: FrameSummary::default(),
        }
    }

    fn begin(&mut self, config: &UiConfig) {
        self.ids.reset();
        self.overrides.clear();
        self.tree.clear();
        self.containers.clear();
        self.groups.clear();
        self.usage_errors.clear();
        self.render.set_limits(config.max_vertices, config.max_indices);
        self.store.begin_frame();
        self.store.observe(ControlId::ROOT);
        if let Some(root) = self.tree.nodes_mut().first_mut() {
            root.spacing = config.style.spacing;
        }
    }
}

/// Owns configuration, the text measurer, the texture resolver and every
/// window's state.
pub struct UiSession {
    config: UiConfig,
    measurer: Box<dyn TextMeasurer>,
    resolver: Box<dyn TextureResolver>,
    windows: HashMap<WindowId, WindowContext>,
}

impl UiSession {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `config` fails validation.
    pub fn new(config: UiConfig, measurer: impl TextMeasurer + 'static) -> UiResult<Self> {
        config.validate()?;
        debug!(
            gc_after_frames = config.gc_after_frames,
            max_vertices = config.max_vertices,
            "UI session created"
        );
        Ok(Self {
            config,
            measurer: Box::new(measurer),
            resolver: Box::new(AllResident),
            windows: HashMap::new(),
        })
    }

    /// Replaces the texture resolver (default: every texture is resident).
    #[must_use]
    pub fn with_texture_resolver(mut self, resolver: impl TextureResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Replaces the configuration. Buffer limits apply to windows opened
    /// afterwards.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `config` fails validation; the old one stays.
    pub fn set_config(&mut self, config: UiConfig) -> UiResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Starts declaring a frame for `window`, creating the window on first use.
    pub fn begin_frame<'s>(
        &'s mut self,
        window: WindowId,
        viewport: Rect,
        input: &'s InputSnapshot,
    ) -> Frame<'s> {
        let Self {
            config,
            measurer,
            resolver,
            windows,
        } = self;
        let config: &'s UiConfig = config;
        let cx = windows
            .entry(window)
            .or_insert_with(|| WindowContext::new(config));
        cx.begin(config);

        Frame {
            window,
            config,
            measurer: &**measurer,
            resolver: &**resolver,
            cx,
            input,
            viewport,
            finished: false,
        }
    }

    /// Drops a window and all its state. Returns false if it did not exist.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        self.windows.remove(&window).is_some()
    }

    /// Number of open windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn window(&self, window: WindowId) -> Option<&WindowContext> {
        self.windows.get(&window)
    }

    /// Routing result for `id` from the window's last frame.
    #[must_use]
    pub fn response(&self, window: WindowId, id: ControlId) -> Response {
        self.window(window)
            .map(|cx| cx.router.response(id))
            .unwrap_or_default()
    }

    /// Render output of the window's last frame.
    #[must_use]
    pub fn render(&self, window: WindowId) -> Option<&WindowRender> {
        self.window(window).map(|cx| &cx.render)
    }

    /// Control tree of the window's last frame.
    #[must_use]
    pub fn tree(&self, window: WindowId) -> Option<&ControlTree> {
        self.window(window).map(|cx| &cx.tree)
    }

    /// Control record from the window's last frame.
    #[must_use]
    pub fn control(&self, window: WindowId, id: ControlId) -> Option<&Control> {
        self.window(window).and_then(|cx| cx.tree.find(id))
    }

    /// Arranged rectangle from the window's last frame.
    #[must_use]
    pub fn rect(&self, window: WindowId, id: ControlId) -> Option<Rect> {
        self.control(window, id).map(|c| c.rect)
    }

    /// Persistent store of a window.
    #[must_use]
    pub fn store(&self, window: WindowId) -> Option<&ControlStore> {
        self.window(window).map(|cx| &cx.store)
    }

    /// Control holding keyboard focus.
    #[must_use]
    pub fn focused(&self, window: WindowId) -> Option<ControlId> {
        self.window(window).and_then(|cx| cx.router.focused())
    }

    /// Topmost interactive control under the pointer.
    #[must_use]
    pub fn hovered(&self, window: WindowId) -> Option<ControlId> {
        self.window(window).and_then(|cx| cx.router.hovered())
    }

    /// Selected member of a radio/selectable group. Controls declared outside
    /// any group share the register `ControlId::ROOT`.
    #[must_use]
    pub fn selected(&self, window: WindowId, group: ControlId) -> Option<ControlId> {
        self.store(window)
            .and_then(|store| store.select(group).copied())
            .flatten()
    }

    /// Checkbox value.
    #[must_use]
    pub fn toggled(&self, window: WindowId, id: ControlId) -> Option<bool> {
        self.store(window).and_then(|store| store.toggle(id).copied())
    }

    /// Slider value.
    #[must_use]
    pub fn slider_value(&self, window: WindowId, id: ControlId) -> Option<f32> {
        self.store(window).and_then(|store| store.value(id).copied())
    }

    /// Text box buffer.
    #[must_use]
    pub fn text(&self, window: WindowId, id: ControlId) -> Option<&str> {
        self.store(window)
            .and_then(|store| store.text_edit(id))
            .map(TextEditState::text)
    }

    /// Last committed number of a number box.
    #[must_use]
    pub fn number(&self, window: WindowId, id: ControlId) -> Option<f64> {
        self.store(window)
            .and_then(|store| store.text_edit(id))
            .and_then(TextEditState::value)
    }

    /// Scroll offset of a scroll view.
    #[must_use]
    pub fn scroll_offset(&self, window: WindowId, id: ControlId) -> Option<(f32, f32)> {
        self.store(window)
            .and_then(|store| store.scroll(id))
            .map(ScrollState::offset)
    }

    /// Usage errors repaired during the window's last frame.
    #[must_use]
    pub fn usage_errors(&self, window: WindowId) -> &[UiError] {
        self.window(window).map_or(&[], |cx| cx.usage_errors.as_slice())
    }

    /// Summary of the window's last finished frame.
    #[must_use]
    pub fn last_summary(&self, window: WindowId) -> Option<FrameSummary> {
        self.window(window).map(|cx| cx.summary)
    }
}

/// One frame of declarations for one window.
///
/// Holds the only mutable borrow of the window, so declarations cannot be
/// re-entered from elsewhere. Ending the frame (explicitly or by drop) runs
/// layout, routing and batching.
pub struct Frame<'s> {
    window: WindowId,
    config: &'s UiConfig,
    measurer: &'s dyn TextMeasurer,
    resolver: &'s dyn TextureResolver,
    cx: &'s mut WindowContext,
    input: &'s InputSnapshot,
    viewport: Rect,
    finished: bool,
}

impl<'s> Frame<'s> {
    /// Window being declared.
    #[must_use]
    pub const fn window(&self) -> WindowId {
        self.window
    }

    /// Input snapshot of this frame.
    #[must_use]
    pub const fn input(&self) -> &InputSnapshot {
        self.input
    }

    /// Id of the most recent declaration in the current scope.
    #[must_use]
    pub fn current_id(&self) -> ControlId {
        self.cx.ids.current_id()
    }

    fn misuse(&mut self, err: UiError) {
        warn!(window = self.window.0, "UI usage error: {err}");
        self.cx.usage_errors.push(err.clone());
        if self.config.panic_on_misuse {
            panic!("UI usage error: {err}");
        }
    }

    /// Resolves identity, snapshots overrides and appends a control.
    fn declare(
        &mut self,
        kind: ControlKind,
        key: u64,
        label: &str,
        prepare: impl FnOnce(&mut Control),
    ) -> (ControlId, usize) {
        let id = self.cx.ids.declare(discriminator(&(kind, key)));
        let mut control = Control::new(id, kind);
        prepare(&mut control);

        let layer = self.cx.overrides.effective();
        if let Some(width) = layer.width {
            control.width = width;
        }
        if let Some(height) = layer.height {
            control.height = height;
        }
        if let Some(align) = layer.align {
            control.align = align;
        }
        control.spacing = layer.spacing.unwrap_or(self.config.style.spacing);
        if !label.is_empty() {
            control.label = self.cx.tree.intern(label);
        }

        self.cx.store.observe(id);
        let (index, duplicate) = self.cx.tree.push(control);
        if let Some(err) = duplicate {
            self.misuse(err);
        }
        (id, index)
    }

    fn current_group(&self) -> ControlId {
        self.cx.groups.last().map_or(ControlId::ROOT, |&(id, _)| id)
    }

    /// Static text on one line per explicit newline.
    pub fn text(&mut self, text: &str) -> ControlId {
        self.declare(ControlKind::Text, discriminator(text), text, |_| {})
            .0
    }

    /// Text wrapped at the control's width (fill width unless overridden).
    pub fn text_wrapped(&mut self, text: &str) -> ControlId {
        self.declare(ControlKind::Text, discriminator(text), text, |c| {
            c.flags.set(ControlFlags::WRAP);
            c.width = Sizing::FILL;
        })
        .0
    }

    /// Image at its native pixel size.
    pub fn image(&mut self, image: ImageRef) -> ControlId {
        self.declare(
            ControlKind::Image,
            u64::from(image.texture.0),
            "",
            |c| c.image = Some(image),
        )
        .0
    }

    /// Push button. Query `activated` after the frame.
    pub fn button(&mut self, label: &str) -> ControlId {
        self.declare(ControlKind::Button, discriminator(label), label, |_| {})
            .0
    }

    /// Checkbox starting at `default` the first time it is seen.
    pub fn checkbox(&mut self, label: &str, default: bool) -> Declared<bool> {
        let (id, _) = self.declare(ControlKind::Checkbox, discriminator(label), label, |_| {});
        let value = *self.cx.store.toggle_mut(id, || default);
        Declared { id, value }
    }

    /// Radio button in the current group. With `default` set, it selects
    /// itself if the group has no selection yet.
    pub fn radio(&mut self, label: &str, default: bool) -> Declared<bool> {
        let group = self.current_group();
        let (id, _) = self.declare(ControlKind::Radio, discriminator(label), label, |c| {
            c.group = group;
        });
        let register = self.cx.store.select_mut(group, || None);
        if default && register.is_none() {
            *register = Some(id);
        }
        Declared {
            id,
            value: *register == Some(id),
        }
    }

    /// Selectable entry in the current group.
    pub fn selectable(&mut self, label: &str) -> Declared<bool> {
        let group = self.current_group();
        let (id, _) = self.declare(ControlKind::Selectable, discriminator(label), label, |c| {
            c.group = group;
        });
        let selected = self.cx.store.select(group) == Some(&Some(id));
        Declared {
            id,
            value: selected,
        }
    }

    /// Horizontal slider over `range`, starting at `default`.
    pub fn slider(&mut self, key: &str, range: RangeInclusive<f32>, default: f32) -> Declared<f32> {
        let (min, max) = (*range.start(), *range.end());
        let (id, _) = self.declare(ControlKind::Slider, discriminator(key), "", |c| {
            c.range = (min, max);
        });
        let value = *self
            .cx
            .store
            .value_mut(id, || default.clamp(min.min(max), max.max(min)));
        Declared { id, value }
    }

    /// Free-text entry starting with `default`.
    pub fn text_box(&mut self, key: &str, default: &str) -> Declared<String> {
        let (id, _) = self.declare(ControlKind::TextBox, discriminator(key), "", |_| {});
        let edit = self.cx.store.text_edit_mut(id, || TextEditState::new(default));
        Declared {
            id,
            value: edit.text().to_owned(),
        }
    }

    /// Number entry starting at `default`. Unparsable input reverts to the
    /// last valid value when committed.
    pub fn number_box(&mut self, key: &str, default: f64) -> Declared<f64> {
        let (id, _) = self.declare(ControlKind::TextBox, discriminator(key), "", |c| {
            c.flags.set(ControlFlags::NUMERIC);
        });
        let strict = self.config.strict_numeric_input;
        let edit = self
            .cx
            .store
            .text_edit_mut(id, || TextEditState::numeric(default, strict));
        if edit.numeric_mode().is_none() {
            *edit = TextEditState::numeric(default, strict);
        }
        Declared {
            id,
            value: edit.value().unwrap_or(default),
        }
    }

    /// Fill-sized empty space.
    pub fn spacer(&mut self) -> ControlId {
        self.declare(ControlKind::Spacer, 0, "", |_| {}).0
    }

    fn begin_container(&mut self, kind: ControlKind, key: u64) -> ControlId {
        let (id, index) = self.declare(kind, key, "", |_| {});
        self.cx.containers.push(self.cx.ids.depth());
        self.cx.ids.push_scope_for(id);
        self.cx.tree.open(index);
        id
    }

    fn end_container(&mut self, kind: ControlKind) {
        let before = self.cx.tree.open_depth();
        if let Err(err) = self.cx.tree.close(kind) {
            self.misuse(err);
            if self.cx.tree.close_through(kind).is_none() {
                return;
            }
        }
        let closed = before - self.cx.tree.open_depth();

        let mut depth = None;
        for _ in 0..closed {
            depth = self.cx.containers.pop();
        }
        let Some(depth) = depth else {
            return;
        };

        let mut dangling = 0;
        while self.cx.groups.last().is_some_and(|&(_, d)| d >= depth) {
            self.cx.groups.pop();
            dangling += 1;
        }
        if dangling > 0 {
            self.misuse(UiError::UnclosedGroups { count: dangling });
        }

        let popped = self.cx.ids.truncate_to(depth);
        if popped > closed + dangling {
            self.misuse(UiError::UnbalancedScopes {
                depth: popped - closed - dangling,
            });
        }
    }

    /// Opens a horizontal container.
    pub fn begin_row(&mut self) -> ControlId {
        self.begin_container(ControlKind::Row, 0)
    }

    /// Closes the innermost row.
    pub fn end_row(&mut self) {
        self.end_container(ControlKind::Row);
    }

    /// Opens a vertical container.
    pub fn begin_column(&mut self) -> ControlId {
        self.begin_container(ControlKind::Column, 0)
    }

    /// Closes the innermost column.
    pub fn end_column(&mut self) {
        self.end_container(ControlKind::Column);
    }

    /// Opens a vertical scroll view (fill-sized unless overridden).
    pub fn begin_scroll_view(&mut self, key: &str) -> ControlId {
        let id = self.begin_container(ControlKind::ScrollView, discriminator(key));
        self.cx.store.scroll_mut(id, ScrollState::default);
        id
    }

    /// Closes the innermost scroll view.
    pub fn end_scroll_view(&mut self) {
        self.end_container(ControlKind::ScrollView);
    }

    /// Declares a row around `body`.
    pub fn row<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_row();
        let result = body(self);
        self.end_row();
        result
    }

    /// Declares a column around `body`.
    pub fn column<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_column();
        let result = body(self);
        self.end_column();
        result
    }

    /// Declares a scroll view around `body`.
    pub fn scroll_view<R>(&mut self, key: &str, body: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_scroll_view(key);
        let result = body(self);
        self.end_scroll_view();
        result
    }

    /// Opens a radio/selectable group. Its id is the register queried with
    /// `UiSession::selected`.
    pub fn begin_group(&mut self, key: &str) -> ControlId {
        let depth = self.cx.ids.depth();
        let id = self.cx.ids.push_scope(discriminator(&("group", key)));
        self.cx.groups.push((id, depth));
        self.cx.store.observe(id);
        id
    }

    /// Closes the innermost group.
    pub fn end_group(&mut self) {
        let Some((_, depth)) = self.cx.groups.pop() else {
            self.misuse(UiError::GroupUnderflow);
            return;
        };

        // Containers opened inside the group close with it.
        let mut unclosed = 0;
        while self.cx.containers.last().is_some_and(|&d| d > depth) {
            self.cx.containers.pop();
            unclosed += 1;
        }
        if unclosed > 0 {
            self.cx.tree.close_innermost(unclosed);
            self.misuse(UiError::UnclosedContainers { count: unclosed });
        }

        let popped = self.cx.ids.truncate_to(depth);
        if popped > 1 + unclosed {
            self.misuse(UiError::UnbalancedScopes {
                depth: popped - 1 - unclosed,
            });
        }
    }

    /// Declares a group around `body`, returning the group id and the body's result.
    pub fn group<R>(&mut self, key: &str, body: impl FnOnce(&mut Self) -> R) -> (ControlId, R) {
        let id = self.begin_group(key);
        let result = body(self);
        self.end_group();
        (id, result)
    }

    /// Opens an identity scope keyed by `key`.
    pub fn push_id<K: Hash + ?Sized>(&mut self, key: &K) -> ControlId {
        self.cx.ids.push_scope(discriminator(key))
    }

    /// Closes the innermost identity scope opened with `push_id`.
    pub fn pop_id(&mut self) {
        let floor = self
            .cx
            .containers
            .last()
            .copied()
            .into_iter()
            .chain(self.cx.groups.last().map(|&(_, d)| d))
            .max()
            .map_or(1, |depth| depth + 1);
        if self.cx.ids.depth() <= floor {
            self.misuse(UiError::ScopeUnderflow);
            return;
        }
        if let Err(err) = self.cx.ids.pop_scope() {
            self.misuse(err);
        }
    }

    /// Declares `body` inside an identity scope.
    pub fn id_scope<K: Hash + ?Sized, R>(&mut self, key: &K, body: impl FnOnce(&mut Self) -> R) -> R {
        self.push_id(key);
        let result = body(self);
        self.pop_id();
        result
    }

    /// Pushes layout overrides until the returned guard is dropped.
    pub fn with_overrides(&mut self, layer: LayoutOverride) -> OverrideScope<'_, 's> {
        let depth = self.cx.overrides.push(layer);
        OverrideScope { frame: self, depth }
    }

    /// Declares `body` with layout overrides in effect.
    pub fn scoped<R>(&mut self, layer: LayoutOverride, body: impl FnOnce(&mut Self) -> R) -> R {
        let mut scope = self.with_overrides(layer);
        body(&mut *scope)
    }

    /// Finishes the frame: repairs usage errors, lays out, routes input and
    /// builds the window's render output.
    pub fn end(mut self) -> FrameSummary {
        self.finish()
    }

    fn repair(&mut self) {
        let open = self.cx.tree.open_depth();
        if open > 0 {
            self.cx.tree.close_all();
            if let Some(&depth) = self.cx.containers.first() {
                self.cx.ids.truncate_to(depth);
            }
            self.cx.containers.clear();
            self.misuse(UiError::UnclosedContainers { count: open });
        }

        let groups = self.cx.groups.len();
        if groups > 0 {
            if let Some(&(_, depth)) = self.cx.groups.first() {
                self.cx.ids.truncate_to(depth);
            }
            self.cx.groups.clear();
            self.misuse(UiError::UnclosedGroups { count: groups });
        }

        if let Err(err) = self.cx.ids.check_balanced() {
            self.cx.ids.unwind();
            self.misuse(err);
        }
        self.cx.overrides.clear();
    }

    fn finish(&mut self) -> FrameSummary {
        self.finished = true;
        self.repair();

        let config = self.config;
        let style = &config.style;
        let measurer = self.measurer;
        let viewport = self.viewport;
        let cx = &mut *self.cx;

        cx.tree.finish();
        cx.solver.measure(&mut cx.tree, &cx.store, style, measurer);
        cx.solver.arrange(&mut cx.tree, &mut cx.store, viewport, style);

        let params = RouteParams {
            style,
            measurer,
            wheel_step: config.wheel_step,
            slider_key_steps: config.slider_key_steps,
        };
        if cx.router.route(&cx.tree, &mut cx.store, self.input, &params) {
            cx.solver.arrange(&mut cx.tree, &mut cx.store, viewport, style);
        }

        let mut batcher = Batcher::begin(&mut cx.render, self.resolver);
        Painter {
            tree: &cx.tree,
            store: &cx.store,
            router: &cx.router,
            style,
            measurer,
        }
        .paint(&mut batcher);
        let (stats, result) = batcher.finish();

        let collected = cx.store.collect_garbage(config.gc_after_frames);
        if collected > 0 {
            debug!(window = self.window.0, collected, "collected stale control state");
        }

        let summary = FrameSummary {
            controls: cx.tree.len() - 1,
            draw_calls: cx.render.commands().len(),
            vertices: cx.render.vertices().len(),
            indices: cx.render.indices().len(),
            usage_errors: cx.usage_errors.len(),
            buffer_error: result.err(),
            collected,
        };
        debug!(
            window = self.window.0,
            controls = summary.controls,
            draw_calls = summary.draw_calls,
            vertices = summary.vertices,
            culled = stats.culled,
            "frame built"
        );
        cx.summary = summary;
        summary
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        if !self.finished && !std::thread::panicking() {
            self.finish();
        }
    }
}

/// Guard returned by [`Frame::with_overrides`]. Derefs to the frame; the
/// overrides it pushed are popped when it drops, on every exit path.
pub struct OverrideScope<'f, 's> {
    frame: &'f mut Frame<'s>,
    depth: usize,
}

impl<'s> Deref for OverrideScope<'_, 's> {
    type Target = Frame<'s>;

    fn deref(&self) -> &Self::Target {
        &*self.frame
    }
}

impl<'s> DerefMut for OverrideScope<'_, 's> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.frame
    }
}

impl Drop for OverrideScope<'_, '_> {
    fn drop(&mut self) {
        self.frame.cx.overrides.restore(self.depth);
    }
}
