//! # Interaction Integration Tests
//!
//! Focus, pointer and keyboard routing, scrolling, persistent state and
//! render batching across several frames.
//!
//! Run with: cargo test -p weft_ui --test interaction_test

use weft_ui::{
    ControlId, Frame, ImageRef, InputAction, InputSnapshot, LayoutOverride, MonospaceMeasurer,
    MouseButton, Rect, Sizing, TextureId, UiConfig, UiSession, WindowId,
};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

fn session_with(config: UiConfig) -> UiSession {
    UiSession::new(config, MonospaceMeasurer::default()).unwrap()
}

fn session() -> UiSession {
    session_with(UiConfig {
        panic_on_misuse: false,
        ..UiConfig::default()
    })
}

fn run<R>(ui: &mut UiSession, input: &InputSnapshot, body: impl FnOnce(&mut Frame<'_>) -> R) -> R {
    let mut frame = ui.begin_frame(WindowId::MAIN, VIEWPORT, input);
    let result = body(&mut frame);
    frame.end();
    result
}

fn actions(list: &[InputAction]) -> InputSnapshot {
    let mut input = InputSnapshot::at(-100.0, -100.0);
    for &action in list {
        input.action(action);
    }
    input
}

fn click_at(x: f32, y: f32) -> InputSnapshot {
    let mut input = InputSnapshot::at(x, y);
    input.click(MouseButton::Left);
    input
}

// ============================================================================
// FOCUS
// ============================================================================

#[test]
fn test_tab_cycles_and_wraps() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| {
        f.text("not focusable");
        [f.button("a"), f.button("b"), f.button("c")]
    };
    let tab = actions(&[InputAction::FocusNext]);

    let ids = run(&mut ui, &InputSnapshot::new(), declare);
    assert_eq!(ui.focused(WindowId::MAIN), None);

    for expected in [ids[0], ids[1], ids[2], ids[0]] {
        run(&mut ui, &tab, declare);
        assert_eq!(ui.focused(WindowId::MAIN), Some(expected));
    }

    run(&mut ui, &actions(&[InputAction::FocusPrevious]), declare);
    assert_eq!(ui.focused(WindowId::MAIN), Some(ids[2]));
}

#[test]
fn test_focus_cleared_when_control_disappears() {
    let mut ui = session();
    let tab = actions(&[InputAction::FocusNext]);

    run(&mut ui, &tab, |f| {
        f.button("gone soon");
    });
    assert!(ui.focused(WindowId::MAIN).is_some());

    run(&mut ui, &InputSnapshot::new(), |f| {
        f.text("nothing to focus");
    });
    assert_eq!(ui.focused(WindowId::MAIN), None);
}

#[test]
fn test_keyboard_activation() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.button("Go");

    let go = run(&mut ui, &actions(&[InputAction::FocusNext]), declare);
    run(
        &mut ui,
        &actions(&[InputAction::ActivatePressed, InputAction::ActivateReleased]),
        declare,
    );

    assert!(ui.response(WindowId::MAIN, go).activated);
}

// ============================================================================
// POINTER
// ============================================================================

#[test]
fn test_checkbox_click_toggles_persistent_value() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.checkbox("Wireframe", false);

    let first = run(&mut ui, &InputSnapshot::new(), declare);
    assert!(!first.value);

    let (x, y) = ui.rect(WindowId::MAIN, first.id).unwrap().center();
    run(&mut ui, &click_at(x, y), declare);
    let response = ui.response(WindowId::MAIN, first.id);
    assert!(response.activated && response.changed);
    assert_eq!(ui.toggled(WindowId::MAIN, first.id), Some(true));

    let third = run(&mut ui, &InputSnapshot::at(x, y), declare);
    assert!(third.value);
}

#[test]
fn test_press_released_elsewhere_cancels() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.button("Careful");

    let id = run(&mut ui, &InputSnapshot::new(), declare);
    let (x, y) = ui.rect(WindowId::MAIN, id).unwrap().center();

    let mut press = InputSnapshot::at(x, y);
    press.mouse_button_down(MouseButton::Left);
    run(&mut ui, &press, declare);
    assert!(ui.response(WindowId::MAIN, id).pressed);

    press.begin_frame();
    press.set_mouse_pos(700.0, 500.0);
    press.mouse_button_up(MouseButton::Left);
    run(&mut ui, &press, declare);
    let response = ui.response(WindowId::MAIN, id);
    assert!(!response.activated);
    assert!(!response.pressed);
}

#[test]
fn test_radio_group_selects_one() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| {
        f.group("quality", |f| {
            [
                f.radio("Low", false).id,
                f.radio("Medium", true).id,
                f.radio("High", false).id,
            ]
        })
    };

    let (group, ids) = run(&mut ui, &InputSnapshot::new(), declare);
    assert_eq!(ui.selected(WindowId::MAIN, group), Some(ids[1]));

    let (x, y) = ui.rect(WindowId::MAIN, ids[2]).unwrap().center();
    run(&mut ui, &click_at(x, y), declare);
    assert_eq!(ui.selected(WindowId::MAIN, group), Some(ids[2]));
}

#[test]
fn test_selectable_toggles_off() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.selectable("Item").id;

    let id = run(&mut ui, &InputSnapshot::new(), declare);
    let (x, y) = ui.rect(WindowId::MAIN, id).unwrap().center();

    run(&mut ui, &click_at(x, y), declare);
    assert_eq!(ui.selected(WindowId::MAIN, ControlId::ROOT), Some(id));

    run(&mut ui, &click_at(x, y), declare);
    assert_eq!(ui.selected(WindowId::MAIN, ControlId::ROOT), None);
}

#[test]
fn test_groups_keep_separate_selections() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| {
        let (left, left_item) = f.group("left", |f| f.selectable("Item").id);
        let (right, right_item) = f.group("right", |f| f.selectable("Item").id);
        (left, left_item, right, right_item)
    };

    let (left, left_item, right, right_item) = run(&mut ui, &InputSnapshot::new(), declare);
    assert_ne!(left, right);
    assert_ne!(left_item, right_item);

    let (x, y) = ui.rect(WindowId::MAIN, right_item).unwrap().center();
    run(&mut ui, &click_at(x, y), declare);
    assert_eq!(ui.selected(WindowId::MAIN, right), Some(right_item));
    assert_eq!(ui.selected(WindowId::MAIN, left), None);
    assert_eq!(ui.selected(WindowId::MAIN, ControlId::ROOT), None);

    let (x, y) = ui.rect(WindowId::MAIN, left_item).unwrap().center();
    run(&mut ui, &click_at(x, y), declare);
    assert_eq!(ui.selected(WindowId::MAIN, left), Some(left_item));
    assert_eq!(ui.selected(WindowId::MAIN, right), Some(right_item));
}

#[test]
fn test_slider_follows_pointer() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.slider("volume", 0.0..=1.0, 0.5);

    let slider = run(&mut ui, &InputSnapshot::new(), declare);
    assert_eq!(slider.value, 0.5);

    let rect = ui.rect(WindowId::MAIN, slider.id).unwrap();
    run(&mut ui, &click_at(rect.right() + 50.0, rect.y + 1.0), declare);
    // Outside the track: no hit, no change.
    assert_eq!(ui.slider_value(WindowId::MAIN, slider.id), Some(0.5));

    run(&mut ui, &click_at(rect.right() - 1.0, rect.y + 1.0), declare);
    assert_eq!(ui.slider_value(WindowId::MAIN, slider.id), Some(1.0));
}

// ============================================================================
// TEXT ENTRY
// ============================================================================

#[test]
fn test_number_box_commits_and_reverts() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.number_box("count", 5.0);

    let number = run(&mut ui, &actions(&[InputAction::FocusNext]), declare);
    assert_eq!(number.value, 5.0);
    assert_eq!(ui.text(WindowId::MAIN, number.id), Some("5"));

    let mut typing = actions(&[InputAction::End, InputAction::Backspace]);
    typing.push_text("42");
    run(&mut ui, &typing, declare);
    assert_eq!(ui.text(WindowId::MAIN, number.id), Some("42"));
    assert_eq!(ui.number(WindowId::MAIN, number.id), Some(5.0));

    run(
        &mut ui,
        &actions(&[InputAction::ActivatePressed, InputAction::ActivateReleased]),
        declare,
    );
    assert_eq!(ui.number(WindowId::MAIN, number.id), Some(42.0));

    let mut junk = InputSnapshot::new();
    junk.push_text("zz");
    run(&mut ui, &junk, declare);
    assert_eq!(ui.text(WindowId::MAIN, number.id), Some("42zz"));

    // Clicking empty space blurs and commits; the bad text reverts.
    run(&mut ui, &click_at(700.0, 500.0), declare);
    assert_eq!(ui.focused(WindowId::MAIN), None);
    assert_eq!(ui.text(WindowId::MAIN, number.id), Some("42"));
    assert_eq!(ui.number(WindowId::MAIN, number.id), Some(42.0));
}

#[test]
fn test_strict_number_box_rejects_unparsable_keystrokes() {
    let mut ui = session_with(UiConfig {
        panic_on_misuse: false,
        strict_numeric_input: true,
        ..UiConfig::default()
    });
    let declare = |f: &mut Frame<'_>| f.number_box("count", 5.0);

    let number = run(&mut ui, &actions(&[InputAction::FocusNext]), declare);
    let mut typing = InputSnapshot::new();
    typing.push_text("1x2");
    run(&mut ui, &typing, declare);
    assert_eq!(ui.text(WindowId::MAIN, number.id), Some("512"));

    let mut trailing_sign = InputSnapshot::new();
    trailing_sign.push_text("-");
    run(&mut ui, &trailing_sign, declare);
    assert_eq!(ui.text(WindowId::MAIN, number.id), Some("512"));

    run(
        &mut ui,
        &actions(&[InputAction::ActivatePressed, InputAction::ActivateReleased]),
        declare,
    );
    assert_eq!(ui.number(WindowId::MAIN, number.id), Some(512.0));
}

#[test]
fn test_text_box_drag_selects() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.text_box("name", "hello world");

    let name = run(&mut ui, &InputSnapshot::new(), declare);
    let rect = ui.rect(WindowId::MAIN, name.id).unwrap();
    let padding = ui.config().style.padding;
    let y = rect.y + rect.height * 0.5;

    // Press before the first glyph, then drag to the boundary after "hello".
    let mut input = InputSnapshot::at(rect.x + padding + 1.0, y);
    input.mouse_button_down(MouseButton::Left);
    run(&mut ui, &input, declare);
    assert_eq!(ui.focused(WindowId::MAIN), Some(name.id));

    input.begin_frame();
    input.set_mouse_pos(rect.x + padding + 5.0 * 8.0, y);
    run(&mut ui, &input, declare);

    let edit = ui
        .store(WindowId::MAIN)
        .and_then(|store| store.text_edit(name.id))
        .unwrap();
    assert_eq!(edit.selection(), Some(0..5));
    assert_eq!(edit.cursor(), 5);

    input.begin_frame();
    input.mouse_button_up(MouseButton::Left);
    run(&mut ui, &input, declare);
    assert_eq!(ui.text(WindowId::MAIN, name.id), Some("hello world"));
}

#[test]
fn test_text_box_ignores_control_characters() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| f.text_box("name", "");

    let name = run(&mut ui, &actions(&[InputAction::FocusNext]), declare);
    let mut input = InputSnapshot::new();
    input.push_text("a\tb\u{7f}c\n");
    run(&mut ui, &input, declare);

    assert_eq!(ui.text(WindowId::MAIN, name.id), Some("abc"));
    assert!(ui.response(WindowId::MAIN, name.id).changed);
}

// ============================================================================
// SCROLLING
// ============================================================================

fn scroll_list(f: &mut Frame<'_>) -> (ControlId, ControlId) {
    let view = f.scoped(LayoutOverride::default().height(Sizing::Fixed(100.0)), |f| {
        f.begin_scroll_view("list")
    });
    let first = f.text("row");
    for _ in 1..20 {
        f.text("row");
    }
    f.end_scroll_view();
    (view, first)
}

#[test]
fn test_wheel_scroll_clamps_to_content() {
    let mut ui = session();
    let (view, _) = run(&mut ui, &InputSnapshot::new(), scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, 0.0)));

    // 20 rows of 16px with 4px gaps in a 100px viewport.
    let max = 20.0 * 16.0 + 19.0 * 4.0 - 100.0;

    let mut down = InputSnapshot::at(10.0, 50.0);
    down.scroll(0.0, -100.0);
    let (_, first) = run(&mut ui, &down, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, max)));
    assert_eq!(ui.rect(WindowId::MAIN, first).unwrap().y, -max);

    let mut up = InputSnapshot::at(10.0, 50.0);
    up.scroll(0.0, 1.0);
    run(&mut ui, &up, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, max - 24.0)));
}

#[test]
fn test_wheel_outside_view_is_ignored() {
    let mut ui = session();
    let (view, _) = run(&mut ui, &InputSnapshot::new(), scroll_list);

    let mut outside = InputSnapshot::at(10.0, 300.0);
    outside.scroll(0.0, -5.0);
    run(&mut ui, &outside, scroll_list);

    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, 0.0)));
}

#[test]
fn test_drag_scroll_clamps_to_content() {
    let mut ui = session();
    let (view, _) = run(&mut ui, &InputSnapshot::new(), scroll_list);
    let max = 20.0 * 16.0 + 19.0 * 4.0 - 100.0;

    let mut input = InputSnapshot::at(10.0, 90.0);
    input.mouse_button_down(MouseButton::Left);
    run(&mut ui, &input, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, 0.0)));

    // Content follows the pointer.
    input.begin_frame();
    input.set_mouse_pos(10.0, 60.0);
    run(&mut ui, &input, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, 30.0)));

    input.begin_frame();
    input.set_mouse_pos(10.0, -5000.0);
    let (_, first) = run(&mut ui, &input, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, max)));
    assert_eq!(ui.rect(WindowId::MAIN, first).unwrap().y, -max);

    input.begin_frame();
    input.set_mouse_pos(10.0, 5000.0);
    run(&mut ui, &input, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, 0.0)));

    // Released: further motion does nothing.
    input.begin_frame();
    input.mouse_button_up(MouseButton::Left);
    run(&mut ui, &input, scroll_list);
    input.begin_frame();
    input.set_mouse_pos(10.0, -5000.0);
    run(&mut ui, &input, scroll_list);
    assert_eq!(ui.scroll_offset(WindowId::MAIN, view), Some((0.0, 0.0)));
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn test_images_batch_by_texture() {
    let mut ui = session();
    let a = TextureId(10);
    let b = TextureId(11);

    let summary = {
        let input = InputSnapshot::new();
        let mut frame = ui.begin_frame(WindowId::MAIN, VIEWPORT, &input);
        frame.image(ImageRef::new(a, 8.0, 8.0));
        frame.image(ImageRef::new(a, 8.0, 8.0));
        frame.image(ImageRef::new(b, 8.0, 8.0));
        frame.image(ImageRef::new(a, 8.0, 8.0));
        frame.end()
    };

    let render = ui.render(WindowId::MAIN).unwrap();
    let textures: Vec<_> = render.commands().iter().map(|c| c.texture).collect();
    assert_eq!(textures, vec![Some(a), Some(b), Some(a)]);
    let counts: Vec<u32> = render.commands().iter().map(|c| c.index_count).collect();
    assert_eq!(counts, vec![12, 6, 6]);
    assert_eq!(summary.vertices, 16);
    assert_eq!(render.vertex_bytes().len(), 16 * std::mem::size_of::<weft_ui::Vertex>());
}

#[test]
fn test_buffer_limit_reports_error() {
    let mut ui = session_with(UiConfig {
        panic_on_misuse: false,
        max_vertices: 8,
        max_indices: 12,
        ..UiConfig::default()
    });

    let summary = {
        let input = InputSnapshot::new();
        let mut frame = ui.begin_frame(WindowId::MAIN, VIEWPORT, &input);
        for _ in 0..4 {
            frame.image(ImageRef::new(TextureId(1), 8.0, 8.0));
        }
        frame.end()
    };

    assert!(summary.buffer_error.is_some());
    assert!(summary.vertices <= 8);
}

#[test]
fn test_lowered_buffer_limits_apply_to_open_windows() {
    let mut ui = session();
    let declare = |f: &mut Frame<'_>| {
        for _ in 0..4 {
            f.image(ImageRef::new(TextureId(1), 8.0, 8.0));
        }
    };
    let summary = {
        let input = InputSnapshot::new();
        let mut frame = ui.begin_frame(WindowId::MAIN, VIEWPORT, &input);
        declare(&mut frame);
        frame.end()
    };
    assert!(summary.buffer_error.is_none());

    let mut config = ui.config().clone();
    config.max_vertices = 8;
    config.max_indices = 12;
    ui.set_config(config).unwrap();

    let summary = {
        let input = InputSnapshot::new();
        let mut frame = ui.begin_frame(WindowId::MAIN, VIEWPORT, &input);
        declare(&mut frame);
        frame.end()
    };
    assert!(summary.buffer_error.is_some());
    assert_eq!(summary.vertices, 8);
}

// ============================================================================
// SESSION
// ============================================================================

#[test]
fn test_stale_state_is_collected() {
    let mut ui = session_with(UiConfig {
        panic_on_misuse: false,
        gc_after_frames: 2,
        ..UiConfig::default()
    });
    let idle = InputSnapshot::new();

    let checkbox = run(&mut ui, &idle, |f| f.checkbox("Temp", true));
    for _ in 0..5 {
        run(&mut ui, &idle, |f| {
            f.text("elsewhere");
        });
    }
    assert_eq!(ui.toggled(WindowId::MAIN, checkbox.id), None);

    let back = run(&mut ui, &idle, |f| f.checkbox("Temp", false));
    assert_eq!(back.id, checkbox.id);
    assert!(!back.value);
}

#[test]
fn test_windows_are_independent() {
    let mut ui = session();
    let other = WindowId(1);
    let tab = actions(&[InputAction::FocusNext]);

    let main_button = run(&mut ui, &tab, |f| f.button("Same"));
    let other_button = {
        let input = InputSnapshot::new();
        let mut frame = ui.begin_frame(other, VIEWPORT, &input);
        let id = frame.button("Same");
        frame.end();
        id
    };

    assert_eq!(main_button, other_button);
    assert_eq!(ui.focused(WindowId::MAIN), Some(main_button));
    assert_eq!(ui.focused(other), None);
    assert_eq!(ui.window_count(), 2);

    assert!(ui.close_window(other));
    assert!(ui.render(other).is_none());
}

#[test]
fn test_dropped_frame_still_finishes() {
    let mut ui = session();
    {
        let input = InputSnapshot::new();
        let mut frame = ui.begin_frame(WindowId::MAIN, VIEWPORT, &input);
        frame.button("dropped");
    }
    let summary = ui.last_summary(WindowId::MAIN).unwrap();
    assert_eq!(summary.controls, 1);
    assert!(summary.draw_calls > 0);
}
