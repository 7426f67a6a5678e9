//! Input handling for UI.
//!
//! The engine owns no event loop. The host fills an [`InputSnapshot`] from
//! platform events each frame and hands it to `UiSession::begin_frame`.

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Discrete, already-translated input action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move keyboard focus to the next focusable control.
    FocusNext,
    /// Move keyboard focus to the previous focusable control.
    FocusPrevious,
    /// Directional navigation left.
    Left,
    /// Directional navigation right.
    Right,
    /// Directional navigation up.
    Up,
    /// Directional navigation down.
    Down,
    /// Delete the char before the cursor.
    Backspace,
    /// Delete the char after the cursor.
    Delete,
    /// Jump to the start.
    Home,
    /// Jump to the end.
    End,
    /// Keyboard activation pressed on the focused control.
    ActivatePressed,
    /// Keyboard activation released on the focused control.
    ActivateReleased,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

/// Normalized input for one frame.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Current mouse X position.
    pub mouse_x: f32,
    /// Current mouse Y position.
    pub mouse_y: f32,
    /// Mouse buttons pressed this frame.
    buttons_pressed: u8,
    /// Mouse buttons released this frame.
    buttons_released: u8,
    /// Mouse buttons currently held.
    buttons_down: u8,
    /// Wheel delta (x, y); positive y scrolls toward the top.
    pub wheel: (f32, f32),
    /// Modifier keys state.
    pub modifiers: Modifiers,
    /// Actions in the order they happened.
    actions: Vec<InputAction>,
    /// Text input this frame.
    pub text: String,
}

impl InputSnapshot {
    /// Creates a new empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with the pointer at `(x, y)` and nothing else.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        let mut input = Self::new();
        input.set_mouse_pos(x, y);
        input
    }

    /// Begins a new frame, clearing per-frame state. Held buttons and the
    /// pointer position carry over.
    pub fn begin_frame(&mut self) {
        self.buttons_pressed = 0;
        self.buttons_released = 0;
        self.wheel = (0.0, 0.0);
        self.actions.clear();
        self.text.clear();
    }

    /// Updates mouse position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_pressed |= mask;
        self.buttons_down |= mask;
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_released |= mask;
        self.buttons_down &= !mask;
    }

    /// Records a press and release of `button` within this frame.
    pub fn click(&mut self, button: MouseButton) {
        self.mouse_button_down(button);
        self.mouse_button_up(button);
    }

    /// Records wheel input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.wheel.0 += dx;
        self.wheel.1 += dy;
    }

    /// Records an action.
    pub fn action(&mut self, action: InputAction) {
        self.actions.push(action);
    }

    /// Records text input.
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Returns true if the mouse button was pressed this frame.
    #[must_use]
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        (self.buttons_pressed & Self::button_mask(button)) != 0
    }

    /// Returns true if the mouse button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        (self.buttons_released & Self::button_mask(button)) != 0
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Actions recorded this frame, in order.
    #[must_use]
    pub fn actions(&self) -> &[InputAction] {
        &self.actions
    }

    /// Mouse position as a tuple.
    #[must_use]
    pub const fn mouse(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}
