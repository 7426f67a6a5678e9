//! Keyboard focus cursor.

use crate::id::ControlId;

/// The single focused control of a window plus its position in tab order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusCursor {
    focused: Option<ControlId>,
    tab_index: Option<usize>,
}

impl FocusCursor {
    /// Focused control, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    /// Returns true if `id` holds focus.
    #[must_use]
    pub fn is_focused(&self, id: ControlId) -> bool {
        self.focused == Some(id)
    }

    /// Focuses `id`, looking up its tab position in `order`.
    pub fn focus(&mut self, id: ControlId, order: &[ControlId]) {
        self.focused = Some(id);
        self.tab_index = order.iter().position(|&c| c == id);
    }

    /// Drops focus.
    pub fn clear(&mut self) {
        self.focused = None;
        self.tab_index = None;
    }

    /// Re-syncs against this frame's tab order. Focus on a control that was not
    /// declared is dropped. Returns false if focus was lost.
    pub fn sync(&mut self, order: &[ControlId], declared: impl Fn(ControlId) -> bool) -> bool {
        let Some(id) = self.focused else {
            return true;
        };
        if !declared(id) {
            self.clear();
            return false;
        }
        self.tab_index = order.iter().position(|&c| c == id);
        true
    }

    /// Advances along `order`, wrapping from the last control to the first.
    pub fn next(&mut self, order: &[ControlId]) -> Option<ControlId> {
        if order.is_empty() {
            return None;
        }
        let index = self.tab_index.map_or(0, |i| (i + 1) % order.len());
        self.focused = Some(order[index]);
        self.tab_index = Some(index);
        self.focused
    }

    /// Steps back along `order`, wrapping from the first control to the last.
    pub fn previous(&mut self, order: &[ControlId]) -> Option<ControlId> {
        if order.is_empty() {
            return None;
        }
        let len = order.len();
        let index = self.tab_index.map_or(len - 1, |i| (i + len - 1) % len);
        self.focused = Some(order[index]);
        self.tab_index = Some(index);
        self.focused
    }
}
