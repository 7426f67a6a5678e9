//! Persistent control store.
//!
//! The only state that survives between frames. Entries are keyed by
//! [`ControlId`], created lazily the first time a control is observed, and
//! collected once a control has gone unobserved for too many frames.

mod scroll;
mod text_edit;

pub use scroll::ScrollState;
pub use text_edit::{NumericMode, TextEditState};

use std::collections::HashMap;

use crate::id::ControlId;
use crate::layout::Size;

/// Per-control persistent record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ControlState {
    /// Observed, nothing stored yet.
    #[default]
    Empty,
    /// Scroll view offset and extents.
    Scroll(ScrollState),
    /// Text box buffer, cursor and selection.
    TextEdit(TextEditState),
    /// Checkbox value.
    Toggle(bool),
    /// Group register holding the selected member.
    Select(Option<ControlId>),
    /// Slider value.
    Value(f32),
}

#[derive(Debug, Clone, Default)]
struct Entry {
    state: ControlState,
    size_hint: Option<Size>,
    last_seen: u64,
}

/// Store of per-control state for one window.
#[derive(Debug, Default)]
pub struct ControlStore {
    entries: HashMap<ControlId, Entry>,
    frame: u64,
}

macro_rules! typed_access {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        /// Stored value, if this control holds one of this kind.
        #[must_use]
        pub fn $get(&self, id: ControlId) -> Option<&$ty> {
            match self.entries.get(&id).map(|e| &e.state) {
                Some(ControlState::$variant(value)) => Some(value),
                _ => None,
            }
        }

        /// Stored value, created with `init` if missing or of another kind.
        pub fn $get_mut(&mut self, id: ControlId, init: impl FnOnce() -> $ty) -> &mut $ty {
            let entry = self.touch(id);
            if !matches!(entry.state, ControlState::$variant(_)) {
                entry.state = ControlState::$variant(init());
            }
            match &mut entry.state {
                ControlState::$variant(value) => value,
                _ => unreachable!(),
            }
        }
    };
}

impl ControlStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(256),
            frame: 0,
        }
    }

    /// Advances the frame counter used for garbage collection.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Current frame number.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    fn touch(&mut self, id: ControlId) -> &mut Entry {
        let frame = self.frame;
        let entry = self.entries.entry(id).or_default();
        entry.last_seen = frame;
        entry
    }

    /// Marks a control as declared this frame, creating its entry if needed.
    pub fn observe(&mut self, id: ControlId) {
        self.touch(id);
    }

    /// Returns true if the store has an entry for `id`.
    #[must_use]
    pub fn contains(&self, id: ControlId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Raw state of a control.
    #[must_use]
    pub fn get(&self, id: ControlId) -> Option<&ControlState> {
        self.entries.get(&id).map(|e| &e.state)
    }

    typed_access!(scroll, scroll_mut, Scroll, ScrollState);
    typed_access!(text_edit, text_edit_mut, TextEdit, TextEditState);
    typed_access!(toggle, toggle_mut, Toggle, bool);
    typed_access!(select, select_mut, Select, Option<ControlId>);
    typed_access!(value, value_mut, Value, f32);

    /// Size the control was arranged at last time it was laid out.
    #[must_use]
    pub fn size_hint(&self, id: ControlId) -> Option<Size> {
        self.entries.get(&id).and_then(|e| e.size_hint)
    }

    /// Caches the arranged size of a control for next frame's measure pass.
    pub fn set_size_hint(&mut self, id: ControlId, size: Size) {
        self.touch(id).size_hint = Some(size);
    }

    /// Drops entries not observed during the last `max_age` frames.
    /// Returns the number of entries removed.
    pub fn collect_garbage(&mut self, max_age: u64) -> usize {
        let frame = self.frame;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| frame.saturating_sub(entry.last_seen) <= max_age);
        before - self.entries.len()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
