//! Core control types.

use std::ops::Range;

use crate::id::ControlId;
use crate::layout::{Alignment, Direction, Rect, Size, Sizing};
use crate::render::{TextureId, UvRect};

/// What a control is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Implicit per-window container; lays out like a column.
    Root,
    /// Horizontal container.
    Row,
    /// Vertical container.
    Column,
    /// Vertical container with a scrolled, clipped viewport.
    ScrollView,
    /// Static text.
    Text,
    /// Textured rectangle.
    Image,
    /// Push button.
    Button,
    /// Toggle with a check box.
    Checkbox,
    /// Mutually exclusive member of a group.
    Radio,
    /// Selectable row; clicking a selected one deselects it.
    Selectable,
    /// Horizontal value slider.
    Slider,
    /// Single-line text or number entry.
    TextBox,
    /// Invisible fill-sized gap.
    Spacer,
}

impl ControlKind {
    /// Returns true for kinds that hold children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Root | Self::Row | Self::Column | Self::ScrollView)
    }

    /// Flow axis of a container.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Row => Direction::Horizontal,
            _ => Direction::Vertical,
        }
    }

    /// Flags every control of this kind starts with.
    #[must_use]
    pub const fn default_flags(self) -> ControlFlags {
        match self {
            Self::Button
            | Self::Checkbox
            | Self::Radio
            | Self::Selectable
            | Self::Slider
            | Self::TextBox => ControlFlags(ControlFlags::INTERACTIVE | ControlFlags::FOCUSABLE),
            Self::ScrollView => ControlFlags(ControlFlags::INTERACTIVE | ControlFlags::CLIPS),
            _ => ControlFlags(0),
        }
    }

    /// Sizing used when no override is in effect.
    #[must_use]
    pub const fn default_sizing(self) -> (Sizing, Sizing) {
        match self {
            Self::ScrollView | Self::Spacer => (Sizing::FILL, Sizing::FILL),
            _ => (Sizing::Fit, Sizing::Fit),
        }
    }
}

/// Control flags (bitfield for efficiency).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags(u32);

impl ControlFlags {
    /// Can be hit by the pointer.
    pub const INTERACTIVE: u32 = 1 << 0;
    /// Takes part in tab order.
    pub const FOCUSABLE: u32 = 1 << 1;
    /// Text wraps at the control's width.
    pub const WRAP: u32 = 1 << 2;
    /// Children are clipped to this control's rectangle.
    pub const CLIPS: u32 = 1 << 3;
    /// Text box parses its content as a number.
    pub const NUMERIC: u32 = 1 << 4;

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }
}

/// Image payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRef {
    /// Texture to sample.
    pub texture: TextureId,
    /// Region of the texture.
    pub uv: UvRect,
    /// Native pixel size.
    pub size: Size,
}

impl ImageRef {
    /// Whole texture at the given pixel size.
    #[must_use]
    pub const fn new(texture: TextureId, width: f32, height: f32) -> Self {
        Self {
            texture,
            uv: UvRect::FULL,
            size: Size::new(width, height),
        }
    }
}

/// One control of this frame's tree.
///
/// Links are arena indices into the owning `ControlTree`. Since controls are
/// appended in declaration order, a parent always precedes its children and
/// a subtree occupies the contiguous index range `index..subtree_end`.
#[derive(Debug, Clone)]
pub struct Control {
    /// Identity.
    pub id: ControlId,
    /// Kind.
    pub kind: ControlKind,
    /// Parent index (None for the root).
    pub parent: Option<usize>,
    /// First child index.
    pub first_child: Option<usize>,
    /// Last child index.
    pub last_child: Option<usize>,
    /// Next sibling index.
    pub next_sibling: Option<usize>,
    /// Number of direct children.
    pub child_count: u32,
    /// One past the last index of this control's subtree.
    pub subtree_end: usize,
    /// Width sizing in effect at declaration.
    pub width: Sizing,
    /// Height sizing in effect at declaration.
    pub height: Sizing,
    /// Cross-axis alignment in effect at declaration.
    pub align: Alignment,
    /// Gap between children (containers only).
    pub spacing: f32,
    /// Flags.
    pub flags: ControlFlags,
    /// Text payload, as a range into the tree's text arena.
    pub label: Range<usize>,
    /// Image payload.
    pub image: Option<ImageRef>,
    /// Slider range.
    pub range: (f32, f32),
    /// Radio/selectable group register.
    pub group: ControlId,
    /// Size from the measure pass.
    pub measured: Size,
    /// Children extent from the measure pass (containers only).
    pub content: Size,
    /// Final rectangle from the arrange pass.
    pub rect: Rect,
    /// Effective clip rectangle from enclosing scroll views.
    pub clip: Option<Rect>,
}

impl Control {
    /// Creates a control with kind defaults.
    #[must_use]
    pub fn new(id: ControlId, kind: ControlKind) -> Self {
        let (width, height) = kind.default_sizing();
        Self {
            id,
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            child_count: 0,
            subtree_end: 0,
            width,
            height,
            align: Alignment::Start,
            spacing: 0.0,
            flags: kind.default_flags(),
            label: 0..0,
            image: None,
            range: (0.0, 1.0),
            group: ControlId::ROOT,
            measured: Size::ZERO,
            content: Size::ZERO,
            rect: Rect::ZERO,
            clip: None,
        }
    }

    /// Returns true if the pointer can hit this control at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn hit(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y) && self.clip.map_or(true, |clip| clip.contains(x, y))
    }

    /// Returns true if the control is interactive.
    #[inline]
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.flags.has(ControlFlags::INTERACTIVE)
    }

    /// Returns true if the control takes part in tab order.
    #[inline]
    #[must_use]
    pub const fn is_focusable(&self) -> bool {
        self.flags.has(ControlFlags::FOCUSABLE)
    }

    /// Rectangle actually visible after clipping.
    #[must_use]
    pub fn visible_rect(&self) -> Option<Rect> {
        match self.clip {
            Some(clip) => self.rect.intersection(&clip),
            None => Some(self.rect),
        }
    }
}

/// Interaction state of a control, derived from routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    /// Nothing happening.
    #[default]
    Idle,
    /// Pointer over the control.
    Hovered,
    /// Held by the pointer or the activate key.
    Pressed,
    /// Holds keyboard focus.
    Focused,
}

/// What routing did to one control this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    /// Pointer is over the control (topmost hit).
    pub hovered: bool,
    /// Control is held after routing.
    pub pressed: bool,
    /// Press transition this frame.
    pub press_started: bool,
    /// Gained focus from a pointer press this frame.
    pub focus_pressed: bool,
    /// Released over the same control that was pressed.
    pub activated: bool,
    /// Holds keyboard focus after routing.
    pub focused: bool,
    /// Persistent value changed (toggle, selection, slider, text).
    pub changed: bool,
}

impl Response {
    /// Collapses the flags into the dominant interaction state.
    #[must_use]
    pub const fn interaction(&self) -> Interaction {
        if self.pressed {
            Interaction::Pressed
        } else if self.focused {
            Interaction::Focused
        } else if self.hovered {
            Interaction::Hovered
        } else {
            Interaction::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut flags = ControlKind::Button.default_flags();
        assert!(flags.has(ControlFlags::FOCUSABLE));
        assert!(!flags.has(ControlFlags::WRAP));
        flags.set(ControlFlags::WRAP);
        flags.clear(ControlFlags::FOCUSABLE);
        assert!(flags.has(ControlFlags::WRAP));
        assert!(!flags.has(ControlFlags::FOCUSABLE));
    }

    #[test]
    fn test_hit_respects_clip() {
        let mut control = Control::new(ControlId::new(1), ControlKind::Button);
        control.rect = Rect::new(0.0, 90.0, 50.0, 20.0);
        control.clip = Some(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(control.hit(10.0, 95.0));
        assert!(!control.hit(10.0, 105.0));

        control.clip = Some(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(!control.hit(10.0, 95.0));
        assert_eq!(control.visible_rect(), None);
    }

    #[test]
    fn test_interaction_priority() {
        let response = Response {
            hovered: true,
            focused: true,
            ..Response::default()
        };
        assert_eq!(response.interaction(), Interaction::Focused);
        assert_eq!(
            Response {
                pressed: true,
                ..response
            }
            .interaction(),
            Interaction::Pressed
        );
        assert_eq!(Response::default().interaction(), Interaction::Idle);
    }
}
