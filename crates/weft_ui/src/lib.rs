//! # WEFT UI
//!
//! Immediate-mode interface engine. The application re-declares its whole
//! control tree every frame; the engine keeps what must survive between
//! frames (toggles, slider values, text buffers, scroll offsets, focus)
//! keyed by positional control identity.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       FRAME PIPELINE                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  Declare → Measure → Arrange → Route → Batch → Collect     │
//! │     ↓         ↓         ↓        ↓       ↓        ↓        │
//! │  IdStack   Intrinsic  Rects   Focus   Quads   Stale state  │
//! │  + tree    sizes      + clip  + hits  + draws  dropped     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut ui = UiSession::new(UiConfig::default(), MonospaceMeasurer::default())?;
//! let mut frame = ui.begin_frame(WindowId::MAIN, viewport, &input);
//! let ok = frame.column(|f| {
//!     f.text("Header");
//!     f.button("OK")
//! });
//! frame.end();
//!
//! if ui.response(WindowId::MAIN, ok).activated {
//!     // ...
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod focus;
pub mod id;
pub mod input;
pub mod layout;
pub mod paint;
pub mod render;
pub mod router;
pub mod session;
pub mod state;
pub mod style;
pub mod text;
pub mod widget;

pub use config::UiConfig;
pub use error::{UiError, UiResult};
pub use focus::FocusCursor;
pub use id::{discriminator, ControlId, IdStack};
pub use input::{InputAction, InputSnapshot, Modifiers, MouseButton};
pub use layout::{Alignment, Direction, LayoutSolver, Rect, Size, Sizing};
pub use render::{
    AllResident, BatchStats, Batcher, DrawCommand, TextureId, TextureResolver, UvRect, Vertex,
    WindowRender,
};
pub use router::Router;
pub use session::{Declared, Frame, FrameSummary, OverrideScope, UiSession, WindowId};
pub use state::{ControlState, ControlStore, ScrollState, TextEditState};
pub use style::{Color, LayoutOverride, OverrideStack, Style};
pub use text::{FontId, Glyph, MonospaceMeasurer, TextMeasurer, TextRun};
pub use widget::{Control, ControlFlags, ControlKind, ControlTree, ImageRef, Interaction, Response};
