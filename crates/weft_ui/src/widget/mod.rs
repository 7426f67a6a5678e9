//! Control records and the per-frame control tree.

mod core;
mod tree;

pub use self::core::{Control, ControlFlags, ControlKind, ImageRef, Interaction, Response};
pub use tree::{Children, ControlTree};
