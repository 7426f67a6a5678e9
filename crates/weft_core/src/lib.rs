//! # WEFT Core
//!
//! Storage primitives shared by the WEFT UI engine.
//!
//! ## Architecture Rules
//!
//! 1. **Fallible growth** - Every buffer growth returns a `CoreResult`
//! 2. **Hard limits** - Buffers carry an element limit checked before allocating
//! 3. **Reuse** - Clearing keeps capacity so steady-state frames do not allocate
//!
//! ## Example
//!
//! ```rust,ignore
//! use weft_core::GrowBuffer;
//!
//! let mut vertices: GrowBuffer<[f32; 2]> = GrowBuffer::with_limit(65_536);
//! vertices.try_push([0.0, 0.0])?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod memory;

pub use error::{CoreError, CoreResult};
pub use memory::GrowBuffer;
