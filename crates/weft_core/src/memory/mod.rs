//! # Memory Management
//!
//! Growable storage with explicit failure reporting.
//!
//! ## Design Philosophy
//!
//! Per-frame arrays are rebuilt every frame:
//! - Capacity survives `clear`, so steady-state frames reuse memory
//! - Growth is checked against a limit before the allocator is asked
//! - Allocator refusal is an error value, never an abort

mod grow;

pub use grow::GrowBuffer;
