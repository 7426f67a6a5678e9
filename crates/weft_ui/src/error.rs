//! # UI Error Types
//!
//! Usage errors are repaired on the spot and reported; config errors are
//! returned to the caller. Render buffer failures surface as
//! `weft_core::CoreError` in the frame summary.

use thiserror::Error;

use crate::widget::ControlKind;

/// Errors that can occur in the UI engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// `pop_id` with no open identity scope.
    #[error("identity scope popped with no scope open")]
    ScopeUnderflow,

    /// Identity scopes left open at frame end.
    #[error("{depth} identity scope(s) left open at frame end")]
    UnbalancedScopes {
        /// Number of scopes that had to be force-popped.
        depth: usize,
    },

    /// An `end_*` call that does not match the innermost open container.
    #[error("container mismatch: expected end of {expected:?}, found end of {found:?}")]
    ContainerMismatch {
        /// Kind of the innermost open container.
        expected: ControlKind,
        /// Kind named by the `end_*` call.
        found: ControlKind,
    },

    /// An `end_*` call with no container open.
    #[error("end of {0:?} called with no open container")]
    UnmatchedEnd(ControlKind),

    /// Containers left open at frame end.
    #[error("{count} container(s) left open at frame end")]
    UnclosedContainers {
        /// Number of containers that had to be force-closed.
        count: usize,
    },

    /// `end_group` with no group open.
    #[error("group ended with no group open")]
    GroupUnderflow,

    /// Groups left open at frame end.
    #[error("{count} group(s) left open at frame end")]
    UnclosedGroups {
        /// Number of groups that had to be force-closed.
        count: usize,
    },

    /// Two controls resolved to the same id in one frame.
    #[error("duplicate control id {0:#018x} in one frame")]
    DuplicateId(u64),

    /// Invalid configuration values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(String),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
