//! Line-editing terminal front-end for interactive command shells.
//!
//! Turns a raw terminal byte stream into an editable command line: cursor
//! movement, in-place redraw, and recall of previously entered lines. The
//! device is raw while editing and cooked while a dispatched command runs,
//! and the original settings are restored on every exit path.
//!
//! # Public API Overview
//! - Run a whole session against stdin/stdout with [`run_session`], or wire
//!   a [`Session`] to any [`Terminal`] and [`Dispatcher`] of your own.
//! - Decode input yourself with [`Decoder`] / [`EditCommand`] and apply it
//!   through [`LineEditor`].
//! - Paint a line snapshot with the helpers in [`render::redraw`].
//!
//! Interpretation of a completed line is deliberately out of scope: the
//! session hands finished lines to the [`Dispatcher`] and only displays its
//! outcome message.

pub mod config;

pub mod core;
pub mod platform;
pub mod render;
pub mod runtime;

/// Editing state and input classification.
pub use crate::core::{
    Applied, Decoder, EditCommand, History, LineBuffer, LineEditor, Recall, DEFAULT_HISTORY_LIMIT,
};

/// Terminal contract and the process-backed implementation.
pub use crate::core::Terminal;
pub use crate::platform::ProcessTerminal;

/// Session loop, entry point, and dispatch seam.
pub use crate::runtime::{run_session, DispatchError, DispatchResult, Dispatcher, Session};
