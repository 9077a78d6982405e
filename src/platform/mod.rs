//! Platform-specific terminal integrations.

pub mod process_terminal;

#[cfg(unix)]
pub use process_terminal::{install_signal_handlers, SignalHookGuard};
pub use process_terminal::{install_panic_restore, restore_original_mode, ProcessTerminal};
