//! Terminal device contract consumed by the session.

use std::io;

/// Abstract terminal surface: mode switching, unit input, raw byte output.
///
/// The process-backed implementation lives in `platform`; tests drive the
/// session with scripted in-memory implementations instead of a device.
pub trait Terminal {
    /// Whether the input side is attached to an interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Switch to raw (unit-at-a-time, no echo) mode. The original settings
    /// are captured on first entry and reused by [`Terminal::restore`].
    fn enter_raw(&mut self) -> io::Result<()>;

    /// Restore the settings captured before the first raw entry. Must be
    /// safe to call repeatedly and when raw mode was never entered.
    fn restore(&mut self) -> io::Result<()>;

    /// Blocking read of the next decoded input unit; `None` on end of input.
    fn read_unit(&mut self) -> io::Result<Option<char>>;

    /// Write raw bytes to the display.
    fn write(&mut self, data: &str);
}
