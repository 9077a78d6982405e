//! In-place repaint of the edited line.
//!
//! The repaint is a pure function of (prompt, content, cursor): starting from
//! column 1 of the current row it rewrites the whole line, so the displayed
//! row never depends on what was drawn before. The only concession to speed
//! is the tail-append path for the common case of typing at the end of the
//! line, which is indistinguishable from a full repaint on the wire.

use unicode_width::UnicodeWidthChar;

const CLEAR_TO_EOL: &str = "\x1b[K";
const CLEAR_SCREEN_HOME: &str = "\x1b[2J\x1b[H";

/// Full repaint: column 1, clear to end of line, prompt plus content, cursor
/// pulled back to its logical column.
pub fn repaint(prompt: &str, content: &str, cursor: usize) -> String {
    let mut out = String::with_capacity(prompt.len() + content.len() + 16);
    out.push('\r');
    out.push_str(CLEAR_TO_EOL);
    out.push_str(prompt);
    out.push_str(content);
    let pullback: usize = content
        .chars()
        .skip(cursor)
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
        .sum();
    if pullback > 0 {
        out.push_str(&format!("\x1b[{pullback}D"));
    }
    out
}

/// Tail-append fast path: the inserted unit is the only change.
pub fn append_unit(unit: char) -> String {
    unit.to_string()
}

/// Clear the visible screen and repaint an empty prompt at the home position.
pub fn clear_screen(prompt: &str) -> String {
    format!("{CLEAR_SCREEN_HOME}{prompt}")
}
