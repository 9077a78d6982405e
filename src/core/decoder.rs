//! Input classification: units in, symbolic editing commands out.
//!
//! The decoder is a pure push state machine with no I/O of its own, so the
//! whole classification table can be driven by literal unit sequences in
//! tests. Escape sequences are accumulated internally and resolved when a
//! terminating unit arrives; malformed or oversized sequences are abandoned
//! and classification resumes on the next unit.

const ESCAPE: char = '\u{1b}';
const FORM_FEED: char = '\u{0c}';
const BACKSPACE: char = '\u{08}';
const DELETE: char = '\u{7f}';

/// Longest escape-sequence body kept before the sequence is abandoned.
const MAX_SEQUENCE_BODY: usize = 16;

/// Semantic editing action resolved from one or more input units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Insert(char),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    WordLeft,
    WordRight,
    CursorHome,
    CursorEnd,
    HistoryOlder,
    HistoryNewer,
    Submit,
    ClearScreen,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Ground,
    /// Escape prefix seen, bracket introducer pending.
    Escape,
    /// Accumulating a bracketed sequence body until a terminator.
    Sequence(String),
}

#[derive(Debug, Default)]
pub struct Decoder {
    state: State,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one input unit. Returns the resolved command, or `None` while
    /// more units are needed or the unit is ignored.
    pub fn push(&mut self, unit: char) -> Option<EditCommand> {
        match std::mem::take(&mut self.state) {
            State::Ground => self.classify(unit),
            State::Escape => {
                if unit == '[' {
                    self.state = State::Sequence(String::new());
                    None
                } else {
                    // Escape alone is a no-op; the unit after it is an
                    // ordinary input unit again.
                    self.push(unit)
                }
            }
            State::Sequence(mut body) => {
                if unit.is_ascii_alphabetic() || unit == '~' {
                    resolve_sequence(&body, unit)
                } else if body.len() >= MAX_SEQUENCE_BODY {
                    // Runaway sequence: abandon it, drop this unit too.
                    None
                } else {
                    body.push(unit);
                    self.state = State::Sequence(body);
                    None
                }
            }
        }
    }

    fn classify(&mut self, unit: char) -> Option<EditCommand> {
        match unit {
            ESCAPE => {
                self.state = State::Escape;
                None
            }
            FORM_FEED => Some(EditCommand::ClearScreen),
            '\r' | '\n' => Some(EditCommand::Submit),
            BACKSPACE | DELETE => Some(EditCommand::Backspace),
            '\t' => Some(EditCommand::Insert('\t')),
            ch if ch >= ' ' => Some(EditCommand::Insert(ch)),
            // Remaining control codes carry no editing meaning.
            _ => None,
        }
    }
}

/// CSI resolution table: (body, terminator) to command. Unrecognized
/// sequences resolve to nothing.
fn resolve_sequence(body: &str, terminator: char) -> Option<EditCommand> {
    match terminator {
        'A' => Some(EditCommand::HistoryOlder),
        'B' => Some(EditCommand::HistoryNewer),
        'C' if is_word_jump(body) => Some(EditCommand::WordRight),
        'C' => Some(EditCommand::CursorRight),
        'D' if is_word_jump(body) => Some(EditCommand::WordLeft),
        'D' => Some(EditCommand::CursorLeft),
        'H' => Some(EditCommand::CursorHome),
        'F' => Some(EditCommand::CursorEnd),
        '~' => match body {
            "1" => Some(EditCommand::CursorHome),
            "4" => Some(EditCommand::CursorEnd),
            "3" => Some(EditCommand::DeleteForward),
            _ => None,
        },
        _ => None,
    }
}

/// Ctrl-modified arrows arrive as `1;5` on most emulators and as a bare `5`
/// on a few older ones; any other body falls back to plain movement.
fn is_word_jump(body: &str) -> bool {
    body == "1;5" || body == "5"
}
