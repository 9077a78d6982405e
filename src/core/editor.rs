//! Applies decoded editing commands to the buffer and history store.

use crate::core::decoder::EditCommand;
use crate::core::history::{History, Recall};
use crate::core::line_buffer::LineBuffer;

/// Observable effect of applying one command; drives the redraw decision.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    /// Buffer or cursor changed; the visible line needs a repaint.
    Edited,
    /// Single character appended at the tail (fast redraw path).
    Appended(char),
    /// Line finished: content handed back, buffer and browse state reset.
    Submitted(String),
    /// Screen clear requested; the partial line was discarded.
    Cleared,
    /// Nothing changed.
    Unchanged,
}

/// Line buffer plus history, mutated one command at a time.
#[derive(Debug)]
pub struct LineEditor {
    buffer: LineBuffer,
    history: History,
}

impl LineEditor {
    pub fn new(history_limit: usize) -> Self {
        Self {
            buffer: LineBuffer::new(),
            history: History::new(history_limit),
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn apply(&mut self, command: EditCommand) -> Applied {
        match command {
            EditCommand::Insert(ch) => {
                let at_tail = self.buffer.cursor() == self.buffer.len();
                self.buffer.insert(ch);
                if at_tail {
                    Applied::Appended(ch)
                } else {
                    Applied::Edited
                }
            }
            EditCommand::Backspace => edited_if(self.buffer.delete_before()),
            EditCommand::DeleteForward => edited_if(self.buffer.delete_at()),
            EditCommand::CursorLeft => edited_if(self.buffer.move_left()),
            EditCommand::CursorRight => edited_if(self.buffer.move_right()),
            EditCommand::WordLeft => edited_if(self.buffer.move_word_left()),
            EditCommand::WordRight => edited_if(self.buffer.move_word_right()),
            EditCommand::CursorHome => edited_if(self.buffer.move_to_start()),
            EditCommand::CursorEnd => edited_if(self.buffer.move_to_end()),
            EditCommand::HistoryOlder => {
                if let Some(entry) = self.history.older() {
                    let text = entry.to_string();
                    self.buffer.load(&text);
                    Applied::Edited
                } else {
                    Applied::Unchanged
                }
            }
            EditCommand::HistoryNewer => match self.history.newer() {
                Some(Recall::Entry(entry)) => {
                    let text = entry.to_string();
                    self.buffer.load(&text);
                    Applied::Edited
                }
                Some(Recall::Live) => {
                    self.buffer.clear();
                    Applied::Edited
                }
                None => Applied::Unchanged,
            },
            EditCommand::Submit => {
                let line = self.buffer.content();
                self.history.add(&line);
                self.history.reset_browse();
                self.buffer.clear();
                Applied::Submitted(line)
            }
            EditCommand::ClearScreen => {
                self.buffer.clear();
                self.history.reset_browse();
                Applied::Cleared
            }
        }
    }
}

fn edited_if(changed: bool) -> Applied {
    if changed {
        Applied::Edited
    } else {
        Applied::Unchanged
    }
}
