//! Core editing state: buffer, history, input decoding, terminal contract.

pub mod decoder;
pub mod editor;
pub mod history;
pub mod line_buffer;
pub mod terminal;

pub use decoder::{Decoder, EditCommand};
pub use editor::{Applied, LineEditor};
pub use history::{History, Recall, DEFAULT_HISTORY_LIMIT};
pub use line_buffer::LineBuffer;
pub use terminal::Terminal;
