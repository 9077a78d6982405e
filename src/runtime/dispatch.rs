//! Completed-line dispatch seam.

use thiserror::Error;

/// Failure surfaced by a dispatcher. The session only displays it; it never
/// retries or interprets the error.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("command failed: {0}")]
    Failed(String),
    #[error("could not invoke command: {0}")]
    Io(#[from] std::io::Error),
}

/// Success carries a display message (may be empty).
pub type DispatchResult = Result<String, DispatchError>;

/// External command handler invoked once per completed non-empty line, with
/// the device back in cooked mode.
pub trait Dispatcher {
    fn dispatch(&mut self, name: &str, args: &[String]) -> DispatchResult;
}

impl<F> Dispatcher for F
where
    F: FnMut(&str, &[String]) -> DispatchResult,
{
    fn dispatch(&mut self, name: &str, args: &[String]) -> DispatchResult {
        self(name, args)
    }
}

/// First-word tokens that end the session instead of dispatching.
const QUIT_TOKENS: [&str; 7] = ["quit", "q", ":q", ".q", "exit", ":exit", ".exit"];

pub(crate) fn is_quit_token(word: &str) -> bool {
    QUIT_TOKENS
        .iter()
        .any(|token| word.eq_ignore_ascii_case(token))
}
