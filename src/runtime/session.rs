//! Session loop and device-mode coordination.
//!
//! The session owns the one resource shared with the rest of the process:
//! the terminal's device mode. It is raw while editing and cooked while a
//! dispatched command runs, and the original settings are released exactly
//! once on every exit path (quit, end of input, error, panic via `Drop`,
//! external signal via the platform hooks).

use std::io;

use crate::config::EnvConfig;
use crate::core::decoder::Decoder;
use crate::core::editor::{Applied, LineEditor};
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::terminal::Terminal;
use crate::platform::ProcessTerminal;
use crate::render::redraw;
use crate::runtime::dispatch::{is_quit_token, Dispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Raw,
    Cooked,
}

enum LineOutcome {
    Quit,
    Continue,
}

/// One interactive session over a terminal and a dispatcher.
pub struct Session<T: Terminal, D: Dispatcher> {
    terminal: T,
    dispatcher: D,
    editor: LineEditor,
    prompt: String,
    mode: Mode,
}

impl<T: Terminal, D: Dispatcher> Session<T, D> {
    pub fn new(terminal: T, dispatcher: D, prompt: impl Into<String>) -> Self {
        let limit = EnvConfig::from_env()
            .history_limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        Self {
            terminal,
            dispatcher,
            editor: LineEditor::new(limit),
            prompt: prompt.into(),
            mode: Mode::Cooked,
        }
    }

    /// Blocks until end of input or a quit token. Editing needs raw mode;
    /// when the device cannot be switched the session still accepts whole
    /// lines through the cooked driver, without history or cursor movement.
    pub fn run(&mut self) -> io::Result<()> {
        let result = if self.terminal.is_interactive() && self.enter_raw() {
            self.edit_loop()
        } else {
            self.fallback_loop()
        };
        self.restore_cooked();
        self.terminal.write("\n");
        result
    }

    fn enter_raw(&mut self) -> bool {
        match self.terminal.enter_raw() {
            Ok(()) => {
                self.mode = Mode::Raw;
                true
            }
            Err(_) => false,
        }
    }

    fn restore_cooked(&mut self) {
        if self.mode == Mode::Raw {
            // Device-mode errors are non-fatal; restoration is best effort.
            let _ = self.terminal.restore();
            self.mode = Mode::Cooked;
        }
    }

    fn write_prompt(&mut self) {
        let painted = redraw::repaint(&self.prompt, "", 0);
        self.terminal.write(&painted);
    }

    fn edit_loop(&mut self) -> io::Result<()> {
        let mut decoder = Decoder::new();
        self.write_prompt();
        loop {
            let Some(unit) = self.terminal.read_unit()? else {
                return Ok(());
            };
            let Some(command) = decoder.push(unit) else {
                continue;
            };
            match self.editor.apply(command) {
                Applied::Unchanged => {}
                Applied::Appended(unit) => self.terminal.write(&redraw::append_unit(unit)),
                Applied::Edited => {
                    let buffer = self.editor.buffer();
                    let painted =
                        redraw::repaint(&self.prompt, &buffer.content(), buffer.cursor());
                    self.terminal.write(&painted);
                }
                Applied::Cleared => {
                    let painted = redraw::clear_screen(&self.prompt);
                    self.terminal.write(&painted);
                }
                Applied::Submitted(line) => {
                    self.terminal.write("\r\n");
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        // Nothing to dispatch; stay raw and re-prompt.
                        self.write_prompt();
                        continue;
                    }
                    self.restore_cooked();
                    if let LineOutcome::Quit = self.handle_line(&line) {
                        return Ok(());
                    }
                    if !self.enter_raw() {
                        // The device refused raw mode mid-session; degrade
                        // for the remainder instead of aborting.
                        return self.fallback_loop();
                    }
                    decoder = Decoder::new();
                    self.write_prompt();
                }
            }
        }
    }

    fn fallback_loop(&mut self) -> io::Result<()> {
        loop {
            let prompt = self.prompt.clone();
            self.terminal.write(&prompt);
            let Some(line) = self.read_line_cooked()? else {
                return Ok(());
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if let LineOutcome::Quit = self.handle_line(&line) {
                return Ok(());
            }
        }
    }

    fn read_line_cooked(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        loop {
            match self.terminal.read_unit()? {
                None => {
                    return Ok(if line.is_empty() { None } else { Some(line) });
                }
                Some('\n') => return Ok(Some(line)),
                Some('\r') => {}
                Some(unit) => line.push(unit),
            }
        }
    }

    /// Quit check and dispatch for a non-empty trimmed line. The device is
    /// cooked here so the dispatched command's own output and children
    /// behave as on a normal terminal.
    fn handle_line(&mut self, line: &str) -> LineOutcome {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return LineOutcome::Continue;
        };
        if is_quit_token(name) {
            return LineOutcome::Quit;
        }
        let args: Vec<String> = words.map(str::to_string).collect();
        match self.dispatcher.dispatch(name, &args) {
            Ok(message) if !message.is_empty() => {
                self.terminal.write(&message);
                self.terminal.write("\n");
            }
            Ok(_) => {}
            Err(err) => {
                self.terminal.write(&err.to_string());
                self.terminal.write("\n");
            }
        }
        LineOutcome::Continue
    }
}

impl<T: Terminal, D: Dispatcher> Drop for Session<T, D> {
    fn drop(&mut self) {
        // Covers unwinding out of the loop; a second restore is a no-op.
        self.restore_cooked();
    }
}

/// Process entry point: stdin/stdout session with signal and panic hooks
/// that put the device back in cooked mode on abnormal exits.
pub fn run_session<D: Dispatcher>(initial_prompt: &str, dispatcher: D) -> io::Result<()> {
    let terminal = ProcessTerminal::new();
    #[cfg(unix)]
    let _signals = crate::platform::install_signal_handlers();
    crate::platform::install_panic_restore();
    let mut session = Session::new(terminal, dispatcher, initial_prompt);
    session.run()
}
