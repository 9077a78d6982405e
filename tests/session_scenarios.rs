//! End-to-end session scenarios over a scripted in-memory terminal.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use reel_line::{DispatchResult, Session, Terminal};

#[derive(Default)]
struct TerminalState {
    output: String,
    raw: bool,
    raw_entries: usize,
    restores: usize,
}

struct ScriptedTerminal {
    input: VecDeque<char>,
    state: Rc<RefCell<TerminalState>>,
    interactive: bool,
    /// Raw entries granted before the device starts refusing; `None` means
    /// unlimited.
    raw_entries_allowed: Option<usize>,
}

impl ScriptedTerminal {
    fn new(input: &str) -> (Self, Rc<RefCell<TerminalState>>) {
        let state = Rc::new(RefCell::new(TerminalState::default()));
        let terminal = Self {
            input: input.chars().collect(),
            state: Rc::clone(&state),
            interactive: true,
            raw_entries_allowed: None,
        };
        (terminal, state)
    }
}

impl Terminal for ScriptedTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn enter_raw(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(allowed) = self.raw_entries_allowed {
            if state.raw_entries >= allowed {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "raw refused"));
            }
        }
        state.raw = true;
        state.raw_entries += 1;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.raw = false;
        state.restores += 1;
        Ok(())
    }

    fn read_unit(&mut self) -> io::Result<Option<char>> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, data: &str) {
        self.state.borrow_mut().output.push_str(data);
    }
}

type DispatchLog = Rc<RefCell<Vec<(String, Vec<String>)>>>;

fn recorder(log: DispatchLog) -> impl FnMut(&str, &[String]) -> DispatchResult {
    move |name, args| {
        log.borrow_mut().push((name.to_string(), args.to_vec()));
        Ok(String::new())
    }
}

fn run_script(input: &str) -> (Vec<(String, Vec<String>)>, Rc<RefCell<TerminalState>>) {
    let (terminal, state) = ScriptedTerminal::new(input);
    let log: DispatchLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(terminal, recorder(Rc::clone(&log)), "cloud> ");
    session.run().expect("session run");
    drop(session);
    let dispatched = log.borrow().clone();
    (dispatched, state)
}

#[test]
fn insert_before_cursor_submits_the_edited_line() {
    // h, i, left-arrow, !, enter: the ! lands before the i.
    let (dispatched, _) = run_script("hi\x1b[D!\r");
    assert_eq!(dispatched, vec![("h!i".to_string(), vec![])]);
}

#[test]
fn arguments_split_on_whitespace() {
    let (dispatched, _) = run_script("instances  list --all\r");
    assert_eq!(
        dispatched,
        vec![(
            "instances".to_string(),
            vec!["list".to_string(), "--all".to_string()],
        )]
    );
}

#[test]
fn empty_lines_are_never_dispatched() {
    let (dispatched, state) = run_script("\r\r\r");
    assert!(dispatched.is_empty());
    // Each empty submit re-prompts without leaving raw mode.
    assert_eq!(state.borrow().raw_entries, 1);
}

#[test]
fn history_recall_resubmits_an_older_line() {
    let (dispatched, _) = run_script("login\rinstances\r\x1b[A\x1b[A\r");
    let names: Vec<&str> = dispatched.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["login", "instances", "login"]);
}

#[test]
fn escape_then_eof_terminates_cleanly() {
    let (dispatched, state) = run_script("\x1b");
    assert!(dispatched.is_empty());
    let state = state.borrow();
    assert!(!state.raw, "device left raw");
    assert!(state.restores >= 1);
}

#[test]
fn quit_token_ends_the_session_before_later_input() {
    let (dispatched, state) = run_script("deploy web\rQUIT\rnever\r");
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].0, "deploy");
    assert!(!state.borrow().raw, "device left raw after quit");
}

#[test]
fn dispatch_runs_with_the_device_cooked() {
    let (terminal, state) = ScriptedTerminal::new("status\rgo\r");
    let observed = Rc::new(RefCell::new(Vec::new()));
    let dispatcher = {
        let state = Rc::clone(&state);
        let observed = Rc::clone(&observed);
        move |name: &str, _args: &[String]| -> DispatchResult {
            observed.borrow_mut().push((name.to_string(), state.borrow().raw));
            Ok(String::new())
        }
    };
    let mut session = Session::new(terminal, dispatcher, "cloud> ");
    session.run().expect("session run");
    drop(session);

    let observed = observed.borrow();
    assert_eq!(observed.len(), 2);
    for (name, raw_during_dispatch) in observed.iter() {
        assert!(!raw_during_dispatch, "{name} dispatched while raw");
    }
    // Initial entry plus one re-entry after each dispatched line.
    assert_eq!(state.borrow().raw_entries, 3);
}

#[test]
fn failure_messages_are_displayed_and_the_loop_continues() {
    let (terminal, state) = ScriptedTerminal::new("destroy\rstatus\r");
    let log: DispatchLog = Rc::new(RefCell::new(Vec::new()));
    let dispatcher = {
        let log = Rc::clone(&log);
        move |name: &str, args: &[String]| -> DispatchResult {
            log.borrow_mut().push((name.to_string(), args.to_vec()));
            if name == "destroy" {
                Err(reel_line::DispatchError::Failed("not allowed".to_string()))
            } else {
                Ok("all green".to_string())
            }
        }
    };
    let mut session = Session::new(terminal, dispatcher, "cloud> ");
    session.run().expect("session run");
    drop(session);

    assert_eq!(log.borrow().len(), 2, "failure did not stop the loop");
    let output = state.borrow().output.clone();
    assert!(output.contains("not allowed"), "output: {output:?}");
    assert!(output.contains("all green"), "output: {output:?}");
}

#[test]
fn raw_refusal_falls_back_to_whole_line_input() {
    let (mut terminal, state) = ScriptedTerminal::new("help\n");
    terminal.raw_entries_allowed = Some(0);
    let log: DispatchLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(terminal, recorder(Rc::clone(&log)), "cloud> ");
    session.run().expect("session run");
    drop(session);

    assert_eq!(log.borrow().as_slice(), &[("help".to_string(), vec![])]);
    let state = state.borrow();
    assert_eq!(state.raw_entries, 0);
    // Fallback prompts are plain text, no in-place repaint sequences.
    assert!(!state.output.contains("\x1b[K"), "output: {:?}", state.output);
}

#[test]
fn non_interactive_input_uses_the_fallback_path() {
    let (mut terminal, _state) = ScriptedTerminal::new("version\n");
    terminal.interactive = false;
    let log: DispatchLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(terminal, recorder(Rc::clone(&log)), "cloud> ");
    session.run().expect("session run");
    drop(session);
    assert_eq!(log.borrow().as_slice(), &[("version".to_string(), vec![])]);
}

#[test]
fn mid_session_raw_refusal_degrades_instead_of_aborting() {
    let (mut terminal, state) = ScriptedTerminal::new("one\rtwo three\n");
    terminal.raw_entries_allowed = Some(1);
    let log: DispatchLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(terminal, recorder(Rc::clone(&log)), "cloud> ");
    session.run().expect("session run");
    drop(session);

    assert_eq!(
        log.borrow().as_slice(),
        &[
            ("one".to_string(), vec![]),
            ("two".to_string(), vec!["three".to_string()]),
        ]
    );
    assert_eq!(state.borrow().raw_entries, 1);
}

#[test]
fn edits_repaint_and_tail_typing_streams_through() {
    let (_dispatched, state) = run_script("ab\x1b[D");
    let output = state.borrow().output.clone();
    // Initial prompt repaint, streamed tail characters, then a full repaint
    // for the cursor move.
    assert!(output.starts_with("\r\x1b[Kcloud> ab"), "output: {output:?}");
    assert!(output.contains("\r\x1b[Kcloud> ab\x1b[1D"), "output: {output:?}");
}
