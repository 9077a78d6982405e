//! Process-backed terminal: termios raw mode, blocking unit reads, fd writes.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::EnvConfig;
use crate::core::terminal::Terminal;

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use once_cell::sync::OnceCell;
#[cfg(unix)]
use signal_hook::iterator::Signals;
#[cfg(unix)]
use std::thread::{self, JoinHandle};

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn wait_writable(fd: c_int) -> io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result > 0 && (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }
    }
}

#[cfg(unix)]
fn write_all_fd(fd: c_int, bytes: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        let remaining = &bytes[written..];
        let result =
            unsafe { libc::write(fd, remaining.as_ptr() as *const libc::c_void, remaining.len()) };
        if result > 0 {
            written += result as usize;
            continue;
        }
        if result == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
        }
        let err = io::Error::last_os_error();
        match err.kind() {
            io::ErrorKind::Interrupted => continue,
            io::ErrorKind::WouldBlock => wait_writable(fd)?,
            _ => return Err(err),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn read_byte_fd(fd: c_int) -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    loop {
        let result = unsafe { libc::read(fd, (&mut byte as *mut u8).cast(), 1) };
        if result > 0 {
            return Ok(Some(byte));
        }
        if result == 0 {
            return Ok(None);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// Sequence length introduced by a UTF-8 leading byte; 0 for invalid leads.
fn utf8_len(byte: u8) -> usize {
    match byte {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 0,
    }
}

/// Assemble one Unicode scalar from a byte source. Malformed input yields
/// U+FFFD instead of an error so a hostile byte stream cannot wedge the
/// editor; a non-continuation byte inside a sequence is consumed with it.
fn decode_unit_with<F>(mut read_byte: F) -> io::Result<Option<char>>
where
    F: FnMut() -> io::Result<Option<u8>>,
{
    let Some(first) = read_byte()? else {
        return Ok(None);
    };
    if first < 0x80 {
        return Ok(Some(first as char));
    }
    let len = utf8_len(first);
    if len == 0 {
        return Ok(Some(char::REPLACEMENT_CHARACTER));
    }
    let mut bytes = [first, 0, 0, 0];
    for slot in bytes.iter_mut().take(len).skip(1) {
        let Some(next) = read_byte()? else {
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        };
        if next & 0xc0 != 0x80 {
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        }
        *slot = next;
    }
    match std::str::from_utf8(&bytes[..len]) {
        Ok(text) => Ok(text.chars().next()),
        Err(_) => Ok(Some(char::REPLACEMENT_CHARACTER)),
    }
}

#[cfg(unix)]
#[derive(Clone, Copy)]
struct RestoreState {
    fd: c_int,
    termios: libc::termios,
}

/// Cooked settings captured at first raw entry, for signal/panic paths.
#[cfg(unix)]
static RESTORE_STATE: OnceCell<RestoreState> = OnceCell::new();

#[cfg(unix)]
fn register_restore_state(fd: c_int, termios: libc::termios) {
    let _ = RESTORE_STATE.set(RestoreState { fd, termios });
}

/// Restore the first-captured cooked settings. Safe to call at any time,
/// including from signal and panic hooks; a no-op before raw entry.
#[cfg(unix)]
pub fn restore_original_mode() {
    if let Some(state) = RESTORE_STATE.get() {
        let _ = set_termios(state.fd, &state.termios);
    }
}

#[cfg(not(unix))]
pub fn restore_original_mode() {}

#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Restore the terminal on SIGINT/SIGTERM, then let the default disposition
/// run. The listener only touches device mode, never editor state.
#[cfg(unix)]
pub fn install_signal_handlers() -> SignalHookGuard {
    let mut signals =
        Signals::new([libc::SIGINT, libc::SIGTERM]).expect("failed to register signal handlers");
    let handle = signals.handle();
    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            restore_original_mode();
            let _ = signal_hook::low_level::emulate_default_handler(signal);
        }
    });
    SignalHookGuard {
        handle,
        thread: Some(thread),
    }
}

/// Run terminal restoration before the existing panic hook.
pub fn install_panic_restore() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_original_mode();
        previous(info);
    }));
}

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        let config = EnvConfig::from_env();
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios: None,
            write_log_path: config.write_log.map(PathBuf::from),
            write_log_failed: false,
        }
    }

    fn append_write_log(&mut self, data: &str) {
        if self.write_log_failed {
            return;
        }
        if let Some(path) = self.write_log_path.as_ref() {
            let result = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(data.as_bytes()));
            if result.is_err() {
                self.write_log_failed = true;
            }
        }
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn is_interactive(&self) -> bool {
        unsafe { libc::isatty(self.stdin_fd) == 1 }
    }

    fn enter_raw(&mut self) -> io::Result<()> {
        if self.original_termios.is_none() {
            let original = get_termios(self.stdin_fd)?;
            self.original_termios = Some(original);
            register_restore_state(self.stdin_fd, original);
        }
        let mut raw = *self
            .original_termios
            .as_ref()
            .expect("original termios missing");
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(self.stdin_fd, &raw)
    }

    fn restore(&mut self) -> io::Result<()> {
        let Some(original) = self.original_termios.as_ref() else {
            return Ok(());
        };
        // Flush pending input before leaving raw mode so buffered keystrokes
        // do not leak into whatever reads the terminal next.
        let _ = unsafe { libc::tcflush(self.stdin_fd, libc::TCIFLUSH) };
        set_termios(self.stdin_fd, original)
    }

    fn read_unit(&mut self) -> io::Result<Option<char>> {
        let fd = self.stdin_fd;
        decode_unit_with(|| read_byte_fd(fd))
    }

    fn write(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        // Display output is best-effort; a broken output fd must not take
        // down the input loop.
        let _ = write_all_fd(self.stdout_fd, data.as_bytes());
        self.append_write_log(data);
    }
}

#[cfg(not(unix))]
pub struct ProcessTerminal {
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
}

#[cfg(not(unix))]
impl ProcessTerminal {
    pub fn new() -> Self {
        let config = EnvConfig::from_env();
        Self {
            write_log_path: config.write_log.map(PathBuf::from),
            write_log_failed: false,
        }
    }
}

#[cfg(not(unix))]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

// Without termios there is no raw mode; enter_raw fails and the session
// degrades to whole-line cooked input via stdin.
#[cfg(not(unix))]
impl Terminal for ProcessTerminal {
    fn is_interactive(&self) -> bool {
        false
    }

    fn enter_raw(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode requires a unix terminal",
        ))
    }

    fn restore(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_unit(&mut self) -> io::Result<Option<char>> {
        use std::io::Read;
        let stdin = io::stdin();
        let mut handle = stdin.lock();
        decode_unit_with(|| {
            let mut byte = 0u8;
            match handle.read(std::slice::from_mut(&mut byte))? {
                0 => Ok(None),
                _ => Ok(Some(byte)),
            }
        })
    }

    fn write(&mut self, data: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(data.as_bytes());
        let _ = stdout.flush();
        if self.write_log_failed {
            return;
        }
        if let Some(path) = self.write_log_path.as_ref() {
            let result = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(data.as_bytes()));
            if result.is_err() {
                self.write_log_failed = true;
            }
        }
    }
}
