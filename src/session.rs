//! Terminal session management.
//!
//! Owns the switch to the alternate screen and raw-ish input mode, the
//! saved terminal attributes, and the cached geometry. The session is a
//! guard value: dropping it restores the terminal, so every exit path —
//! normal completion, decode error, render error — leaves the terminal the
//! way it was found.
//!
//! Resize notifications arrive via SIGWINCH. The handler only sets an
//! atomic flag; the size query itself runs lazily at the start of the next
//! render cycle.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::render::ansi;

/// Set by the SIGWINCH handler, consumed by [`Session::geometry`].
/// Starts set so the first query replaces the fallback geometry.
static RESIZED: AtomicBool = AtomicBool::new(true);

extern "C" fn on_sigwinch(_signo: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl Default for Geometry {
    /// Fallback used until the first successful size query.
    fn default() -> Self {
        Self {
            width: 72,
            height: 56,
        }
    }
}

/// The controlling terminal, opened read-only for keystrokes — independent
/// of whatever standard input the document came from.
#[derive(Debug)]
pub struct Tty {
    file: File,
}

impl Tty {
    pub fn open() -> io::Result<Self> {
        Ok(Self {
            file: File::open("/dev/tty")?,
        })
    }

    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl Read for Tty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

/// An entered terminal session: alternate screen, hidden cursor, canonical
/// input / echo / signal keys disabled on the controlling terminal.
pub struct Session {
    tty_fd: RawFd,
    saved: libc::termios,
    geometry: Geometry,
}

impl Session {
    /// Enter the session.
    ///
    /// On failure the screen state is rolled back before the error returns,
    /// so a partially entered session never leaks.
    pub fn enter(tty: &Tty) -> Result<Self> {
        let fd = tty.as_raw_fd();
        let mut out = io::stdout();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        out.flush()?;

        let mut attrs = unsafe { std::mem::zeroed::<libc::termios>() };
        if unsafe { libc::tcgetattr(fd, &mut attrs) } != 0 {
            let err = io::Error::last_os_error();
            restore_screen();
            return Err(Error::TerminalConfig(err));
        }
        let saved = attrs;
        attrs.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
        attrs.c_cc[libc::VMIN] = 1;
        attrs.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &attrs) } != 0 {
            let err = io::Error::last_os_error();
            restore_screen();
            return Err(Error::TerminalConfig(err));
        }

        install_resize_handler();
        tracing::debug!("terminal session entered");

        Ok(Self {
            tty_fd: fd,
            saved,
            geometry: Geometry::default(),
        })
    }

    /// Cached terminal geometry, queried again only after a resize
    /// notification. A failed query keeps the previous value.
    pub fn geometry(&mut self) -> Geometry {
        if RESIZED.swap(false, Ordering::Relaxed) {
            let mut size = unsafe { std::mem::zeroed::<libc::winsize>() };
            loop {
                let rc =
                    unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
                if rc == 0 {
                    if size.ws_col > 0 && size.ws_row > 0 {
                        self.geometry = Geometry {
                            width: size.ws_col,
                            height: size.ws_row,
                        };
                        tracing::trace!(
                            width = size.ws_col,
                            height = size.ws_row,
                            "geometry refreshed"
                        );
                    }
                    break;
                }
                if io::Error::last_os_error().kind() != io::ErrorKind::Interrupted {
                    break;
                }
            }
        }
        self.geometry
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.tty_fd, libc::TCSAFLUSH, &self.saved);
        }
        restore_screen();
    }
}

/// Show the cursor and return to the primary screen. Errors are ignored:
/// this runs while unwinding and must not mask the in-flight error.
fn restore_screen() {
    let mut out = io::stdout();
    let _ = ansi::cursor_show(&mut out);
    let _ = ansi::exit_alt_screen(&mut out);
    let _ = out.flush();
}

/// Install the SIGWINCH handler. The handler only sets [`RESIZED`]; if
/// installation fails, geometry simply stays at its last value.
fn install_resize_handler() {
    unsafe {
        let mut action = std::mem::zeroed::<libc::sigaction>();
        libc::sigemptyset(&mut action.sa_mask);
        let handler: extern "C" fn(libc::c_int) = on_sigwinch;
        action.sa_sigaction = handler as usize;
        action.sa_flags = 0;
        libc::sigaction(libc::SIGWINCH, &action, std::ptr::null_mut());
    }
}

// =============================================================================
// Tests
// =============================================================================
