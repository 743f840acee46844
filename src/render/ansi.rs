//! ANSI escape sequences for terminal control.
//!
//! Only the sequences the pager actually emits: alternate screen, cursor
//! visibility, clear, absolute positioning, blank insertion, and inverse
//! video. All writers take any `Write` so frames can be composed in memory.

use std::io::{self, Write};

/// Enter the alternate screen buffer.
#[inline]
pub fn enter_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?1049h")
}

/// Leave the alternate screen buffer.
#[inline]
pub fn exit_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?1049l")
}

/// Hide the cursor.
#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25l")
}

/// Show the cursor.
#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25h")
}

/// Home the cursor and clear the screen.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[H\x1b[2J")
}

/// Move the cursor to an absolute position (1-indexed row and column).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, row: usize, col: usize) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", row, col)
}

/// Insert `n` blank characters at the cursor (ICH), pushing the rest of the
/// line right. The blanks take the current video attributes.
#[inline]
pub fn insert_blanks<W: Write>(w: &mut W, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{}@", n)
}

/// Reset attributes, then switch on inverse video.
#[inline]
pub fn inverse_on<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[0;7m")
}

/// Switch off inverse video, leaving other attributes alone.
#[inline]
pub fn inverse_off<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[27m")
}

/// Reset all video attributes.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[0m")
}

// =============================================================================
// Tests
// =============================================================================
