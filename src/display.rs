//! The display loop.
//!
//! A store with fewer than two pages is printed directly and the program is
//! done — no terminal session, no overlays. Otherwise the loop runs on the
//! alternate screen: clear, render, wait for a command, move the index,
//! repeat until quit or end of input. After the session closes, the page the
//! user stopped on is printed once more to the primary screen, so it is what
//! remains in the scrollback.

use std::io::{self, Write};

use crate::error::Result;
use crate::input::{self, Command, Decoder};
use crate::pages::PageStore;
use crate::render::{self, ansi, Overlay};
use crate::session::{Session, Tty};

/// Frame buffer capacity; frames are composed in memory and written in one
/// flush so a half-drawn frame is never left visible while waiting on input.
const FRAME_CAPACITY: usize = 16 * 1024;

/// Page the store on the terminal.
pub fn run(store: &mut PageStore, overlay: Overlay) -> Result<()> {
    if store.page_count() == 0 {
        return Ok(());
    }
    if store.page_count() >= 2 {
        interact(store, overlay)?;
    }
    print_plain(store, &mut io::stdout().lock())?;
    Ok(())
}

/// Run the interactive session. The session guard restores the terminal on
/// every way out of the loop, error or not.
fn interact(store: &mut PageStore, overlay: Overlay) -> Result<()> {
    let mut tty = Tty::open()?;
    let mut session = Session::enter(&tty)?;
    tracing::debug!(pages = store.page_count(), "interactive display");
    let result = event_loop(store, overlay, &mut session, &mut tty);
    drop(session);
    tracing::debug!("terminal session closed");
    result
}

fn event_loop(
    store: &mut PageStore,
    overlay: Overlay,
    session: &mut Session,
    tty: &mut Tty,
) -> Result<()> {
    let mut decoder = Decoder::new();
    let mut frame: Vec<u8> = Vec::with_capacity(FRAME_CAPACITY);
    let mut stdout = io::stdout().lock();

    loop {
        let geometry = session.geometry();
        frame.clear();
        ansi::clear_screen(&mut frame)?;
        render::render(&mut frame, store, geometry, overlay)?;
        stdout.write_all(&frame)?;
        stdout.flush()?;

        match input::next_command(&mut decoder, tty)? {
            Command::Previous => store.back(),
            Command::Next => store.forward(),
            Command::Redraw => {}
            Command::Quit => return Ok(()),
        }
    }
}

/// Print the current page to the primary screen, no overlays.
///
/// The lone empty page of a zero-byte stream prints nothing at all; any
/// other page is followed by a newline.
pub fn print_plain<W: Write>(store: &PageStore, out: &mut W) -> io::Result<()> {
    if store.is_sole_empty() {
        return Ok(());
    }
    out.write_all(store.current().content())?;
    out.write_all(b"\n")?;
    out.flush()
}

// =============================================================================
// Tests
// =============================================================================
