//! Frame rendering: page content plus the last-row overlays.
//!
//! The current page's bytes are written verbatim — escape sequences embedded
//! in the content pass straight through. The optional progress bar and page
//! indicator are drawn on the terminal's last row with direct cursor
//! addressing, composed so that both fit the row together.
//!
//! Callers accumulate a frame in memory and flush it before reading input,
//! so a half-drawn frame is never left on screen.

pub mod ansi;

use std::io::{self, Write};

use crate::pages::PageStore;
use crate::session::Geometry;

bitflags::bitflags! {
    /// Overlays drawn on the terminal's last row.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Overlay: u8 {
        const NONE = 0;
        /// Horizontal progress bar, proportional to the current index.
        const BAR = 1 << 0;
        /// Right-aligned `<page> (<count>)` text.
        const INDICATOR = 1 << 1;
    }
}

/// Offset of the progress-bar block: `current * width / (page_count - 1)`.
///
/// Integer arithmetic; 0 at the first page, `width` at the last. Monotonic
/// non-decreasing in `current` for fixed `width` and `page_count`.
pub fn bar_offset(current: usize, page_count: usize, width: usize) -> usize {
    if page_count < 2 {
        return 0;
    }
    current * width / (page_count - 1)
}

/// Draw the current page and any requested overlays.
///
/// The bar is suppressed on the first page; the indicator is drawn alone in
/// normal video when the bar is absent, and merged into the bar's trailing
/// region in inverse video when both are present.
pub fn render<W: Write>(
    w: &mut W,
    store: &PageStore,
    geometry: Geometry,
    overlay: Overlay,
) -> io::Result<()> {
    w.write_all(store.current().content())?;

    if overlay.is_empty() {
        return Ok(());
    }

    let width = geometry.width as usize;
    let height = geometry.height as usize;
    let current = store.current_index();
    let count = store.page_count();

    let indicator = format!("{} ({})", current + 1, count);
    let col = width.saturating_sub(1 + indicator.len()).max(1);
    let offset = bar_offset(current, count, width);
    let bar_drawn = overlay.contains(Overlay::BAR) && current > 0;

    if bar_drawn {
        ansi::cursor_to(w, height, 1)?;
        ansi::inverse_on(w)?;
        ansi::insert_blanks(w, offset)?;
        ansi::inverse_off(w)?;
    } else if overlay.contains(Overlay::INDICATOR) {
        ansi::cursor_to(w, height, col)?;
        ansi::reset(w)?;
        w.write_all(indicator.as_bytes())?;
    }

    if bar_drawn && overlay.contains(Overlay::INDICATOR) {
        // The part of the indicator inside the bar stays inverted; video
        // reverts to normal for the rest.
        let split = offset.saturating_sub(col).min(indicator.len());
        ansi::cursor_to(w, height, col)?;
        ansi::inverse_on(w)?;
        w.write_all(indicator[..split].as_bytes())?;
        ansi::inverse_off(w)?;
        w.write_all(indicator[split..].as_bytes())?;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
