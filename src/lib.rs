//! # ffp
//!
//! Interactive pager for form-feed separated text.
//!
//! The input stream is pre-segmented into pages by form-feed bytes (`0x0C`).
//! Pages are loaded up front, then displayed one at a time on the alternate
//! screen buffer, with arrow/page keys for navigation. A stream with fewer
//! than two pages is printed directly and no terminal session is entered.
//!
//! ## Architecture
//!
//! ```text
//! stream ──► PageStore ──► display loop ──► renderer ──► stdout ANSI frames
//!                              │
//!                              ◄── Decoder ◄── raw /dev/tty bytes
//! ```
//!
//! The session guard owns raw mode and the alternate screen; dropping it
//! restores the terminal on every exit path.
//!
//! ## Modules
//!
//! - [`pages`] - Page segmentation and the page store
//! - [`session`] - Raw-mode/alt-screen terminal session, geometry cache
//! - [`input`] - Escape-sequence decoder (key bytes → navigation commands)
//! - [`render`] - Frame rendering: page bytes plus progress bar / indicator
//! - [`display`] - The display loop tying the above together

pub mod display;
pub mod error;
pub mod input;
pub mod pages;
pub mod render;
pub mod session;

pub use error::{Error, Result};
pub use input::{Command, Decoder};
pub use pages::{Page, PageStore};
pub use render::Overlay;
pub use session::{Geometry, Session, Tty};
