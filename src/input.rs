//! Escape-sequence decoder for navigation input.
//!
//! Translates raw terminal bytes into [`Command`]s:
//! - `q` quits, Ctrl-L forces a redraw
//! - CSI arrows: up/left page back, down/right page forward
//! - CSI `5~` / `6~` (page-up / page-down) follow the same directions
//!
//! The decoder is a byte-at-a-time state machine; anything it does not
//! recognize is dropped without effect.

use std::io::{self, ErrorKind, Read};

const ESC: u8 = 0x1B;
const CTRL_L: u8 = 0x0C;

/// A navigation command produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Step to the previous page.
    Previous,
    /// Step to the next page.
    Next,
    /// Redraw the current page without moving.
    Redraw,
    /// Leave the display loop.
    Quit,
}

/// Decoder states. `Csi5`/`Csi6` sit between `CSI 5`/`CSI 6` and the
/// closing `~` of page-up/page-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Esc,
    Csi,
    Csi5,
    Csi6,
}

/// The single source of truth for which CSI finals page in which direction:
/// `A` (up) and `D` (left) step back, `B` (down) and `C` (right) step
/// forward. Page-up/page-down reuse the same pairing in [`Decoder::feed`].
fn arrow_command(byte: u8) -> Option<Command> {
    match byte {
        b'A' | b'D' => Some(Command::Previous),
        b'B' | b'C' => Some(Command::Next),
        _ => None,
    }
}

/// Byte-at-a-time escape-sequence state machine.
#[derive(Debug)]
pub struct Decoder {
    state: State,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            state: State::Normal,
        }
    }

    /// Feed one input byte; returns a command when a key completes.
    ///
    /// An ESC followed by anything but `[` aborts the sequence and the
    /// following byte is ignored; unrecognized CSI bytes drop the sequence.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            State::Normal => match byte {
                ESC => {
                    self.state = State::Esc;
                    None
                }
                b'q' => Some(Command::Quit),
                CTRL_L => Some(Command::Redraw),
                _ => None,
            },
            State::Esc => {
                self.state = if byte == b'[' { State::Csi } else { State::Normal };
                None
            }
            State::Csi => match byte {
                b'5' => {
                    self.state = State::Csi5;
                    None
                }
                b'6' => {
                    self.state = State::Csi6;
                    None
                }
                _ => {
                    self.state = State::Normal;
                    arrow_command(byte)
                }
            },
            State::Csi5 | State::Csi6 => {
                let command = if byte == b'~' {
                    Some(match self.state {
                        State::Csi5 => Command::Previous,
                        _ => Command::Next,
                    })
                } else {
                    None
                };
                self.state = State::Normal;
                command
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Block until the input yields a command.
///
/// End of input reads as [`Command::Quit`]; interrupted reads are retried;
/// any other read error aborts the display loop.
pub fn next_command<R: Read>(decoder: &mut Decoder, input: &mut R) -> io::Result<Command> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Ok(Command::Quit),
            Ok(_) => {
                if let Some(command) = decoder.feed(byte[0]) {
                    return Ok(command);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> Vec<Command> {
        let mut decoder = Decoder::new();
        bytes.iter().filter_map(|&b| decoder.feed(b)).collect()
    }

    #[test]
    fn test_quit_and_redraw() {
        assert_eq!(decode(b"q"), [Command::Quit]);
        assert_eq!(decode(b"\x0c"), [Command::Redraw]);
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(decode(b"\x1b[A"), [Command::Previous]);
        assert_eq!(decode(b"\x1b[D"), [Command::Previous]);
        assert_eq!(decode(b"\x1b[B"), [Command::Next]);
        assert_eq!(decode(b"\x1b[C"), [Command::Next]);
    }

    #[test]
    fn test_page_up_page_down() {
        assert_eq!(decode(b"\x1b[5~"), [Command::Previous]);
        assert_eq!(decode(b"\x1b[6~"), [Command::Next]);
    }

    #[test]
    fn test_page_keys_agree_with_arrows() {
        assert_eq!(decode(b"\x1b[5~"), decode(b"\x1b[A"));
        assert_eq!(decode(b"\x1b[6~"), decode(b"\x1b[B"));
    }

    #[test]
    fn test_aborted_escape_swallows_next_byte() {
        // ESC q is a broken sequence, not a quit.
        assert_eq!(decode(b"\x1bq"), []);
        // The key works again once the sequence is done.
        assert_eq!(decode(b"\x1bqq"), [Command::Quit]);
    }

    #[test]
    fn test_unrecognized_csi_dropped() {
        assert_eq!(decode(b"\x1b[Z"), []);
        assert_eq!(decode(b"\x1b[5x"), []);
        assert_eq!(decode(b"\x1b[6q"), []);
    }

    #[test]
    fn test_state_resets_after_sequence() {
        assert_eq!(
            decode(b"\x1b[B\x1b[A"),
            [Command::Next, Command::Previous]
        );
        assert_eq!(decode(b"\x1b[Zq"), [Command::Quit]);
    }

    #[test]
    fn test_plain_bytes_ignored() {
        assert_eq!(decode(b"abc 123\n"), []);
    }

    #[test]
    fn test_end_of_input_is_quit() {
        let mut decoder = Decoder::new();
        let mut input = Cursor::new(b"" as &[u8]);
        assert_eq!(
            next_command(&mut decoder, &mut input).unwrap(),
            Command::Quit
        );
    }

    #[test]
    fn test_next_command_spans_reads() {
        let mut decoder = Decoder::new();
        let mut input = Cursor::new(b"\x1b[6~" as &[u8]);
        assert_eq!(
            next_command(&mut decoder, &mut input).unwrap(),
            Command::Next
        );
    }

    #[test]
    fn test_interrupted_read_retried() {
        struct Interrupting {
            interrupted: bool,
        }
        impl Read for Interrupting {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::from(ErrorKind::Interrupted));
                }
                buf[0] = b'q';
                Ok(1)
            }
        }
        let mut decoder = Decoder::new();
        let mut input = Interrupting { interrupted: false };
        assert_eq!(
            next_command(&mut decoder, &mut input).unwrap(),
            Command::Quit
        );
    }

    #[test]
    fn test_fatal_read_error_propagates() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(ErrorKind::BrokenPipe))
            }
        }
        let mut decoder = Decoder::new();
        assert!(next_command(&mut decoder, &mut Failing).is_err());
    }
}
