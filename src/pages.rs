//! Page segmentation and the page store.
//!
//! A page is everything between two form-feed bytes. Loading happens once,
//! up front; afterwards the page sequence is immutable and only the current
//! index moves.

use std::io::{self, ErrorKind, Read};

use memchr::memchr;

/// The page separator byte.
pub const PAGE_BREAK: u8 = 0x0C;

/// Initial read-buffer size; doubles whenever a read fills it.
const INITIAL_BUF: usize = 8 * 1024;

// =============================================================================
// Page
// =============================================================================

/// One page of content: an owned byte buffer, escape sequences and all.
///
/// Trailing newlines are stripped at construction; the terminal supplies the
/// bottom margin, the content does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    content: Vec<u8>,
}

impl Page {
    fn from_bytes(bytes: &[u8]) -> Self {
        let mut end = bytes.len();
        while end > 0 && bytes[end - 1] == b'\n' {
            end -= 1;
        }
        Self {
            content: bytes[..end].to_vec(),
        }
    }

    /// The page's raw bytes, written to the terminal verbatim.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// =============================================================================
// PageStore
// =============================================================================

/// The loaded page sequence plus the current page index.
///
/// Invariant: `current < pages.len()` whenever the store is non-empty.
/// `load` is the only constructor; it always produces at least one page.
#[derive(Debug)]
pub struct PageStore {
    pages: Vec<Page>,
    current: usize,
}

impl PageStore {
    /// Load pages from a stream.
    ///
    /// The stream is read in doubling chunks and split on form-feed bytes.
    /// Each page has trailing newlines stripped; a page that is empty after
    /// stripping is dropped unless `keep_empty`. A single newline directly
    /// after a form-feed is swallowed, even across read boundaries. The bytes
    /// after the last separator always become the final page, empty or not,
    /// so any stream loads to at least one page.
    ///
    /// Interrupted reads are retried; any other read error is returned and
    /// the pages accumulated so far are released.
    pub fn load<R: Read>(mut reader: R, keep_empty: bool) -> io::Result<Self> {
        let mut pages = Vec::new();
        let mut buf = vec![0u8; INITIAL_BUF];
        let mut len = 0;
        let mut swallow_newline = false;

        loop {
            if len == buf.len() {
                buf.resize(buf.len() * 2, 0);
            }
            let n = match reader.read(&mut buf[len..]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            len += n;

            let mut start = 0;
            if swallow_newline {
                if buf[start] == b'\n' {
                    start += 1;
                }
                swallow_newline = false;
            }
            while let Some(pos) = memchr(PAGE_BREAK, &buf[start..len]) {
                Self::push_page(&mut pages, &buf[start..start + pos], keep_empty);
                start += pos + 1;
                if start < len {
                    if buf[start] == b'\n' {
                        start += 1;
                    }
                } else {
                    swallow_newline = true;
                }
            }
            buf.copy_within(start..len, 0);
            len -= start;
        }

        // The remainder is always kept: it marks true end of input, and it
        // guarantees at least one page for any stream.
        pages.push(Page::from_bytes(&buf[..len]));

        Ok(Self { pages, current: 0 })
    }

    fn push_page(pages: &mut Vec<Page>, bytes: &[u8], keep_empty: bool) {
        let page = Page::from_bytes(bytes);
        if page.is_empty() && !keep_empty {
            return;
        }
        pages.push(page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page on display.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Page {
        &self.pages[self.current]
    }

    /// Step to the previous page; no-op at the first page.
    pub fn back(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    /// Step to the next page; no-op at the last page.
    pub fn forward(&mut self) {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
        }
    }

    /// True for the single empty page a zero-byte stream loads to.
    pub fn is_sole_empty(&self) -> bool {
        self.pages.len() == 1 && self.pages[0].is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(bytes: &[u8], keep_empty: bool) -> PageStore {
        PageStore::load(Cursor::new(bytes), keep_empty).unwrap()
    }

    fn contents(store: &PageStore) -> Vec<&[u8]> {
        store.pages.iter().map(|p| p.content()).collect()
    }

    #[test]
    fn test_split_on_form_feed() {
        let store = load(b"A\x0cB\x0cC", false);
        assert_eq!(contents(&store), [b"A", b"B", b"C"]);
    }

    #[test]
    fn test_separator_count_plus_one() {
        let store = load(b"one\x0ctwo", true);
        assert_eq!(store.page_count(), 2);
    }

    #[test]
    fn test_trailing_newlines_stripped() {
        let store = load(b"A\n\n\x0cB\n", false);
        assert_eq!(contents(&store), [b"A", b"B"]);
    }

    #[test]
    fn test_newline_after_separator_swallowed() {
        let store = load(b"A\x0c\nB", false);
        assert_eq!(contents(&store), [b"A", b"B"]);
    }

    #[test]
    fn test_only_one_newline_swallowed() {
        let store = load(b"A\x0c\n\nB", false);
        assert_eq!(contents(&store), [b"A".as_slice(), b"\nB".as_slice()]);
    }

    #[test]
    fn test_empty_interior_page_dropped() {
        let store = load(b"A\x0c\x0cB", false);
        assert_eq!(contents(&store), [b"A", b"B"]);
    }

    #[test]
    fn test_empty_interior_page_kept_on_request() {
        let store = load(b"A\x0c\x0cB", true);
        assert_eq!(
            contents(&store),
            [b"A".as_slice(), b"".as_slice(), b"B".as_slice()]
        );
    }

    #[test]
    fn test_final_empty_page_always_kept() {
        let store = load(b"A\x0c", false);
        assert_eq!(contents(&store), [b"A".as_slice(), b"".as_slice()]);
    }

    #[test]
    fn test_zero_byte_input_loads_one_empty_page() {
        let store = load(b"", false);
        assert_eq!(store.page_count(), 1);
        assert!(store.is_sole_empty());
    }

    #[test]
    fn test_newline_only_page_is_empty_after_strip() {
        let store = load(b"\n\x0cB", false);
        assert_eq!(contents(&store), [b"B"]);

        let store = load(b"\n\x0cB", true);
        assert_eq!(contents(&store), [b"".as_slice(), b"B".as_slice()]);
    }

    /// Yields one byte per read call, forcing every chunk boundary.
    struct OneByte<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl Read for OneByte<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.data.len() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_newline_swallow_across_read_boundary() {
        let reader = OneByte {
            data: b"A\x0c\nB",
            pos: 0,
        };
        let store = PageStore::load(reader, false).unwrap();
        assert_eq!(contents(&store), [b"A", b"B"]);
    }

    /// Fails with `Interrupted` before every successful read.
    struct Interrupting<'a> {
        inner: Cursor<&'a [u8]>,
        interrupt_next: bool,
    }

    impl Read for Interrupting<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.interrupt_next = true;
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let reader = Interrupting {
            inner: Cursor::new(b"A\x0cB"),
            interrupt_next: true,
        };
        let store = PageStore::load(reader, false).unwrap();
        assert_eq!(contents(&store), [b"A", b"B"]);
    }

    #[test]
    fn test_read_error_propagates() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(ErrorKind::BrokenPipe))
            }
        }
        assert!(PageStore::load(Failing, false).is_err());
    }

    #[test]
    fn test_input_larger_than_initial_buffer() {
        let mut data = vec![b'x'; INITIAL_BUF * 2 + 17];
        data[INITIAL_BUF + 3] = PAGE_BREAK;
        let store = load(&data, false);
        assert_eq!(store.page_count(), 2);
        assert_eq!(store.pages[0].len(), INITIAL_BUF + 3);
        assert_eq!(store.pages[1].len(), data.len() - INITIAL_BUF - 4);
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let mut store = load(b"A\x0cB\x0cC", false);
        store.back();
        assert_eq!(store.current_index(), 0);
        store.forward();
        store.forward();
        assert_eq!(store.current_index(), 2);
        store.forward();
        assert_eq!(store.current_index(), 2);
        assert_eq!(store.current().content(), b"C");
    }
}
