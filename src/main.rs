//! CLI entry point for `ffp`.

use std::fs::File;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ffp::{display, Error, Overlay, PageStore, Result};

/// Page form-feed separated text on the terminal.
///
/// With fewer than two pages the content is printed directly and no
/// terminal session is started. Navigate with the arrow and page keys,
/// redraw with Ctrl-L, quit with q.
#[derive(Debug, Parser)]
#[command(name = "ffp", version)]
struct Cli {
    /// File to page, or '-' for standard input.
    file: Option<String>,

    /// Keep empty pages (the final page is always kept).
    #[arg(short = 'e')]
    empty: bool,

    /// Draw a progress bar on the last row.
    #[arg(short = 'b')]
    bar: bool,

    /// Draw the page number and page count.
    #[arg(short = 'p')]
    page_number: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ffp: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    check_stdout()?;

    let mut overlay = Overlay::NONE;
    if cli.bar {
        overlay |= Overlay::BAR;
    }
    if cli.page_number {
        overlay |= Overlay::INDICATOR;
    }

    let mut store = open_source(cli.file.as_deref(), cli.empty)?;
    tracing::debug!(pages = store.page_count(), "input loaded");

    display::run(&mut store, overlay)
}

/// Resolve `-` or an absent argument to standard input, anything else to a
/// file path, and load the pages. The source is closed as soon as loading
/// finishes.
fn open_source(file: Option<&str>, keep_empty: bool) -> Result<PageStore> {
    let store = match file {
        None | Some("-") => PageStore::load(io::stdin().lock(), keep_empty)?,
        Some(path) => {
            let file = File::open(path)?;
            PageStore::load(&file, keep_empty)?
        }
    };
    Ok(store)
}

/// A closed standard output descriptor is fatal before any work begins.
fn check_stdout() -> Result<()> {
    let mut status = unsafe { std::mem::zeroed::<libc::stat>() };
    if unsafe { libc::fstat(libc::STDOUT_FILENO, &mut status) } != 0 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EBADF) {
            return Err(Error::Io(err));
        }
    }
    Ok(())
}
