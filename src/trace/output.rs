//! Guarded report sink.

use std::fmt;
use std::io::{self, Write};

/// Writes report text to a sink, keeping the first write error.
///
/// Once a write has failed every later write is skipped, so a broken pipe
/// yields one error rather than one per table row. Each call to [`Output::fmt`]
/// issues exactly one `write_all` on the sink.
pub struct Output<W: Write> {
    out: W,
    err: Option<io::Error>,
}

impl<W: Write> Output<W> {
    pub fn new(out: W) -> Self {
        Self { out, err: None }
    }

    pub fn fmt(&mut self, args: fmt::Arguments<'_>) {
        if self.err.is_some() {
            return;
        }
        let text = fmt::format(args);
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            log::debug!("Report write failed, suppressing further output: {e}");
            self.err = Some(e);
        }
    }

    pub fn failed(&self) -> bool {
        self.err.is_some()
    }

    /// Hand back the first write error, if any.
    pub fn finish(self) -> io::Result<()> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// `out!(out, "...", args)` formats into an [`Output`].
macro_rules! out {
    ($out:expr, $($arg:tt)*) => {
        $out.fmt(format_args!($($arg)*))
    };
}
pub(crate) use out;
