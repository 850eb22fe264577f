//! A single write/close sink that swaps its underlying destination according
//! to a pluggable rotation policy.
//!
//! ```
//! use std::io::Write;
//!
//! use revolving_log::{NoClose, Period, Revolver, TimeBucket};
//!
//! let policy = TimeBucket::new(Period::days(1), |_day| Ok(NoClose::new(std::io::sink())));
//! let mut log = Revolver::new(policy);
//! writeln!(log, "hello")?;
//! log.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use std::io::{self, BufWriter, Write};

mod error;
#[cfg(test)]
mod tap;
pub mod rotator;
mod slot;
pub mod time_bucket;

pub use error::Error;
pub use rotator::{Revolver, Rotate};
pub use time_bucket::{Period, TimeBucket};

/// A physical sink owned by a [`Revolver`] until it is rotated out or the
/// revolver is closed.
///
/// `close` is called at most once per destination.
pub trait Destination: Write {
    fn close(&mut self) -> io::Result<()>;
}

impl Destination for std::fs::File {
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W> Destination for BufWriter<W>
where
    W: Write,
{
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<D> Destination for Box<D>
where
    D: Destination + ?Sized,
{
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts a writer that must outlive the rotation, such as stdout.
///
/// Closing only flushes; the inner writer stays usable.
#[derive(Debug)]
pub struct NoClose<W> {
    inner: W,
}
impl<W> NoClose<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
impl<W> Write for NoClose<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
impl<W> Destination for NoClose<W>
where
    W: Write,
{
    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
