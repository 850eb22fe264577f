use std::{
    fmt,
    io::{self, Write},
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{slot::Slot, Destination, Error};

/// Decides, once per write, whether the revolver must switch destinations.
///
/// - `Ok(None)`: keep writing to the current destination.
/// - `Ok(Some(next))`: close the current destination and adopt `next`.
/// - `Err(e)`: abort the write; nothing is closed or adopted.
///
/// A policy must hand out a destination on the first call it sees, since
/// there is nothing to keep writing to before that.
///
/// The revolver never calls `next` concurrently.
pub trait Rotate {
    type Destination: Destination;

    fn next(&mut self) -> io::Result<Option<Self::Destination>>;
}

impl<R> Rotate for Box<R>
where
    R: Rotate + ?Sized,
{
    type Destination = R::Destination;

    fn next(&mut self) -> io::Result<Option<Self::Destination>> {
        (**self).next()
    }
}

/// A write/close sink that forwards to exactly one destination at a time,
/// switching destinations whenever its [`Rotate`] policy says so.
///
/// Every operation runs under one lock, policy call and destination I/O
/// included, so a rotation never interleaves with a write or a close.
/// Share it across threads behind an `Arc`; `&Revolver` implements
/// [`Write`].
pub struct Revolver<R>
where
    R: Rotate,
{
    inner: Mutex<Inner<R>>,
}

struct Inner<R>
where
    R: Rotate,
{
    rotator: R,
    slot: Slot<R::Destination>,
}

impl<R> Revolver<R>
where
    R: Rotate,
{
    pub fn new(rotator: R) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rotator,
                slot: Slot::new(),
            }),
        }
    }

    /// Forwards `buf` to the destination the policy selects.
    ///
    /// Returns the destination's own byte count. On rotation the previous
    /// destination is closed before `buf` reaches the new one; a failure to
    /// close it does not fail the write.
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let mut inner = self.lock();
        let Inner { rotator, slot } = &mut *inner;
        if slot.is_closed() {
            return Err(Error::Closed);
        }

        let retired = match rotator.next().map_err(Error::Policy)? {
            None => None,
            Some(next) => slot
                .replace(next)
                .and_then(|mut previous| previous.close().err()),
        };
        let rotations = slot.rotations();

        let written = match slot.current() {
            Some(destination) => destination.write(buf).map_err(Error::Destination),
            None => Err(Error::NoDestination),
        };
        drop(inner);

        if let Some(e) = retired {
            tracing::warn!(
                rotations,
                error = %e,
                "rotated destination but failed to close the previous one"
            );
        }
        written
    }

    /// Closes the held destination, if any. Every later call fails with
    /// [`Error::Closed`].
    pub fn close(&self) -> Result<(), Error> {
        let mut inner = self.lock();
        if inner.slot.is_closed() {
            return Err(Error::Closed);
        }
        let Some(mut current) = inner.slot.seal() else {
            return Ok(());
        };
        current.close().map_err(Error::Destination)
    }

    fn flush_current(&self) -> Result<(), Error> {
        let mut inner = self.lock();
        if inner.slot.is_closed() {
            return Err(Error::Closed);
        }
        match inner.slot.current() {
            Some(destination) => destination.flush().map_err(Error::Destination),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> Write for &Revolver<R>
where
    R: Rotate,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Revolver::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_current().map_err(io::Error::from)
    }
}

impl<R> Write for Revolver<R>
where
    R: Rotate,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Revolver::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_current().map_err(io::Error::from)
    }
}

impl<R> Drop for Revolver<R>
where
    R: Rotate,
{
    fn drop(&mut self) {
        let inner = self
            .inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if inner.slot.is_closed() {
            return;
        }
        let Some(mut current) = inner.slot.seal() else {
            return;
        };
        if let Err(e) = current.close() {
            tracing::warn!(error = %e, "failed to close destination on drop");
        }
    }
}

impl<R> fmt::Debug for Revolver<R>
where
    R: Rotate,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Revolver")
            .field("rotations", &inner.slot.rotations())
            .field("closed", &inner.slot.is_closed())
            .finish_non_exhaustive()
    }
}
