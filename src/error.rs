use std::io;

/// Failures surfaced by [`crate::Revolver`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The revolver has already been closed. Terminal.
    #[error("revolver: closed")]
    Closed,
    /// The rotation policy failed to decide or to create a destination.
    /// Nothing was rotated.
    #[error("revolver: rotation policy failed: {0}")]
    Policy(#[source] io::Error),
    /// The active destination failed to write or to close.
    #[error("revolver: destination failed: {0}")]
    Destination(#[source] io::Error),
    /// The policy has not yet handed out any destination to write to.
    #[error("revolver: no destination has been opened")]
    NoDestination,
}
impl Error {
    /// Whether an error coming out of the `io::Write` impl means the
    /// revolver was closed.
    pub fn is_closed(err: &io::Error) -> bool {
        matches!(
            err.get_ref().and_then(|e| e.downcast_ref::<Error>()),
            Some(Error::Closed)
        )
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Policy(e) | Error::Destination(e) => e,
            Error::Closed => io::Error::new(io::ErrorKind::BrokenPipe, Error::Closed),
            Error::NoDestination => {
                io::Error::new(io::ErrorKind::NotConnected, Error::NoDestination)
            }
        }
    }
}
