use crate::Destination;

/// The one destination attributed to a revolver, and whether the revolver
/// has been closed.
///
/// Once `closed` is set the slot is empty and never refilled.
#[derive(Debug)]
pub struct Slot<D> {
    current: Option<D>,
    rotations: usize,
    closed: bool,
}
impl<D> Slot<D>
where
    D: Destination,
{
    pub fn new() -> Self {
        Self {
            current: None,
            rotations: 0,
            closed: false,
        }
    }

    /// Adopts `next` and hands back the destination it displaced, still open.
    pub fn replace(&mut self, next: D) -> Option<D> {
        debug_assert!(!self.closed);
        self.rotations += 1;
        self.current.replace(next)
    }

    /// Marks the slot closed and hands back whatever was open.
    pub fn seal(&mut self) -> Option<D> {
        self.closed = true;
        self.current.take()
    }

    pub fn current(&mut self) -> Option<&mut D> {
        self.current.as_mut()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn rotations(&self) -> usize {
        self.rotations
    }
}
