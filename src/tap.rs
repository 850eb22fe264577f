use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use crate::Destination;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(usize, Vec<u8>),
    Close(usize),
}

/// Ordered record of what every tap saw.
#[derive(Debug, Default)]
pub struct Journal {
    events: Mutex<Vec<Event>>,
    busy: AtomicBool,
}
impl Journal {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn written_to(&self, id: usize) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write(i, bytes) if i == id => Some(bytes),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn close_count(&self, id: usize) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == Event::Close(id))
            .count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// A destination that journals its traffic and panics on misuse.
#[derive(Debug)]
pub struct Tap {
    id: usize,
    journal: Arc<Journal>,
    closed: bool,
    fail_write: bool,
    fail_close: bool,
    panic_write: bool,
}
impl Tap {
    pub fn new(id: usize, journal: Arc<Journal>) -> Self {
        Self {
            id,
            journal,
            closed: false,
            fail_write: false,
            fail_close: false,
            panic_write: false,
        }
    }

    pub fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn panicking_write(mut self) -> Self {
        self.panic_write = true;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }
}
impl Write for Tap {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        assert!(!self.closed, "tap {} written after close", self.id);
        if self.panic_write {
            panic!("tap {} panicked on write", self.id);
        }
        let overlapped = self.journal.busy.swap(true, Ordering::SeqCst);
        assert!(!overlapped, "tap {} written concurrently", self.id);
        std::thread::yield_now();
        self.journal.push(Event::Write(self.id, buf.to_vec()));
        self.journal.busy.store(false, Ordering::SeqCst);
        if self.fail_write {
            return Err(io::Error::other("tap write failure"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
impl Destination for Tap {
    fn close(&mut self) -> io::Result<()> {
        assert!(!self.closed, "tap {} closed twice", self.id);
        self.closed = true;
        self.journal.push(Event::Close(self.id));
        if self.fail_close {
            return Err(io::Error::other("tap close failure"));
        }
        Ok(())
    }
}
