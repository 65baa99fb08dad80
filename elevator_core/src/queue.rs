//! Bounded FIFO of pending passenger requests.
//!
//! A fixed-capacity ring buffer: `head` indexes the oldest unserved request,
//! `len` counts occupied slots. Insertion into a full queue, or of a request
//! whose origin equals its destination, is refused without touching state.

use crate::floor::Floor;

/// A passenger waiting at `origin` who wants to go to `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    pub origin: Floor,
    pub destination: Floor,
}

impl Request {
    pub fn new(origin: Floor, destination: Floor) -> Self {
        Self {
            origin,
            destination,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.origin == self.destination
    }
}

/// Why an enqueue was refused. Neither case is an error; the request is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueReject {
    Full,
    Degenerate,
}

#[derive(Debug, Clone)]
pub struct RequestQueue {
    slots: Box<[Option<Request>]>,
    head: usize,
    len: usize,
}

impl RequestQueue {
    /// Default capacity of the board.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// `capacity` is clamped to at least one slot.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Append at the tail.
    pub fn enqueue(&mut self, req: Request) -> Result<(), QueueReject> {
        if req.is_degenerate() {
            return Err(QueueReject::Degenerate);
        }
        if self.is_full() {
            return Err(QueueReject::Full);
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(req);
        self.len += 1;
        Ok(())
    }

    /// Oldest pending request without removing it.
    pub fn peek_head(&self) -> Option<Request> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head]
    }

    /// Remove and return the oldest request. Callers must check `is_empty` first;
    /// `None` here means that check was skipped.
    pub fn pop_head(&mut self) -> Option<Request> {
        if self.is_empty() {
            return None;
        }
        let req = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        req
    }

    /// Pending requests, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Request> + '_ {
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % self.slots.len()])
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.head = 0;
        self.len = 0;
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(o: u8, d: u8) -> Request {
        Request::new(
            Floor::from_index(o).unwrap(),
            Floor::from_index(d).unwrap(),
        )
    }

    #[test]
    fn wraps_around_the_ring() {
        let mut q = RequestQueue::with_capacity(3);
        q.enqueue(req(0, 1)).unwrap();
        q.enqueue(req(1, 2)).unwrap();
        assert_eq!(q.pop_head(), Some(req(0, 1)));
        q.enqueue(req(2, 3)).unwrap();
        q.enqueue(req(3, 0)).unwrap();
        assert!(q.is_full());
        let order: Vec<Request> = q.iter().collect();
        assert_eq!(order, vec![req(1, 2), req(2, 3), req(3, 0)]);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut q = RequestQueue::default();
        assert_eq!(q.peek_head(), None);
        q.enqueue(req(1, 0)).unwrap();
        assert_eq!(q.peek_head(), Some(req(1, 0)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn degenerate_is_refused_before_capacity() {
        let mut q = RequestQueue::with_capacity(1);
        q.enqueue(req(0, 1)).unwrap();
        assert_eq!(q.enqueue(req(2, 2)), Err(QueueReject::Degenerate));
        assert_eq!(q.enqueue(req(2, 3)), Err(QueueReject::Full));
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut q = RequestQueue::default();
        assert_eq!(q.pop_head(), None);
        q.enqueue(req(0, 3)).unwrap();
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.pop_head(), None);
    }
}
