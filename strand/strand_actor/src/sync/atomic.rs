//! Lock-free sequence numbers.

use std::sync::atomic::{AtomicU64, Ordering};

use strand_core::MessageId;

/// A sequence number that can be safely incremented across threads.
///
/// The actor system uses one sequence for request correlation ids and one
/// for numbering spawned actor threads.
#[derive(Debug)]
pub struct AtomicSequence {
    /// The next value to hand out
    value: AtomicU64,
}

impl AtomicSequence {
    /// Create a new atomic sequence starting from the specified value.
    pub fn new(start: u64) -> Self {
        Self {
            value: AtomicU64::new(start),
        }
    }

    /// Get the next sequence number.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst)
    }

    /// Allocate a fresh request id.
    ///
    /// Values that would collide with the `NONE` sentinel (zero, or zero
    /// once the response bit is masked off) are skipped.
    pub fn next_request_id(&self) -> MessageId {
        loop {
            let id = MessageId::request(self.next());
            if !id.is_none() {
                return id;
            }
        }
    }
}

impl Default for AtomicSequence {
    fn default() -> Self {
        Self::new(1)
    }
}
