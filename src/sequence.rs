//! Process-wide sequence-id generation for widget registrations.
//!
//! Every registration receives an id that is unique for the lifetime of the
//! process, regardless of which registry instance issued it. Registries take a
//! [`Sequence`] handle so tests can inject an isolated counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static PROCESS_SEQUENCE: OnceLock<Sequence> = OnceLock::new();

/// Cheaply cloneable handle to a monotonic id counter.
#[derive(Debug, Clone)]
pub struct Sequence {
    counter: Arc<AtomicU64>,
}

impl Sequence {
    /// Create an isolated counter starting at 1.
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    /// The shared counter used by default for all registries in this process.
    pub fn process_wide() -> Self {
        PROCESS_SEQUENCE.get_or_init(Sequence::new).clone()
    }

    /// Issue the next id.
    pub fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let sequence = Sequence::new();
        let first = sequence.next_id();
        let second = sequence.next_id();
        assert!(second > first);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let sequence = Sequence::new();
        let clone = sequence.clone();
        let first = sequence.next_id();
        let second = clone.next_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_process_wide_is_shared() {
        let a = Sequence::process_wide().next_id();
        let b = Sequence::process_wide().next_id();
        assert_ne!(a, b);
    }
}
