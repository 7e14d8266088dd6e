use tracing::trace;

/// Ticket for one scheduled tick.
///
/// Carries the loop generation it was issued for; a tick whose generation
/// no longer matches the loop is stale and must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle {
    id: u64,
    generation: u64,
}

impl TickHandle {
    /// Sequence number of the tick
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Loop generation the tick belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Display-synchronized tick queue.
///
/// At most one tick is pending at a time: the platform fires one callback
/// per display frame, so scheduling again before it fires coalesces into
/// the newer request.
#[derive(Debug, Default)]
pub struct TickScheduler {
    next_id: u64,
    pending: Option<TickHandle>,
}

impl TickScheduler {
    /// Empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tick for the next display frame
    pub fn schedule(&mut self, generation: u64) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle {
            id: self.next_id,
            generation,
        };
        if let Some(replaced) = self.pending.replace(handle) {
            trace!(replaced = replaced.id, by = handle.id, "tick coalesced");
        }
        handle
    }

    /// Cancel `handle` if it is still pending. Returns whether it was.
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancel whatever is pending
    pub fn cancel_all(&mut self) {
        self.pending = None;
    }

    /// Remove and return the tick due on this display frame
    pub fn take_due(&mut self) -> Option<TickHandle> {
        self.pending.take()
    }

    /// Whether a tick is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_fire() {
        let mut scheduler = TickScheduler::new();
        let handle = scheduler.schedule(3);
        assert_eq!(handle.generation(), 3);
        assert!(scheduler.is_pending());
        assert_eq!(scheduler.take_due(), Some(handle));
        assert_eq!(scheduler.take_due(), None);
    }

    #[test]
    fn test_cancel_only_matching_handle() {
        let mut scheduler = TickScheduler::new();
        let first = scheduler.schedule(1);
        let second = scheduler.schedule(1);
        assert_ne!(first.id(), second.id());
        assert!(!scheduler.cancel(first));
        assert!(scheduler.is_pending());
        assert!(scheduler.cancel(second));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_reschedule_coalesces() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(1);
        let newest = scheduler.schedule(2);
        assert_eq!(scheduler.take_due(), Some(newest));
        assert!(!scheduler.is_pending());
    }
}
