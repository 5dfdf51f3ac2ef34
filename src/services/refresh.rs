//! Refresh supersession.
//!
//! Each refresh cycle takes a ticket before fetching. When its layout is
//! ready, the result is only accepted if no newer cycle has started since;
//! stale passes are discarded rather than merged.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RefreshGeneration {
    latest: AtomicU64,
}

impl RefreshGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new refresh cycle, superseding every earlier ticket.
    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Hand back `result` only if `ticket` still belongs to the newest cycle.
    pub fn accept<T>(&self, ticket: RefreshTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            log::debug!(
                "Discarding stale refresh {} (latest is {})",
                ticket.0,
                self.latest.load(Ordering::SeqCst)
            );
            None
        }
    }
}
