//! Latest-request-wins coordination of overlapping builds.
//!
//! Every build takes a ticket from [`BuildSupervisor::begin`]. When it
//! completes, [`BuildSupervisor::finish`] hands its result back only if no
//! newer build has started in the meantime; superseded results are
//! discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Identifies one build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildTicket(u64);

impl BuildTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Shared ticket counter. Safe to use from several threads.
///
/// # Example
///
/// ```rust
/// use trail_mesh::pipeline::BuildSupervisor;
///
/// let supervisor = BuildSupervisor::new();
/// let old = supervisor.begin();
/// let new = supervisor.begin();
/// assert_eq!(supervisor.finish(old, "stale"), None);
/// assert_eq!(supervisor.finish(new, "fresh"), Some("fresh"));
/// ```
#[derive(Debug, Default)]
pub struct BuildSupervisor {
    latest: AtomicU64,
}

impl BuildSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a build, superseding every earlier ticket.
    pub fn begin(&self) -> BuildTicket {
        BuildTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// True while no newer build has begun.
    pub fn is_current(&self, ticket: BuildTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Returns `result` for the current ticket, `None` for a superseded one.
    pub fn finish<T>(&self, ticket: BuildTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            debug!(ticket = ticket.0, "discarding superseded build");
            None
        }
    }
}
