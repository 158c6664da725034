//! Per-client sliding-window rate limiting.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Sliding-window request limiter keyed by client id.
///
/// Each client gets a window of admitted-request timestamps. A check prunes
/// entries that have aged out of the window, then admits the request only if
/// fewer than `max_requests` remain. Rejected checks are not recorded, so a
/// client hammering the gateway while over quota does not push its recovery
/// further out.
///
/// Counting a trailing window instead of fixed buckets means a client cannot
/// double its effective rate by timing bursts around a bucket edge.
pub struct RateLimiter {
    windows: DashMap<String, VecDeque<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Check whether a request from `client_id` may proceed right now.
    ///
    /// Never fails. The boolean is the whole contract: callers translate
    /// `false` into whatever refusal their layer speaks.
    pub fn is_allowed(&self, client_id: &str) -> bool {
        self.is_allowed_at(client_id, Instant::now())
    }

    /// Check-and-record against an explicit instant.
    ///
    /// The map entry is held for the whole prune-then-decide-then-append
    /// sequence, so concurrent checks for the same client cannot both slip
    /// under the quota. Checks for different clients only contend on the
    /// map's shard locks.
    pub fn is_allowed_at(&self, client_id: &str, now: Instant) -> bool {
        let mut entry = self.windows.entry(client_id.to_string()).or_default();
        let timestamps = entry.value_mut();

        Self::prune(timestamps, now, self.time_window);

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Number of admitted requests currently recorded for `client_id`.
    ///
    /// Read-only: does not prune, so the count may include entries the next
    /// check would age out.
    pub fn active_requests(&self, client_id: &str) -> usize {
        self.windows.get(client_id).map_or(0, |w| w.len())
    }

    /// Number of clients with a tracked window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Drop clients whose windows are empty once pruned against the current
    /// instant. Run periodically so long-idle clients do not pin memory for
    /// the life of the process.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    /// Sweep against an explicit instant.
    pub fn sweep_at(&self, now: Instant) {
        self.windows.retain(|_, timestamps| {
            Self::prune(timestamps, now, self.time_window);
            !timestamps.is_empty()
        });
    }

    // Timestamps are insertion-ordered, so pruning stops at the first entry
    // still inside the window. An entry exactly `time_window` old is out.
    fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, time_window: Duration) {
        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) >= time_window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}
