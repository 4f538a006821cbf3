use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::debug;

use crate::metrics::TRACKED_CLIENTS;

// Client identity - the peer IP of the inbound connection (port ignored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientKey(IpAddr);

impl From<IpAddr> for ClientKey {
    fn from(ip: IpAddr) -> Self {
        Self(ip)
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Sliding window policy, fixed at startup
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub max_requests: usize,
    pub window: Duration,
}

// Outcome of one admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub admitted: bool,
    /// Slots left in the current window after this decision.
    pub remaining: usize,
    /// Set on rejection when the oldest logged request is known.
    pub retry_after: Option<Duration>,
}

/// Per-client sliding window limiter.
///
/// Each client keeps the instants of its admitted requests. The whole
/// read-prune-count-append sequence for one key runs while holding the
/// map's entry guard, so two concurrent calls for the same key never both
/// see the last free slot.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    policy: Policy,
    logs: Arc<DashMap<ClientKey, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            logs: Arc::new(DashMap::new()),
        }
    }

    pub fn try_admit(&self, key: ClientKey, now: Instant) -> Decision {
        let window = self.policy.window;
        let max = self.policy.max_requests;

        // entry guard = write lock on this key's shard
        let mut log = self.logs.entry(key).or_default();
        prune(&mut log, now, window);

        if log.len() >= max {
            let retry_after = log
                .front()
                .and_then(|&oldest| oldest.checked_add(window))
                .map(|expires| expires.saturating_duration_since(now));
            return Decision {
                admitted: false,
                remaining: 0,
                retry_after,
            };
        }

        log.push_back(now);
        Decision {
            admitted: true,
            remaining: max - log.len(),
            retry_after: None,
        }
    }

    /// Prunes every log and drops clients with nothing left in the window.
    /// Returns the number of clients removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let window = self.policy.window;
        let before = self.logs.len();
        self.logs.retain(|_, log| {
            prune(log, now, window);
            !log.is_empty()
        });
        before.saturating_sub(self.logs.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.logs.len()
    }
}

// Drop entries that fell out of the window; log is in arrival order
fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = log.front() {
        if now.saturating_duration_since(oldest) < window {
            break;
        }
        log.pop_front();
    }
}

// Idle sweeper - runs every `every` until the runtime shuts down
pub async fn idle_sweeper(limiter: SlidingWindowLimiter, every: Duration) {
    let mut interval = interval(every);
    // first tick fires immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let removed = limiter.sweep(Instant::now());
        let tracked = limiter.tracked_clients();
        TRACKED_CLIENTS.set(tracked as f64);

        if removed > 0 {
            debug!(removed, tracked, "swept idle rate limit entries");
        }
    }
}
