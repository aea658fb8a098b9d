//! Per-client request budget.
//!
//! Every inbound request is charged against a fixed window keyed by client
//! identity. Entries live for a fixed TTL from creation and are dropped lazily
//! on lookup and eagerly by [`AdmissionController::spawn_sweeper`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RateLimitConfig;
use crate::constants::intervals::{MAX_ENTRY_TTL, MIN_SWEEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub max_requests: u32,
    pub window: Duration,
    pub ttl: Duration,
    pub renew_on_hit: bool,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            max_requests: 1,
            window: Duration::from_secs(1),
            ttl: Duration::from_secs(60 * 60),
            renew_on_hit: false,
        }
    }
}

impl From<&RateLimitConfig> for AdmissionPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_millis(config.window_millis),
            ttl: Duration::from_secs(config.entry_ttl_seconds),
            renew_on_hit: config.renew_on_hit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Reject { retry_after: Duration },
}

impl Admission {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub window_start: Instant,
    pub count: u32,
    pub expires_at: Instant,
}

/// `now + span` that never overflows the clock, however large `span` is.
fn deadline(now: Instant, span: Duration) -> Instant {
    now.checked_add(span)
        .or_else(|| now.checked_add(MAX_ENTRY_TTL))
        .unwrap_or(now)
}

impl RateLimitEntry {
    fn fresh(now: Instant, ttl: Duration) -> Self {
        Self {
            window_start: now,
            count: 1,
            expires_at: deadline(now, ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct AdmissionController {
    policy: AdmissionPolicy,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(AdmissionPolicy::default())
    }
}

impl AdmissionController {
    #[must_use]
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    // Entries are plain counters; a poisoned lock still holds a usable table.
    fn table(&self) -> MutexGuard<'_, HashMap<String, RateLimitEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn admit(&self, key: &str) -> Admission {
        self.admit_at(key, Instant::now())
    }

    pub fn admit_at(&self, key: &str, now: Instant) -> Admission {
        let policy = self.policy;
        let mut table = self.table();

        let live = table.get(key).is_some_and(|entry| !entry.is_expired(now));
        if !live {
            table.insert(key.to_string(), RateLimitEntry::fresh(now, policy.ttl));
            return Admission::Allow;
        }
        let Some(entry) = table.get_mut(key) else {
            return Admission::Allow;
        };

        let window_end = deadline(entry.window_start, policy.window);
        let decision = if now < window_end {
            entry.count = entry.count.saturating_add(1);
            if entry.count > policy.max_requests {
                Admission::Reject {
                    retry_after: window_end - now,
                }
            } else {
                Admission::Allow
            }
        } else {
            entry.window_start = now;
            entry.count = 1;
            Admission::Allow
        };

        if policy.renew_on_hit && decision.is_allowed() {
            entry.expires_at = deadline(now, policy.ttl);
        }

        decision
    }

    /// Drops every entry whose TTL has passed. Returns how many were removed.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut table = self.table();
        let before = table.len();
        table.retain(|_, entry| !entry.is_expired(now));
        before - table.len()
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    /// Runs [`Self::sweep`] on a fixed interval until the task is aborted.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let every = every.max(MIN_SWEEP);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            info!("Admission sweeper started ({}s)", every.as_secs());

            loop {
                interval.tick().await;
                let removed = controller.sweep();
                if removed > 0 {
                    debug!("Swept {} expired admission entries", removed);
                }
                #[allow(clippy::cast_precision_loss)]
                metrics::gauge!("admission_entries").set(controller.len() as f64);
            }
        })
    }
}
