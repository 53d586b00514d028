// ABOUTME: Short-lived store of pending authorizations keyed by OAuth state
// ABOUTME: Each entry holds the PKCE verifier and is consumed once by the callback

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};

/// How long a user has to finish the consent screen
pub const PENDING_TTL_MINUTES: i64 = 10;

/// Upper bound on outstanding sign-ins; the oldest is evicted beyond this
pub const MAX_PENDING_AUTHORIZATIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub code_verifier: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Entries {
    by_state: HashMap<String, PendingAuthorization>,
    /// Insertion order. May hold states already consumed by `take`.
    order: VecDeque<(String, DateTime<Utc>)>,
}

impl Entries {
    fn is_live(&self, state: &str, created_at: DateTime<Utc>) -> bool {
        self.by_state
            .get(state)
            .is_some_and(|pending| pending.created_at == created_at)
    }

    /// Drop expired and already-consumed entries from the front of the queue.
    fn prune(&mut self, now: DateTime<Utc>, ttl: Duration) {
        while let Some((state, created_at)) = self.order.front() {
            let live = self.is_live(state, *created_at);
            if live && now - *created_at < ttl {
                break;
            }
            if live {
                self.by_state.remove(state);
            }
            self.order.pop_front();
        }
    }

    fn evict_oldest(&mut self) {
        while let Some((state, created_at)) = self.order.pop_front() {
            if self.is_live(&state, created_at) {
                self.by_state.remove(&state);
                return;
            }
        }
    }
}

/// In-memory pending authorization map, bounded in size
#[derive(Debug)]
pub struct PendingAuthorizations {
    entries: Mutex<Entries>,
    ttl: Duration,
    max_entries: usize,
}

impl Default for PendingAuthorizations {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingAuthorizations {
    pub fn new() -> Self {
        Self::with_limits(
            Duration::minutes(PENDING_TTL_MINUTES),
            MAX_PENDING_AUTHORIZATIONS,
        )
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_limits(ttl, MAX_PENDING_AUTHORIZATIONS)
    }

    pub fn with_limits(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Remember a state/verifier pair. Expired entries are pruned from the
    /// oldest end; at capacity the oldest live entry is evicted.
    pub fn insert(&self, state: String, code_verifier: String) {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.prune(now, self.ttl);

        while entries.by_state.len() >= self.max_entries {
            entries.evict_oldest();
            warn!(
                max_entries = self.max_entries,
                "Pending authorization limit reached, evicted oldest"
            );
        }

        entries.order.push_back((state.clone(), now));
        entries.by_state.insert(
            state,
            PendingAuthorization {
                code_verifier,
                created_at: now,
            },
        );
        debug!(pending = entries.by_state.len(), "Stored pending authorization");
    }

    /// Remove and return the verifier for `state`. Unknown or expired state
    /// is a CSRF failure.
    pub fn take(&self, state: &str) -> AuthResult<PendingAuthorization> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let pending = entries
            .by_state
            .remove(state)
            .ok_or(AuthError::StateMismatch)?;

        if Utc::now() - pending.created_at >= self.ttl {
            debug!("Pending authorization expired");
            return Err(AuthError::StateMismatch);
        }
        Ok(pending)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .by_state
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
