// src/core/session.rs — In-memory session store with idle-timeout eviction
//
// One store per process, shared behind an Arc; a single mapping-wide
// mutex guards every read-modify-write (sweep, create, append). Locks
// are scoped per operation and never held across an await.
//
// Eviction is lazy: expired sessions are swept on each `get_or_create`,
// not on a background timer. A deliberate simplification at this
// traffic volume, isolated behind this interface so a periodic sweep
// could replace it without touching callers. One consequence: after a
// burst with no further requests, evicted-but-unswept sessions linger
// until the next `get_or_create`.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::provider::Turn;

struct Session {
    turns: Vec<Turn>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            turns: Vec::new(),
            created_at: now,
            last_accessed: now,
        }
    }

    fn expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_accessed > timeout
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    pub fn with_timeout_minutes(minutes: u64) -> Self {
        Self::new(Duration::minutes(minutes as i64))
    }

    /// Return the session's history, creating an empty session on first
    /// reference (or after eviction). Bumps the last-accessed timestamp
    /// and sweeps all expired sessions first.
    pub fn get_or_create(&self, session_id: &str) -> Vec<Turn> {
        let now = Utc::now();
        let mut sessions = self.lock();

        let before = sessions.len();
        sessions.retain(|_, s| !s.expired(now, self.timeout));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "swept expired sessions");
        }

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(now));
        session.last_accessed = now;
        session.turns.clone()
    }

    /// Append a user turn then an assistant turn to the session. If the
    /// session was evicted mid-request this drops the exchange with a
    /// log line; the next access starts a fresh session.
    pub fn record_exchange(&self, session_id: &str, user_text: &str, assistant_text: &str) {
        let mut sessions = self.lock();
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.turns.push(Turn::user(user_text));
                session.turns.push(Turn::assistant(assistant_text));
                session.last_accessed = Utc::now();
            }
            None => {
                tracing::warn!(session_id, "session gone before exchange could be recorded");
            }
        }
    }

    /// Number of live (non-expired) sessions. Read-only: does not evict.
    pub fn count(&self) -> usize {
        let now = Utc::now();
        self.lock()
            .values()
            .filter(|s| !s.expired(now, self.timeout))
            .count()
    }

    /// Manually evict one session.
    pub fn clear(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned lock only means another request panicked mid-write;
        // the map itself is still usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
