//! Per-dispatcher session tracking for the `initialized` flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

/// Most sessions one dispatcher tracks at a time.
pub const MAX_SESSIONS: usize = 1024;

/// Sessions unused for this long are forgotten.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Sessions opened by `initialize` on one dispatcher.
///
/// Clients that send `Mcp-Session-Id` are tracked individually. Clients
/// that send no header share a single anonymous session. Tracking is
/// bounded: idle sessions expire, and at capacity the least recently used
/// session is evicted.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<Sessions>,
    anonymous: AtomicBool,
    max_sessions: usize,
    idle_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
struct LastSeen {
    at: Instant,
    /// Orders uses that share an `Instant`.
    tick: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<String, LastSeen>,
    tick: u64,
}

impl Sessions {
    fn stamp(&mut self, at: Instant) -> LastSeen {
        self.tick += 1;
        LastSeen {
            at,
            tick: self.tick,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limits(MAX_SESSIONS, SESSION_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            anonymous: AtomicBool::new(false),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    /// Register a fresh session and return its id.
    pub fn open(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        sessions
            .entries
            .retain(|_, seen| now.duration_since(seen.at) < self.idle_timeout);
        while sessions.entries.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .entries
                .iter()
                .min_by_key(|(_, seen)| seen.tick)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            debug!(session = %oldest, "Evicting least recently used session");
            sessions.entries.remove(&oldest);
        }

        let seen = sessions.stamp(now);
        sessions.entries.insert(id.clone(), seen);
        id
    }

    pub fn mark_anonymous_initialized(&self) {
        self.anonymous.store(true, Ordering::Release);
    }

    /// Whether the session context a request belongs to has completed
    /// `initialize`. A known session counts as used.
    pub fn is_initialized(&self, session_id: Option<&str>) -> bool {
        let Some(id) = session_id else {
            return self.anonymous.load(Ordering::Acquire);
        };
        let now = Instant::now();
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match sessions.entries.get(id).copied() {
            Some(seen) if now.duration_since(seen.at) < self.idle_timeout => {
                let seen = sessions.stamp(now);
                sessions.entries.insert(id.to_string(), seen);
                true
            }
            Some(_) => {
                sessions.entries.remove(id);
                false
            }
            None => false,
        }
    }

    /// Forget a session. Returns whether it existed.
    pub fn close(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .remove(session_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_tracked_independently() {
        let registry = SessionRegistry::new();
        assert!(!registry.is_initialized(None));
        assert!(!registry.is_initialized(Some("nope")));

        let id = registry.open();
        assert!(registry.is_initialized(Some(&id)));
        assert!(!registry.is_initialized(None));

        registry.mark_anonymous_initialized();
        assert!(registry.is_initialized(None));

        assert!(registry.close(&id));
        assert!(!registry.is_initialized(Some(&id)));
        assert!(registry.is_empty());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let registry = SessionRegistry::with_limits(3, SESSION_IDLE_TIMEOUT);
        let first = registry.open();
        let second = registry.open();
        let third = registry.open();

        // touching `first` makes `second` the eviction candidate
        assert!(registry.is_initialized(Some(&first)));
        let fourth = registry.open();

        assert_eq!(registry.len(), 3);
        assert!(registry.is_initialized(Some(&first)));
        assert!(!registry.is_initialized(Some(&second)));
        assert!(registry.is_initialized(Some(&third)));
        assert!(registry.is_initialized(Some(&fourth)));
    }

    #[test]
    fn many_opens_stay_bounded() {
        let registry = SessionRegistry::new();
        let ids: Vec<String> = (0..MAX_SESSIONS * 3).map(|_| registry.open()).collect();
        assert_eq!(registry.len(), MAX_SESSIONS);
        assert!(registry.is_initialized(ids.last().map(String::as_str)));
    }

    #[test]
    fn idle_sessions_expire() {
        let registry = SessionRegistry::with_limits(MAX_SESSIONS, Duration::ZERO);
        let stale = registry.open();
        assert!(!registry.is_initialized(Some(&stale)));
        assert!(registry.is_empty());

        registry.open();
        registry.open();
        assert_eq!(registry.len(), 1);
    }
}
