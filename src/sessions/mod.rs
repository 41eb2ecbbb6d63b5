// src/sessions/mod.rs
pub mod token;

use crate::explorer::{Explorer, SharedExplorer};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use token::new_session_token;

pub const SESSION_COOKIE: &str = "explorer_session";
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

struct Session {
    explorer: SharedExplorer,
    last_seen: Instant,
}

/// Browser sessions, each with its own explorer. Idle sessions are dropped
/// the next time the store is touched, and once `max_sessions` are live the
/// least recently seen one makes room for a new one.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
    max_sessions: usize,
}

/// A session resolved for one request.
pub struct SessionHandle {
    pub token: String,
    pub explorer: SharedExplorer,
    /// The browser needs a `Set-Cookie` for `token`.
    pub created: bool,
}

impl SessionHandle {
    pub fn set_cookie_header(&self) -> Option<String> {
        self.created.then(|| {
            format!(
                "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
                self.token
            )
        })
    }
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Find the session for `token`, or start a new one built by `make`.
    pub fn get_or_create(
        &self,
        token: Option<&str>,
        make: impl FnOnce() -> Explorer,
    ) -> SessionHandle {
        self.get_or_create_at(token, Instant::now(), make)
    }

    pub fn get_or_create_at(
        &self,
        token: Option<&str>,
        now: Instant,
        make: impl FnOnce() -> Explorer,
    ) -> SessionHandle {
        let mut sessions = self.sessions.lock();
        self.evict_idle(&mut sessions, now);

        if let Some(handle) = touch(&mut sessions, token, now) {
            return handle;
        }

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(token, _)| token.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                warn!(max_sessions = self.max_sessions, "session limit reached, dropped the least recent");
            }
        }

        let token = new_session_token();
        let explorer = Arc::new(Mutex::new(make()));
        sessions.insert(
            token.clone(),
            Session {
                explorer: explorer.clone(),
                last_seen: now,
            },
        );
        info!(sessions = sessions.len(), "session started");

        SessionHandle {
            token,
            explorer,
            created: true,
        }
    }

    /// Existing session only; never creates one.
    pub fn get(&self, token: Option<&str>) -> Option<SessionHandle> {
        self.get_at(token, Instant::now())
    }

    pub fn get_at(&self, token: Option<&str>, now: Instant) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock();
        self.evict_idle(&mut sessions, now);
        touch(&mut sessions, token, now)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<String, Session>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) < self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }
    }
}

fn touch(
    sessions: &mut HashMap<String, Session>,
    token: Option<&str>,
    now: Instant,
) -> Option<SessionHandle> {
    let token = token.filter(|t| token::looks_like_token(t))?;
    let session = sessions.get_mut(token)?;
    session.last_seen = now;
    Some(SessionHandle {
        token: token.to_string(),
        explorer: session.explorer.clone(),
        created: false,
    })
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}
