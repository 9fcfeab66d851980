use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::preferences::{Preferences, Profile};
use crate::query::describe;

/// State of one interactive session: the preferences being edited and the
/// profiles finalized so far. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct Session {
    pub preferences: Preferences,
    pub profiles: Vec<Profile>,
}

impl Session {
    /// Snapshots the current preferences under `title`.
    pub fn finalize_profile(&mut self, title: &str) -> Profile {
        let profile = Profile {
            title: title.to_string(),
            preferences: describe(&self.preferences),
        };
        self.profiles.push(profile.clone());
        profile
    }

    /// First profile with this title; titles are not required to be unique.
    pub fn find_profile(&self, title: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.title == title)
    }

    pub fn has_profiles(&self) -> bool {
        !self.profiles.is_empty()
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

pub const MAX_SESSIONS: usize = 1024;
pub const IDLE_TIMEOUT_MINUTES: i64 = 30;

#[derive(Debug)]
struct SessionEntry {
    session: SharedSession,
    last_seen: DateTime<Utc>,
}

/// Live sessions keyed by id. Sessions idle for longer than the timeout are
/// dropped, and the least recently seen one is evicted once the registry is
/// full.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    counter: AtomicU64,
    capacity: usize,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limits(MAX_SESSIONS, Duration::minutes(IDLE_TIMEOUT_MINUTES))
    }
}

impl SessionRegistry {
    pub fn with_limits(capacity: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
            capacity: capacity.max(1),
            idle_timeout,
        }
    }

    /// Looks up the session for `id`, creating it on first use. Without an id
    /// a fresh one is generated.
    pub fn resolve(&self, id: Option<&str>) -> (String, SharedSession) {
        self.resolve_at(id, Utc::now())
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    fn resolve_at(&self, id: Option<&str>, now: DateTime<Utc>) -> (String, SharedSession) {
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self.next_id(),
        };

        let mut sessions = lock(&self.sessions);
        let cutoff = now - self.idle_timeout;
        sessions.retain(|key, entry| {
            let keep = entry.last_seen >= cutoff;
            if !keep {
                info!("Session {} expired", key);
            }
            keep
        });

        if !sessions.contains_key(&id) && sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                warn!("Session limit of {} reached, evicting {}", self.capacity, oldest);
                sessions.remove(&oldest);
            }
        }

        let entry = sessions.entry(id.clone()).or_insert_with(|| {
            info!("Starting session {}", id);
            SessionEntry {
                session: Arc::new(Mutex::new(Session::default())),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        let session = entry.session.clone();
        debug!("Resolved session {} ({} active)", id, sessions.len());
        (id, session)
    }

    fn next_id(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().format("%Y%m%d%H%M%S%f"), sequence)
    }
}

/// A panic while holding the lock leaves the data usable; take it anyway.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
