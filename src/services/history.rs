//! Session history
//!
//! In-memory, append-only record of the classifications made from the web
//! form, one list per browser session. Nothing is persisted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Entries kept per session; the oldest is dropped first
pub const MAX_ENTRIES_PER_SESSION: usize = 100;

/// Sessions idle for longer than this are dropped
pub const SESSION_IDLE_TIMEOUT_SECS: i64 = 3600;

/// Live sessions kept at once; the least recently seen is evicted first
pub const MAX_SESSIONS: usize = 10_000;

/// One classified message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub classification: String,
    pub confidence: f64,
}

#[derive(Debug)]
struct Session {
    entries: VecDeque<HistoryEntry>,
    last_seen: DateTime<Utc>,
}

/// History of every live session
#[derive(Debug)]
pub struct HistoryStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    max_sessions: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_max_sessions(MAX_SESSIONS)
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Append an entry to a session, creating the session if needed
    ///
    /// The entry's timestamp is the clock used to expire idle sessions.
    pub fn append(&self, session_id: Uuid, entry: HistoryEntry) {
        let now = entry.timestamp;
        if let Ok(mut sessions) = self.sessions.write() {
            let cutoff = now - Duration::seconds(SESSION_IDLE_TIMEOUT_SECS);
            let before = sessions.len();
            sessions.retain(|id, session| *id == session_id || session.last_seen >= cutoff);
            if sessions.len() < before {
                debug!("Pruned {} idle history sessions", before - sessions.len());
            }

            if !sessions.contains_key(&session_id) && sessions.len() >= self.max_sessions {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, session)| session.last_seen)
                    .map(|(id, _)| *id);
                if let Some(oldest) = oldest {
                    sessions.remove(&oldest);
                    debug!("Evicted history session {} at capacity", oldest);
                }
            }

            let session = sessions.entry(session_id).or_insert_with(|| Session {
                entries: VecDeque::new(),
                last_seen: now,
            });
            session.last_seen = now;
            session.entries.push_back(entry);
            while session.entries.len() > MAX_ENTRIES_PER_SESSION {
                session.entries.pop_front();
            }
        }
    }

    /// Entries of a session, newest first
    pub fn entries(&self, session_id: Uuid) -> Vec<HistoryEntry> {
        match self.sessions.read() {
            Ok(sessions) => sessions
                .get(&session_id)
                .map(|session| session.entries.iter().rev().cloned().collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}
