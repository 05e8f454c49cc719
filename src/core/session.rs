//! Per-visitor state.
//!
//! [`SessionState`] holds everything the page needs between requests: the
//! selected language, the advanced toggle, the current uploads and their
//! processed outcomes. [`SessionStore`] keys states by an opaque id carried
//! in a cookie and evicts idle sessions.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::core::language::Language;
use crate::core::pipeline::ImageOutcome;
use crate::core::upload::UploadedImage;

/// What one visitor sees and has selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub language: Language,
    pub advanced_mode: bool,
    pub uploads: Vec<UploadedImage>,
    pub outcomes: Vec<ImageOutcome>,
}

impl SessionState {
    /// The state a fresh visitor starts from
    pub fn clear(&self) -> Self {
        Self::default()
    }

    /// Swap in a new upload set; old outcomes no longer apply
    pub fn replace_uploads(&mut self, uploads: Vec<UploadedImage>) {
        self.uploads = uploads;
        self.outcomes.clear();
    }

    pub fn has_uploads(&self) -> bool {
        !self.uploads.is_empty()
    }
}

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug)]
struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

/// Concurrent map of live sessions
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionId, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a cookie value to a live session without creating one
    ///
    /// A hit refreshes the session's idle clock.
    pub fn find(&self, raw: Option<&str>) -> Option<SessionId> {
        let id = raw?.parse::<SessionId>().ok()?;
        let mut entry = self.sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(id)
    }

    /// Resolve a cookie value to a live session, creating one when the value
    /// is missing, malformed or unknown.
    ///
    /// Returns the id to use and whether it was newly created.
    pub fn get_or_create(&self, raw: Option<&str>) -> (SessionId, bool) {
        if let Some(id) = self.find(raw) {
            return (id, false);
        }

        let id = SessionId::new();
        self.sessions.insert(
            id,
            SessionEntry {
                state: SessionState::default(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %id, "Session created");
        (id, true)
    }

    /// Snapshot of a session's state
    pub fn get(&self, id: &SessionId) -> Option<SessionState> {
        self.sessions.get(id).map(|entry| entry.state.clone())
    }

    /// Apply `f` to a session's state in place, creating an empty one if needed
    pub fn update<R>(&self, id: SessionId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut entry = self.sessions.entry(id).or_insert_with(|| SessionEntry {
            state: SessionState::default(),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        f(&mut entry.state)
    }

    /// Return a session to its initial state
    pub fn reset(&self, id: SessionId) {
        self.update(id, |state| *state = state.clear());
    }

    /// Drop sessions idle for longer than `ttl`; returns how many were removed
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() <= ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
