//! Session Store
//!
//! Keeps live interview sessions in memory, keyed by UUID. Every session sits
//! behind its own async mutex: a handler holds the lock for the whole
//! `advance`, so steps of one session run one after another while different
//! sessions progress concurrently. Readers use the last committed snapshot
//! and never wait for a step in flight.

use chrono::{DateTime, Utc};
use interview_core::session::SessionState;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, MutexGuard, RwLock, watch};
use uuid::Uuid;

/// One stored session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct SessionEntry {
    record: Mutex<SessionRecord>,
    latest: watch::Sender<SessionRecord>,
}

impl SessionEntry {
    fn new(record: SessionRecord) -> Self {
        Self {
            latest: watch::Sender::new(record.clone()),
            record: Mutex::new(record),
        }
    }

    /// Exclusive access for a step or an update.
    pub async fn lock(&self) -> MutexGuard<'_, SessionRecord> {
        self.record.lock().await
    }

    /// The last committed record.
    pub fn snapshot(&self) -> SessionRecord {
        self.latest.borrow().clone()
    }

    /// Stores `state` in the locked `record`, bumps `updated_at` and
    /// publishes the result to readers.
    pub fn commit(&self, record: &mut SessionRecord, state: SessionState) {
        record.state = state;
        record.updated_at = Utc::now();
        self.latest.send_replace(record.clone());
    }
}

pub type SessionHandle = Arc<SessionEntry>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session under a fresh id and returns its handle.
    pub async fn insert(&self, state: SessionState) -> SessionHandle {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let handle = Arc::new(SessionEntry::new(SessionRecord {
            id,
            state,
            created_at: now,
            updated_at: now,
        }));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Snapshots of every session, oldest first.
    pub async fn list(&self) -> Vec<SessionRecord> {
        let mut records: Vec<SessionRecord> = self
            .sessions
            .read()
            .await
            .values()
            .map(|handle| handle.snapshot())
            .collect();
        records.sort_by_key(|record| record.created_at);
        records
    }
}
