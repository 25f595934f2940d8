use crate::conversation::state::ConversationState;
use crate::models::events::UserId;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    AwaitingContainerNumber,
    AwaitingPhoto { container_id: i64, container_name: String },
    AwaitingDocument { container_id: i64, container_name: String },
}

/// Which conversation a user is currently in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Flow {
    #[default]
    Idle,
    Order(ConversationState),
    Search(SearchState),
}

#[derive(Debug)]
pub struct Session {
    pub flow: Flow,
    touched_at: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            flow: Flow::Idle,
            touched_at: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.touched_at = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.touched_at.elapsed()
    }

    pub fn reset(&mut self) {
        self.flow = Flow::Idle;
    }
}

/// Per-user sessions. Holding a user's guard serializes that user's events; users never share one.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<UserId, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the user's previous event to finish, then hands out their session.
    pub async fn lock(&self, user_id: UserId) -> OwnedMutexGuard<Session> {
        loop {
            let session = self
                .sessions
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
                .clone();
            let guard = session.clone().lock_owned().await;

            // The sweeper may have dropped the entry while we waited.
            let current = self
                .sessions
                .get(&user_id)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &session));
            if current {
                return guard;
            }
        }
    }

    /// Drops sessions idle for longer than `ttl`. Sessions busy with an event are kept.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => guard.idle_for() < ttl,
            Err(_) => true,
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
