use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub frames: u64,
}

/// Process-wide bookkeeping of live chat sessions, lifecycle and metrics
/// only. Nothing routes across sessions through here.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, ActiveSession>>,
    started_total: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            started_total: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ActiveSession>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn register(self: &Arc<Self>, session_id: Uuid, user_id: String) -> SessionGuard {
        self.started_total.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(
            session_id,
            ActiveSession {
                user_id,
                started_at: Utc::now(),
                frames: 0,
            },
        );
        SessionGuard {
            registry: Arc::clone(self),
            session_id,
        }
    }

    fn deregister(&self, session_id: Uuid) {
        self.lock().remove(&session_id);
    }

    pub fn record_frame(&self, session_id: Uuid) {
        if let Some(session) = self.lock().get_mut(&session_id) {
            session.frames += 1;
        }
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    pub fn started_total(&self) -> u64 {
        self.started_total.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Vec<(Uuid, ActiveSession)> {
        self.lock()
            .iter()
            .map(|(id, session)| (*id, session.clone()))
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deregisters its session when dropped, whatever the exit path.
pub struct SessionGuard {
    registry: Arc<SessionRegistry>,
    session_id: Uuid,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.deregister(self.session_id);
        tracing::debug!(
            session = %self.session_id,
            active = self.registry.active_count(),
            "chat session deregistered"
        );
    }
}
