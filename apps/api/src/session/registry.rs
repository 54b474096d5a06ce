use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::llm_client::TextCompletion;
use crate::session::controller::SessionController;

/// In-memory session store. Sessions are not persisted across restarts.
pub struct SessionRegistry {
    llm: Arc<dyn TextCompletion>,
    max_sessions: usize,
    sessions: RwLock<HashMap<Uuid, Arc<SessionController>>>,
}

impl SessionRegistry {
    pub fn new(llm: Arc<dyn TextCompletion>, max_sessions: usize) -> Self {
        Self {
            llm,
            max_sessions: max_sessions.max(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a session, evicting the oldest one when the store is full.
    pub async fn create(&self) -> Arc<SessionController> {
        let session = SessionController::new(Arc::clone(&self.llm));
        let mut sessions = self.sessions.write().await;

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.created_at())
                .map(|s| s.id());
            let Some(oldest) = oldest else { break };
            if let Some(evicted) = sessions.remove(&oldest) {
                evicted.shutdown();
                info!(session = %oldest, "Evicted oldest session");
            }
        }

        sessions.insert(session.id(), Arc::clone(&session));
        info!(session = %session.id(), live = sessions.len(), "Session created");
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<SessionController>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Removes the session and aborts its in-flight work.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.shutdown();
                info!(session = %id, "Session removed");
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
