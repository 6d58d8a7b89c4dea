//! In-memory registry of wizard sessions. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::session::{SessionInfo, WizardSession};

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<WizardSession>>>,
    internal_links: Vec<String>,
}

impl SessionStore {
    pub fn new(internal_links: Vec<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            internal_links,
        }
    }

    pub async fn create(&self) -> Arc<WizardSession> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(WizardSession::new(id.clone(), self.internal_links.clone()));
        self.sessions.write().await.insert(id.clone(), session.clone());
        tracing::info!("[SessionStore] Created session {}", id);
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<WizardSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Sessions ordered by creation time, oldest first.
    pub async fn list(&self) -> Vec<SessionInfo> {
        let sessions: Vec<Arc<WizardSession>> =
            self.sessions.read().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(sessions.len());
        for session in sessions {
            infos.push(session.info().await);
        }
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        infos
    }

    /// Returns `true` if a session was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!("[SessionStore] Deleted session {}", id);
        }
        removed
    }
}
