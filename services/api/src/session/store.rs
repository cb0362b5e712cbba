use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kanon_common::error::{KanonError, KanonResult};
use uuid::Uuid;

use crate::session::model::Session;

/// In-memory session registry shared across handlers. Sessions live for the
/// process lifetime; there is no persistence.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn insert(&self, session: Session) -> KanonResult<Uuid> {
        let id = session.id;
        let mut sessions = self
            .inner
            .write()
            .map_err(|_| KanonError::Internal("session store lock poisoned".to_string()))?;
        sessions.insert(id, session);
        Ok(id)
    }

    /// Runs `f` against the session, read-only.
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> KanonResult<T> {
        let sessions = self
            .inner
            .read()
            .map_err(|_| KanonError::Internal("session store lock poisoned".to_string()))?;
        let session = sessions
            .get(&id)
            .ok_or_else(|| KanonError::NotFound(format!("session not found: {id}")))?;
        Ok(f(session))
    }

    /// Runs `f` against the session with write access. The closure returns a
    /// result so validation failures roll up without partial mutation
    /// semantics leaking out.
    pub fn with_session_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> KanonResult<T>,
    ) -> KanonResult<T> {
        let mut sessions = self
            .inner
            .write()
            .map_err(|_| KanonError::Internal("session store lock poisoned".to_string()))?;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| KanonError::NotFound(format!("session not found: {id}")))?;
        f(session)
    }
}
