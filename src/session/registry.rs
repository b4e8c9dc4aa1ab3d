//! Session registry for the HTTP layer.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::context::SessionContext;

/// Maps session ids to their contexts.
///
/// The lock is held only while the closure given to
/// [`with_session`](Self::with_session) runs, so closures must stay
/// synchronous and short.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, SessionContext>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session and returns its id.
    pub fn open(&self, payroll_month: impl Into<String>, supervisor: Option<String>) -> Uuid {
        let context = SessionContext::new(payroll_month, supervisor);
        let id = context.id;
        self.lock().insert(id, context);
        id
    }

    /// Closes a session, returning its context.
    pub fn close(&self, id: Uuid) -> EngineResult<SessionContext> {
        self.lock().remove(&id).ok_or_else(|| not_found(id))
    }

    /// Runs `f` against the session's context.
    pub fn with_session<T, F>(&self, id: Uuid, f: F) -> EngineResult<T>
    where
        F: FnOnce(&mut SessionContext) -> EngineResult<T>,
    {
        let mut sessions = self.lock();
        let context = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(context)
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session is open.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionContext>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(id: Uuid) -> EngineError {
    EngineError::SessionNotFound { id: id.to_string() }
}
