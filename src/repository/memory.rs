use crate::entity::session::Session;
use crate::entity::user::User;
use crate::error::storage_error::StorageError;
use crate::repository::{AuthBackend, SessionStore, UnitOfWork, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// In-memory backend for tests and local development. A unit of work holds
/// the whole-state lock and stages writes on a clone, so concurrent service
/// calls are linearized exactly like the database transactions they stand
/// in for.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Clone, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthBackend for MemoryBackend {
    type Uow = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, StorageError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryUnitOfWork { guard, staged })
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl UserStore for MemoryUnitOfWork {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .staged
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.staged.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&mut self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.staged.users.get(&id).cloned())
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), StorageError> {
        // Same constraints the schema enforces in Postgres
        if self.staged.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::ConstraintViolation("users_username_key".to_string()));
        }
        if self.staged.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::ConstraintViolation("users_email_key".to_string()));
        }
        if self.staged.users.contains_key(&user.id) {
            return Err(StorageError::ConstraintViolation("users_pkey".to_string()));
        }
        self.staged.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), StorageError> {
        self.staged.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryUnitOfWork {
    async fn find_session_by_token(&mut self, token: &str) -> Result<Option<Session>, StorageError> {
        Ok(self
            .staged
            .sessions
            .values()
            .find(|s| s.access_token == token)
            .cloned())
    }

    async fn insert_session(&mut self, session: &Session) -> Result<(), StorageError> {
        if self
            .staged
            .sessions
            .values()
            .any(|s| s.access_token == session.access_token)
        {
            return Err(StorageError::ConstraintViolation(
                "sessions_access_token_key".to_string(),
            ));
        }
        self.staged.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn update_session(&mut self, session: &Session) -> Result<(), StorageError> {
        self.staged.sessions.insert(session.id, session.clone());
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(mut self) -> Result<(), StorageError> {
        *self.guard = self.staged;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        // Dropping the staged copy and the guard is all there is to it
        Ok(())
    }
}
