pub(crate) mod memory;
pub(crate) mod postgres;

use crate::entity::session::Session;
use crate::entity::user::User;
use crate::error::storage_error::StorageError;
use async_trait::async_trait;

/// Uniqueness-checked persistence of user records. Lookups report absence
/// as `Ok(None)`; it only becomes an error once a business rule says so.
#[async_trait]
pub trait UserStore {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, StorageError>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StorageError>;
    async fn find_user_by_id(&mut self, id: uuid::Uuid) -> Result<Option<User>, StorageError>;
    /// Fails with `ConstraintViolation` if a concurrent duplicate slipped
    /// past the application-level checks.
    async fn insert_user(&mut self, user: &User) -> Result<(), StorageError>;
    async fn update_user(&mut self, user: &User) -> Result<(), StorageError>;
}

/// Persistence of issued tokens and their lifecycle timestamps.
#[async_trait]
pub trait SessionStore {
    async fn find_session_by_token(&mut self, token: &str) -> Result<Option<Session>, StorageError>;
    async fn insert_session(&mut self, session: &Session) -> Result<(), StorageError>;
    async fn update_session(&mut self, session: &Session) -> Result<(), StorageError>;
}

/// Transaction boundary for one service call: every read and write of a
/// signup/signin/signout goes through a single unit of work, committed on
/// success. Dropping an uncommitted unit of work rolls it back, so error
/// paths can simply `?` out.
#[async_trait]
pub trait UnitOfWork: UserStore + SessionStore + Send {
    async fn commit(self) -> Result<(), StorageError>;
    async fn rollback(self) -> Result<(), StorageError>;
}

/// Storage backend handle owned by the authentication service.
#[async_trait]
pub trait AuthBackend: Clone + Send + Sync + 'static {
    type Uow: UnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, StorageError>;
}
