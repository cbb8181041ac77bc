use crate::config::database::{Database, DatabaseTrait};
use crate::entity::session::Session;
use crate::entity::user::User;
use crate::error::storage_error::StorageError;
use crate::repository::{AuthBackend, SessionStore, UnitOfWork, UserStore};
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;

const USER_COLUMNS: &str = "id, username, email, password, salt, first_name, last_name, country, \
                            about_me, dob, contact_number, role, last_login_at, created_at, updated_at";

const SESSION_COLUMNS: &str = "id, user_id, access_token, login_at, expires_at, logout_at";

/// Postgres-backed store. A unit of work is one `sqlx` transaction, so the
/// commit-or-nothing guarantee comes straight from the database.
#[derive(Clone)]
pub struct PgBackend {
    db_conn: Arc<Database>,
}

impl PgBackend {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
impl AuthBackend for PgBackend {
    type Uow = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, StorageError> {
        let tx = self.db_conn.get_pool().begin().await?;
        Ok(PgUnitOfWork { tx })
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

fn map_write_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StorageError::ConstraintViolation(db.constraint().unwrap_or("unknown").to_string())
        }
        _ => StorageError::Unavailable(e),
    }
}

#[async_trait]
impl UserStore for PgUnitOfWork {
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&mut self, id: uuid::Uuid) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password, salt, first_name, last_name, \
             country, about_me, dob, contact_number, role, last_login_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.salt)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.country)
        .bind(&user.about_me)
        .bind(&user.dob)
        .bind(&user.contact_number)
        .bind(&user.role)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE users SET email = $1, password = $2, salt = $3, first_name = $4, \
             last_name = $5, country = $6, about_me = $7, dob = $8, contact_number = $9, \
             role = $10, last_login_at = $11, updated_at = NOW() WHERE id = $12",
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.salt)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.country)
        .bind(&user.about_me)
        .bind(&user.dob)
        .bind(&user.contact_number)
        .bind(&user.role)
        .bind(user.last_login_at)
        .bind(user.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgUnitOfWork {
    async fn find_session_by_token(&mut self, token: &str) -> Result<Option<Session>, StorageError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {} FROM sessions WHERE access_token = $1",
            SESSION_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(session)
    }

    async fn insert_session(&mut self, session: &Session) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, access_token, login_at, expires_at, logout_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.access_token)
        .bind(session.login_at)
        .bind(session.expires_at)
        .bind(session.logout_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn update_session(&mut self, session: &Session) -> Result<(), StorageError> {
        sqlx::query("UPDATE sessions SET logout_at = $1 WHERE id = $2")
            .bind(session.logout_at)
            .bind(session.id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
