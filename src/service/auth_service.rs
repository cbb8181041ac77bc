use crate::config::logging::secure_log;
use crate::dto::user_dto::UserSignupDto;
use crate::entity::session::Session;
use crate::entity::user::{User, ROLE_NONADMIN};
use crate::error::auth_error::AuthError;
use crate::error::token_error::TokenError;
use crate::error::ApiError;
use crate::repository::{AuthBackend, SessionStore, UnitOfWork, UserStore};
use crate::service::password_service::PasswordService;
use crate::service::token_service::TokenService;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates signup, signin and signout; owns the invariants and the
/// error semantics. Collaborators are injected at construction and every
/// operation runs inside a single unit of work.
#[derive(Clone)]
pub struct AuthService<B: AuthBackend> {
    backend: B,
    passwords: PasswordService,
    tokens: TokenService,
}

impl<B: AuthBackend> AuthService<B> {
    pub fn new(backend: B, passwords: PasswordService, tokens: TokenService) -> Self {
        Self {
            backend,
            passwords,
            tokens,
        }
    }

    /// Register a new user. Username uniqueness is checked strictly before
    /// email uniqueness, so a candidate colliding on both reports
    /// `UsernameTaken`.
    pub async fn signup(&self, payload: UserSignupDto) -> Result<User, ApiError> {
        let mut uow = self.backend.begin().await?;

        if uow.find_user_by_username(&payload.username).await?.is_some() {
            warn!("Signup rejected, username taken: {}", payload.username);
            return Err(AuthError::UsernameTaken.into());
        }
        if uow.find_user_by_email(&payload.email).await?.is_some() {
            warn!("Signup rejected, email taken");
            return Err(AuthError::EmailTaken.into());
        }

        let (salt, digest) = self.passwords.encrypt(&payload.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: payload.username,
            email: payload.email,
            password: digest,
            salt,
            first_name: payload.first_name,
            last_name: payload.last_name,
            country: payload.country,
            about_me: payload.about_me,
            dob: payload.dob,
            contact_number: payload.contact_number,
            role: ROLE_NONADMIN.to_string(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        // The schema's unique constraints close the race between the
        // checks above and this insert.
        uow.insert_user(&user).await?;
        uow.commit().await?;

        info!("User registered: {}", user.id);
        Ok(user)
    }

    /// Authenticate by username/password and open a new session with a
    /// fixed validity window.
    pub async fn signin(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let mut uow = self.backend.begin().await?;

        let mut user = uow
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        let derived = self.passwords.encrypt_with_salt(password, &user.salt)?;
        if derived != user.password {
            warn!("Signin rejected, bad credentials for user: {}", user.id);
            return Err(AuthError::BadCredentials.into());
        }

        let login_at = Utc::now();
        let expires_at = login_at + self.tokens.validity_window();
        let access_token = self.tokens.generate_token(&user, login_at, expires_at)?;

        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            access_token,
            login_at,
            expires_at,
            logout_at: None,
        };
        uow.insert_session(&session).await?;

        user.last_login_at = Some(login_at);
        uow.update_user(&user).await?;
        uow.commit().await?;

        info!("Session opened for user: {}", user.id);
        Ok(session)
    }

    /// End the session belonging to an access token and return its owner.
    /// A token that is unknown, or whose session has already ended, is
    /// rejected; the logout timestamp is written exactly once. Expiry is
    /// deliberately not checked here.
    pub async fn signout(&self, access_token: &str) -> Result<User, ApiError> {
        let mut uow = self.backend.begin().await?;

        let mut session = uow
            .find_session_by_token(access_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        if session.is_ended() {
            return Err(AuthError::SessionNotFound.into());
        }

        session.logout_at = Some(Utc::now());
        uow.update_session(&session).await?;

        // A session without an owner is treated the same as no session
        let user = uow
            .find_user_by_id(session.user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        uow.commit().await?;

        info!("Session ended for user: {}", user.id);
        Ok(user)
    }

    /// Resolve a bearer token to its active session and owning user. The
    /// token signature is re-verified against the owner's current digest,
    /// and expiry is evaluated here, lazily, by this consumer; it never
    /// mutates session state.
    pub async fn resolve_session(&self, access_token: &str) -> Result<(Session, User), ApiError> {
        let mut uow = self.backend.begin().await?;

        let session = uow
            .find_session_by_token(access_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;
        if session.is_ended() {
            return Err(AuthError::SessionNotFound.into());
        }
        if session.is_expired_at(Utc::now()) {
            return Err(TokenError::TokenExpired.into());
        }

        let user = uow
            .find_user_by_id(session.user_id)
            .await?
            .ok_or_else(|| {
                secure_log::secure_error!(format!(
                    "Session {} references a missing user",
                    session.id
                ));
                AuthError::SessionNotFound
            })?;

        // A password change invalidates the tokens signed with the old digest
        self.tokens.decode_token(access_token, &user.password)?;

        // Reads only; the unit of work is dropped, nothing to commit
        Ok((session, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::storage_error::StorageError;
    use crate::repository::memory::MemoryBackend;
    use chrono::Duration;

    fn service() -> AuthService<MemoryBackend> {
        // Minimum bcrypt cost keeps the tests fast
        AuthService::new(MemoryBackend::new(), PasswordService::new(4), TokenService::new(8))
    }

    fn signup_dto(username: &str, email: &str) -> UserSignupDto {
        UserSignupDto {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter2!".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            country: None,
            about_me: None,
            dob: None,
            contact_number: None,
        }
    }

    #[tokio::test]
    async fn test_signup_stores_hashed_credentials() {
        let service = service();
        let user = service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        assert!(!user.id.is_nil());
        assert_ne!(user.password, "hunter2!");
        assert!(!user.salt.is_empty());
        assert_eq!(user.role, ROLE_NONADMIN);
        assert!(user.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_signup_salts_differ_across_users() {
        let service = service();
        let a = service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();
        let b = service.signup(signup_dto("bob", "bob@example.com")).await.unwrap();
        assert_ne!(a.salt, b.salt);
    }

    #[tokio::test]
    async fn test_signup_username_collision() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        let err = service
            .signup(signup_dto("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_signup_email_collision() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        let err = service
            .signup(signup_dto("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_signup_username_checked_before_email() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        // Collides on both; username wins
        let err = service
            .signup(signup_dto("alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_signin_opens_session_with_exact_window() {
        let service = service();
        let user = service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        let session = service.signin("alice", "hunter2!").await.unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.expires_at, session.login_at + Duration::hours(8));
        assert!(session.logout_at.is_none());
        assert!(!session.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_signin_stamps_last_login() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        let session = service.signin("alice", "hunter2!").await.unwrap();

        let (_, user) = service.resolve_session(&session.access_token).await.unwrap();
        assert_eq!(user.last_login_at, Some(session.login_at));
    }

    #[tokio::test]
    async fn test_parallel_signins_get_distinct_sessions() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        let a = service.signin("alice", "hunter2!").await.unwrap();
        let b = service.signin("alice", "hunter2!").await.unwrap();
        assert_ne!(a.access_token, b.access_token);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_signin_failures_are_distinguishable() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();

        let err = service.signin("alice", "wrong password").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::BadCredentials)));

        let err = service.signin("nobody", "hunter2!").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_signout_ends_session_and_returns_owner() {
        let service = service();
        let registered = service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();
        let session = service.signin("alice", "hunter2!").await.unwrap();

        let owner = service.signout(&session.access_token).await.unwrap();
        assert_eq!(owner.id, registered.id);

        // The ended session no longer resolves
        let err = service.resolve_session(&session.access_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_signout_unknown_token() {
        let service = service();
        let err = service.signout("no-such-token").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_signout_twice_is_rejected() {
        let service = service();
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();
        let session = service.signin("alice", "hunter2!").await.unwrap();

        service.signout(&session.access_token).await.unwrap();
        let err = service.signout(&session.access_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_session_rejects_expired() {
        // Zero-hour window: the session expires the instant it is minted
        let service = AuthService::new(
            MemoryBackend::new(),
            PasswordService::new(4),
            TokenService::new(0),
        );
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();
        let session = service.signin("alice", "hunter2!").await.unwrap();

        let err = service.resolve_session(&session.access_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Token(TokenError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_resolve_session_with_missing_owner() {
        let backend = MemoryBackend::new();
        let service =
            AuthService::new(backend.clone(), PasswordService::new(4), TokenService::new(8));

        let login_at = Utc::now();
        let orphan = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            access_token: "orphan-token".to_string(),
            login_at,
            expires_at: login_at + Duration::hours(8),
            logout_at: None,
        };
        let mut uow = backend.begin().await.unwrap();
        uow.insert_session(&orphan).await.unwrap();
        uow.commit().await.unwrap();

        let err = service.resolve_session("orphan-token").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_session_rejects_stale_signature() {
        let backend = MemoryBackend::new();
        let service =
            AuthService::new(backend.clone(), PasswordService::new(4), TokenService::new(8));
        service.signup(signup_dto("alice", "alice@example.com")).await.unwrap();
        let session = service.signin("alice", "hunter2!").await.unwrap();

        // Rotate the stored digest out from under the open session
        let mut uow = backend.begin().await.unwrap();
        let mut user = uow.find_user_by_username("alice").await.unwrap().unwrap();
        user.password = "$2b$04$abcdefghijklmnopqrstuvABCDEFGHIJKLMNOPQRSTUVWXYZ012345".to_string();
        uow.update_user(&user).await.unwrap();
        uow.commit().await.unwrap();

        let err = service.resolve_session(&session.access_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Token(TokenError::InvalidToken)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_signups_admit_exactly_one() {
        let service = service();
        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .signup(signup_dto("alice", &format!("alice{}@example.com", i)))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(ApiError::Auth(AuthError::UsernameTaken)) => {}
                Err(ApiError::Storage(StorageError::ConstraintViolation(_))) => {}
                Err(e) => panic!("unexpected signup error: {}", e),
            }
        }
        assert_eq!(successes, 1);
    }
}
