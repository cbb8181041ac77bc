use crate::entity::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SigninResponseDto {
    pub id: Uuid,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SigninResponseDto {
    pub fn from(session: Session) -> Self {
        Self {
            id: session.user_id,
            access_token: session.access_token,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SignoutResponseDto {
    pub id: Uuid,
    pub message: String,
}
