use crate::entity::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct UserSignupDto {
    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"))]
    pub username: String,
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "First name must not exceed 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must not exceed 100 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Country must not exceed 100 characters"))]
    pub country: Option<String>,
    #[validate(length(max = 500, message = "About me must not exceed 500 characters"))]
    pub about_me: Option<String>,
    pub dob: Option<String>,
    #[validate(length(max = 30, message = "Contact number must not exceed 30 characters"))]
    pub contact_number: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct UserSigninDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserReadDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub about_me: Option<String>,
    pub dob: Option<String>,
    pub contact_number: Option<String>,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserReadDto {
    pub fn from(model: User) -> UserReadDto {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            country: model.country,
            about_me: model.about_me,
            dob: model.dob,
            contact_number: model.contact_number,
            role: model.role,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SignupResponseDto {
    pub id: Uuid,
    pub status: String,
}

impl std::fmt::Debug for UserSignupDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Password stays out of debug output
        f.debug_struct("UserSignupDto")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish()
    }
}

impl std::fmt::Debug for UserSigninDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSigninDto")
            .field("username", &self.username)
            .finish()
    }
}
