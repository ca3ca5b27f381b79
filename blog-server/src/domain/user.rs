use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile fields supplied when an account is created.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl User {
    pub fn new(profile: NewUser, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: profile.username,
            email: profile.email.to_lowercase(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            password_hash,
            is_admin: profile.is_admin,
            created_at: Utc::now(),
        }
    }
}
