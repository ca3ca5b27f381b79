use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::User;

/// A user together with the ids of the comments they wrote.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub comment_ids: Vec<Uuid>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { users, comments }
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, DomainError> {
        let users = self.users.list().await?;
        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            profiles.push(self.profile(user).await?);
        }
        Ok(profiles)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserProfile, DomainError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))?;
        self.profile(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        if self.users.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::UserNotFound(id))
        }
    }

    async fn profile(&self, user: User) -> Result<UserProfile, DomainError> {
        let comment_ids = self.comments.list_ids_by_author(user.id).await?;
        Ok(UserProfile { user, comment_ids })
    }
}
