use std::sync::Arc;

use crate::data::missing_pk_message;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::caller::Identity;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { repo, users }
    }

    /// An `author` named in a request body must exist, even though the stored
    /// author is always the caller.
    pub async fn check_author_reference(&self, claimed: Option<Uuid>) -> Result<(), DomainError> {
        let Some(user_id) = claimed else {
            return Ok(());
        };
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::field("author", missing_pk_message(user_id))),
        }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_posts(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Post>, DomainError> {
        let limit = limit.map(i64::from);
        let offset = offset.map_or(0, i64::from);
        self.repo.list(limit, offset).await
    }

    /// The author is always the caller, whatever the request body claimed.
    #[instrument(skip(self, author, content), fields(author = %author.username))]
    pub async fn create_post(
        &self,
        author: &Identity,
        title: String,
        content: String,
    ) -> Result<Post, DomainError> {
        let post = Post::new(author.id, title, content);
        self.repo.create(post).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        if changes.is_empty() {
            return self.get_post(post_id).await;
        }
        self.repo
            .update(post_id, changes)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(post_id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }
}
