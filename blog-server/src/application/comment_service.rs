use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::application::permissions::{Action, Resource, authorize_object};
use crate::data::comment_repository::CommentRepository;
use crate::data::missing_pk_message;
use crate::data::post_repository::PostRepository;
use crate::domain::caller::{Caller, Identity};
use crate::domain::comment::{Comment, CommentScope};
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    pub async fn list_comments(&self, scope: CommentScope) -> Result<Vec<Comment>, DomainError> {
        match scope {
            CommentScope::All => self.comments.list(None).await,
            CommentScope::Post(post_id) => {
                self.ensure_post(post_id).await?;
                self.comments.list(Some(post_id)).await
            }
        }
    }

    pub async fn get_comment(&self, scope: CommentScope, id: Uuid) -> Result<Comment, DomainError> {
        if let CommentScope::Post(post_id) = scope {
            self.ensure_post(post_id).await?;
        }
        self.comments
            .find_by_id(id)
            .await?
            .filter(|comment| scope.contains(comment))
            .ok_or(DomainError::CommentNotFound(id))
    }

    /// Attaches a comment by `author`. On a nested route the post comes from the
    /// path and `post` from the body, if any, has to agree with it.
    #[instrument(skip(self, author, comment_text), fields(author = %author.username))]
    pub async fn create_comment(
        &self,
        author: &Identity,
        scope: CommentScope,
        post: Option<Uuid>,
        comment_text: String,
    ) -> Result<Comment, DomainError> {
        let post_id = match (scope, post) {
            (CommentScope::Post(path_id), Some(body_id)) if body_id != path_id => {
                return Err(DomainError::field(
                    "post",
                    "Does not match the post in the URL.",
                ));
            }
            (CommentScope::Post(path_id), _) => {
                self.ensure_post(path_id).await?;
                path_id
            }
            (CommentScope::All, None) => {
                return Err(DomainError::field("post", "This field is required."));
            }
            (CommentScope::All, Some(body_id)) => {
                if self.posts.find_by_id(body_id).await?.is_none() {
                    return Err(DomainError::field("post", missing_pk_message(body_id)));
                }
                body_id
            }
        };

        let comment = Comment::new(post_id, author.id, author.username.clone(), comment_text);
        self.comments.create(comment).await
    }

    #[instrument(skip(self, caller, comment_text))]
    pub async fn update_comment(
        &self,
        caller: &Caller,
        scope: CommentScope,
        id: Uuid,
        action: Action,
        comment_text: Option<String>,
    ) -> Result<Comment, DomainError> {
        let comment = self.get_comment(scope, id).await?;
        authorize_object(Resource::Comment, action, caller, comment.author_id)?;

        match comment_text {
            Some(text) => self
                .comments
                .update_text(id, text)
                .await?
                .ok_or(DomainError::CommentNotFound(id)),
            None => Ok(comment),
        }
    }

    #[instrument(skip(self, caller))]
    pub async fn delete_comment(
        &self,
        caller: &Caller,
        scope: CommentScope,
        id: Uuid,
    ) -> Result<(), DomainError> {
        let comment = self.get_comment(scope, id).await?;
        authorize_object(Resource::Comment, Action::Destroy, caller, comment.author_id)?;

        if self.comments.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::CommentNotFound(id))
        }
    }

    async fn ensure_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        match self.posts.find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::PostNotFound(post_id)),
        }
    }
}
