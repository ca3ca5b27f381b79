use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::application::user_service::UserProfile;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::PostChanges;
use crate::domain::user::NewUser;

// ======================= AUTH =======================

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(required(message = "This field is required."))]
    pub username: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String, // "Token"
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 150, message = "Username must be 1 to 150 characters.")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 8, message = "Password must be at least 8 characters.")
    )]
    pub password: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    /// Checks the payload and splits it into profile and password.
    pub fn into_new_user(self) -> Result<(NewUser, String), DomainError> {
        self.validate()?;
        let profile = NewUser {
            username: self.username.unwrap_or_default().trim().to_string(),
            email: self.email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            is_admin: false,
        };
        if profile.username.is_empty() {
            return Err(DomainError::field("username", "This field may not be blank."));
        }
        Ok((profile, self.password.unwrap_or_default()))
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub comments: Vec<Uuid>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.user.id,
            username: profile.user.username,
            first_name: profile.user.first_name,
            last_name: profile.user.last_name,
            comments: profile.comment_ids,
        }
    }
}

// ======================= POSTS =======================

/// Body of `POST` and `PUT`: every writable field is required.
#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 255, message = "Title must be 1 to 255 characters.")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub content: Option<String>,
    /// Checked for existence only; the author is always the caller.
    pub author: Option<String>,
}

impl PostRequest {
    /// Returns title, content and the claimed author, if any.
    pub fn into_fields(self) -> Result<(String, String, Option<Uuid>), DomainError> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let author = check_reference(&mut errors, "author", self.author.as_deref());
        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok((
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
            author,
        ))
    }
}

/// Body of `PATCH`: only the supplied fields change.
#[derive(Debug, Deserialize, Validate)]
pub struct PostPatchRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters."))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub content: Option<String>,
}

impl PostPatchRequest {
    pub fn into_changes(self) -> Result<PostChanges, DomainError> {
        self.validate()?;
        Ok(PostChanges {
            title: self.title,
            content: self.content,
        })
    }
}

/// Values that do not fit a `u32` are rejected by the query extractor.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ======================= COMMENTS =======================

/// Body of `POST` and `PUT`. `post` is immutable once the comment exists.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    pub post: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub comment_text: Option<String>,
}

impl CommentRequest {
    pub fn into_fields(self) -> Result<(Option<Uuid>, String), DomainError> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let post = check_reference(&mut errors, "post", self.post.as_deref());
        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok((post, self.comment_text.unwrap_or_default()))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentPatchRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub comment_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post: Uuid,
    /// Author's username, read-only.
    pub author: Option<String>,
    pub comment_text: String,
    pub created_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post: comment.post_id,
            author: comment.author_username,
            comment_text: comment.comment_text,
            created_date: comment.created_date,
        }
    }
}

/// Route parameters shared by the nested and the flat comment routes.
#[derive(Debug, Deserialize)]
pub struct CommentsPath {
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub post_id: Option<Uuid>,
    pub id: Uuid,
}

// ======================= Utils =======================

/// Parses an optional id field, recording a field error when it is malformed.
fn check_reference(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&str>,
) -> Option<Uuid> {
    let raw = raw?;
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            let mut error = ValidationError::new("invalid_pk");
            error.message = Some(format!("Invalid pk \"{raw}\" - malformed id.").into());
            errors.add(field, error);
            None
        }
    }
}
