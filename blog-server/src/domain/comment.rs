use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

const SUMMARY_LEN: usize = 22;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// `None` once the authoring user has been deleted.
    pub author_id: Option<Uuid>,
    pub author_username: Option<String>,
    pub comment_text: String,
    pub created_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, author_username: String, comment_text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id: Some(author_id),
            author_username: Some(author_username),
            comment_text,
            created_date: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == Some(user_id)
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comment_text.chars().count() <= SUMMARY_LEN {
            f.write_str(&self.comment_text)
        } else {
            let head: String = self.comment_text.chars().take(SUMMARY_LEN).collect();
            write!(f, "{head}...")
        }
    }
}

/// Which comments a request may see: every comment, or only those under one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentScope {
    All,
    Post(Uuid),
}

impl CommentScope {
    pub fn contains(&self, comment: &Comment) -> bool {
        match self {
            CommentScope::All => true,
            CommentScope::Post(post_id) => comment.post_id == *post_id,
        }
    }
}
