pub mod auth_service;
pub mod comment_service;
pub mod permissions;
pub mod post_service;
pub mod user_service;

use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::security::JwtKeys;
use auth_service::AuthService;
use comment_service::CommentService;
use post_service::PostService;
use user_service::UserService;

/// Everything the HTTP layer needs, wired over one set of repositories.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
}

impl AppServices {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        keys: JwtKeys,
    ) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&users), keys),
            posts: PostService::new(Arc::clone(&posts), Arc::clone(&users)),
            users: UserService::new(users, Arc::clone(&comments)),
            comments: CommentService::new(comments, posts),
        }
    }
}
