//! Shared fixtures: an in-memory store with the same referential rules as the
//! PostgreSQL schema, and helpers for driving the full application.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{Error, test};
use async_trait::async_trait;
use blog_server::data::comment_repository::CommentRepository;
use blog_server::data::post_repository::PostRepository;
use blog_server::data::user_repository::UserRepository;
use blog_server::domain::comment::Comment;
use blog_server::domain::error::DomainError;
use blog_server::domain::post::{Post, PostChanges};
use blog_server::domain::user::{NewUser, User};
use blog_server::infrastructure::config::AppConfig;
use blog_server::infrastructure::security::JwtKeys;
use blog_server::{AppServices, build_app};
use serde_json::Value;
use uuid::Uuid;

pub const PASSWORD: &str = "testpassword";

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// Mirrors the foreign keys: deleting a user cascades to their posts, deleting
/// a post cascades to its comments, and comments outlive their author.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn post_count(&self) -> usize {
        self.tables.lock().unwrap().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.lock().unwrap().comments.len()
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.tables.lock().unwrap().posts.get(&id).cloned()
    }

    pub fn comment(&self, id: Uuid) -> Option<Comment> {
        let tables = self.tables.lock().unwrap();
        tables
            .comments
            .get(&id)
            .cloned()
            .map(|c| Self::with_author(&tables, c))
    }

    fn with_author(tables: &Tables, mut comment: Comment) -> Comment {
        comment.author_username = comment
            .author_id
            .and_then(|id| tables.users.get(&id))
            .map(|u| u.username.clone());
        comment
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.tables.lock().unwrap().users.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.tables.lock().unwrap().users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.posts.retain(|_, post| post.author_id != id);
        let Tables { posts, comments, .. } = &mut *tables;
        comments.retain(|_, comment| posts.contains_key(&comment.post_id));
        for comment in comments.values_mut() {
            if comment.author_id == Some(id) {
                comment.author_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.contains_key(&post.author_id) {
            return Err(DomainError::Internal("posts_author_id_fkey".into()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.tables.lock().unwrap().posts.get(&id).cloned())
    }

    async fn list(&self, limit: Option<i64>, offset: i64) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self.tables.lock().unwrap().posts.values().cloned().collect();
        posts.sort_by(|a, b| b.published_date.cmp(&a.published_date).then(a.id.cmp(&b.id)));
        let posts = posts.into_iter().skip(offset as usize);
        Ok(match limit {
            Some(limit) => posts.take(limit as usize).collect(),
            None => posts.collect(),
        })
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.posts.get_mut(&id).map(|post| {
            if let Some(title) = changes.title {
                post.title = title;
            }
            if let Some(content) = changes.content {
                post.content = content;
            }
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, comment| comment.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(DomainError::field("post", "object does not exist"));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(Self::with_author(&tables, comment))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .get(&id)
            .cloned()
            .map(|c| Self::with_author(&tables, c)))
    }

    async fn list(&self, post_id: Option<Uuid>) -> Result<Vec<Comment>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| post_id.is_none_or(|id| c.post_id == id))
            .cloned()
            .map(|c| Self::with_author(&tables, c))
            .collect();
        comments.sort_by(|a, b| a.created_date.cmp(&b.created_date).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn list_ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .values()
            .filter(|c| c.author_id == Some(author_id))
            .map(|c| c.id)
            .collect())
    }

    async fn update_text(
        &self,
        id: Uuid,
        comment_text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(comment) = tables.comments.get_mut(&id) else {
            return Ok(None);
        };
        comment.comment_text = comment_text;
        let comment = comment.clone();
        Ok(Some(Self::with_author(&tables, comment)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.tables.lock().unwrap().comments.remove(&id).is_some())
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub services: AppServices,
    pub config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: String::new(),
            database_max_connections: 1,
            jwt_secret: "test-secret".into(),
            token_ttl_hours: 1,
            cors_origins: Vec::new(),
            bootstrap_admin: None,
        };
        let services = AppServices::new(
            store.clone(),
            store.clone(),
            store.clone(),
            JwtKeys::new(config.jwt_secret.clone(), config.token_ttl_hours),
        );
        Self {
            store,
            services,
            config,
        }
    }

    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = Error>
    {
        test::init_service(build_app(self.services.clone(), self.config.clone())).await
    }

    pub async fn user(&self, username: &str, is_admin: bool) -> User {
        let profile = NewUser {
            username: username.into(),
            email: format!("{username}@example.com"),
            is_admin,
            ..NewUser::default()
        };
        self.services.auth.register(profile, PASSWORD).await.unwrap()
    }

    pub fn token(&self, user: &User) -> String {
        self.services.auth.keys().generate_token(user.id).unwrap()
    }

    pub fn auth_header(&self, user: &User) -> (&'static str, String) {
        ("Authorization", format!("Token {}", self.token(user)))
    }

    pub async fn post(&self, author: &User, title: &str) -> Post {
        let post = Post::new(author.id, title.into(), "This is a test post.".into());
        PostRepository::create(self.store.as_ref(), post).await.unwrap()
    }

    pub async fn comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        let comment = Comment::new(post.id, author.id, author.username.clone(), text.into());
        CommentRepository::create(self.store.as_ref(), comment)
            .await
            .unwrap()
    }
}

pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}
