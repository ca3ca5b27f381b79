use crate::error::BlogClientError;
use crate::{Comment, Post, TokenResponse, User};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct BlogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BlogClient {
    pub fn new(endpoint: &str) -> Result<Self, BlogClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, BlogClientError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(req);
        };
        let value = HeaderValue::from_str(&format!("Token {token}"))
            .map_err(|_| BlogClientError::Unauthorized("malformed token".into()))?;
        Ok(req.header(AUTHORIZATION, value))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, BlogClientError> {
        self.execute(self.authorized(req)?).await
    }

    /// Sends without the saved token; a stale one would be rejected outright.
    async fn execute(&self, req: RequestBuilder) -> Result<Response, BlogClientError> {
        let resp = req.send().await?;
        debug!(status = resp.status().as_u16(), url = %resp.url(), "response received");
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, BlogClientError> {
        Ok(self.send(req).await?.json().await?)
    }

    // ======================= AUTH =======================

    /// Exchanges credentials for a token and keeps it for later calls.
    pub async fn obtain_token(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, BlogClientError> {
        let req = self
            .client
            .post(self.url("/token/"))
            .json(&json!({ "username": username, "password": password }));
        let auth: TokenResponse = self.execute(req).await?.json().await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<User, BlogClientError> {
        let req = self.client.post(self.url("/users/")).json(&json!({
            "username": username,
            "password": password,
            "email": email,
        }));
        Ok(self.execute(req).await?.json().await?)
    }

    // ======================= POSTS =======================

    pub async fn list_posts(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Post>, BlogClientError> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }
        let req = self.client.get(self.url("/posts/")).query(&query);
        self.send_json(req).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogClientError> {
        let req = self.client.get(self.url(&format!("/posts/{id}/")));
        self.send_json(req).await
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<Post, BlogClientError> {
        let req = self
            .client
            .post(self.url("/posts/"))
            .json(&json!({ "title": title, "content": content }));
        self.send_json(req).await
    }

    /// Changes only the fields given.
    pub async fn update_post(
        &self,
        id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Post, BlogClientError> {
        let mut body = serde_json::Map::new();
        if let Some(title) = title {
            body.insert("title".into(), title.into());
        }
        if let Some(content) = content {
            body.insert("content".into(), content.into());
        }
        let req = self
            .client
            .patch(self.url(&format!("/posts/{id}/")))
            .json(&body);
        self.send_json(req).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), BlogClientError> {
        let req = self.client.delete(self.url(&format!("/posts/{id}/")));
        self.send(req).await?;
        Ok(())
    }

    // ======================= COMMENTS =======================

    /// Comments of one post, or every comment when `post` is `None`.
    pub async fn list_comments(&self, post: Option<Uuid>) -> Result<Vec<Comment>, BlogClientError> {
        let path = match post {
            Some(post) => format!("/posts/{post}/comments/"),
            None => "/comments/".to_string(),
        };
        self.send_json(self.client.get(self.url(&path))).await
    }

    pub async fn create_comment(&self, post: Uuid, text: &str) -> Result<Comment, BlogClientError> {
        let req = self
            .client
            .post(self.url(&format!("/posts/{post}/comments/")))
            .json(&json!({ "comment_text": text }));
        self.send_json(req).await
    }

    pub async fn update_comment(&self, id: Uuid, text: &str) -> Result<Comment, BlogClientError> {
        let req = self
            .client
            .patch(self.url(&format!("/comments/{id}/")))
            .json(&json!({ "comment_text": text }));
        self.send_json(req).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), BlogClientError> {
        let req = self.client.delete(self.url(&format!("/comments/{id}/")));
        self.send(req).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn post_json(id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "author": Uuid::new_v4(),
            "title": "Hello",
            "content": "World",
            "published_date": "2025-01-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn obtain_token_keeps_the_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/token/")
            .match_body(Matcher::Json(json!({ "username": "reader", "password": "secret" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "token": "abc", "token_type": "Token", "expires_in": 3600 }).to_string())
            .expect(1)
            .create_async()
            .await;

        let mut client = BlogClient::new(&server.url()).unwrap();
        let auth = client.obtain_token("reader", "secret").await.unwrap();

        mock.assert_async().await;
        assert_eq!(auth.expires_in, 3600);
        assert_eq!(client.token(), Some("abc"));
    }

    #[tokio::test]
    async fn login_and_register_ignore_a_stale_token() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/api/token/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "token": "fresh", "token_type": "Token", "expires_in": 3600 }).to_string())
            .expect(1)
            .create_async()
            .await;
        let register_mock = server
            .mock("POST", "/api/users/")
            .match_header("authorization", Matcher::Missing)
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": Uuid::new_v4(),
                    "username": "reader",
                    "first_name": "",
                    "last_name": "",
                    "comments": []
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let mut client = BlogClient::new(&server.url())
            .unwrap()
            .with_token(Some("stale".into()));
        let user = client.register("reader", "longenough", None).await.unwrap();
        client.obtain_token("reader", "longenough").await.unwrap();

        token_mock.assert_async().await;
        register_mock.assert_async().await;
        assert_eq!(user.username, "reader");
        assert_eq!(client.token(), Some("fresh"));
    }

    #[tokio::test]
    async fn writes_send_the_token_header() {
        let mut server = Server::new_async().await;
        let id = Uuid::new_v4();
        let mock = server
            .mock("POST", "/api/posts/")
            .match_header("authorization", "Token abc")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(post_json(id).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = BlogClient::new(&server.url())
            .unwrap()
            .with_token(Some("abc".into()));
        let post = client.create_post("Hello", "World").await.unwrap();

        mock.assert_async().await;
        assert_eq!(post.id, id);
        assert_eq!(post.title, "Hello");
    }

    #[tokio::test]
    async fn list_posts_passes_pagination() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/posts/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "5".into()),
                Matcher::UrlEncoded("offset".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([post_json(Uuid::new_v4())]).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = BlogClient::new(&server.url()).unwrap();
        let posts = client.list_posts(Some(5), Some(10)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn error_statuses_map_to_variants() {
        let mut server = Server::new_async().await;
        let id = Uuid::new_v4();
        let _missing = server
            .mock("GET", format!("/api/posts/{id}/").as_str())
            .with_status(404)
            .with_body(json!({ "error": "post not found" }).to_string())
            .create_async()
            .await;
        let _forbidden = server
            .mock("DELETE", format!("/api/posts/{id}/").as_str())
            .with_status(403)
            .with_body(json!({ "error": "forbidden: admin only" }).to_string())
            .create_async()
            .await;
        let _invalid = server
            .mock("POST", "/api/posts/")
            .with_status(400)
            .with_body(
                json!({
                    "error": "validation failed",
                    "details": { "title": ["This field is required."] }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = BlogClient::new(&server.url()).unwrap();

        assert!(matches!(client.get_post(id).await, Err(BlogClientError::NotFound)));
        assert!(matches!(
            client.delete_post(id).await,
            Err(BlogClientError::Forbidden(msg)) if msg.contains("admin only")
        ));
        match client.create_post("", "x").await {
            Err(BlogClientError::InvalidRequest(msg)) => assert!(msg.contains("title")),
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn comments_use_the_nested_route() {
        let mut server = Server::new_async().await;
        let post = Uuid::new_v4();
        let mock = server
            .mock("POST", format!("/api/posts/{post}/comments/").as_str())
            .match_body(Matcher::Json(json!({ "comment_text": "Nice" })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": Uuid::new_v4(),
                    "post": post,
                    "author": "reader",
                    "comment_text": "Nice",
                    "created_date": "2025-01-01T12:00:00Z"
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = BlogClient::new(&server.url())
            .unwrap()
            .with_token(Some("abc".into()));
        let comment = client.create_comment(post, "Nice").await.unwrap();

        mock.assert_async().await;
        assert_eq!(comment.post, post);
        assert_eq!(comment.author.as_deref(), Some("reader"));
    }
}
