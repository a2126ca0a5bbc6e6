//! HTTP client library for blog-api.
//!
//! `BlogClient` keeps the JWT returned by `register`/`login` and sends it
//! with protected operations (post, tag and profile changes).
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BlogClientError, BlogClientResult};
pub use models::{AuthResponse, Page, Post, Tag, User};

use http_client::{HttpClient, UpdateUserRequestDto};

#[derive(Debug, Clone)]
/// Client for the blog REST API.
pub struct BlogClient {
    http: HttpClient,
    token: Option<String>,
}

impl BlogClient {
    /// Creates a client for a server base URL such as `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Sets the JWT explicitly.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Returns the current JWT, if any.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forgets the stored JWT.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Registers a user and stores the returned JWT.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let result = self.http.register(name, email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Logs in by email and stores the returned JWT.
    pub async fn login(&mut self, email: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let result = self.http.login(email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Fetches a user by id.
    pub async fn get_user(&self, id: i64) -> BlogClientResult<User> {
        self.http.get_user(id).await
    }

    /// Fetches a page of users.
    pub async fn list_users(&self, page: u32, per_page: u32) -> BlogClientResult<Page<User>> {
        self.http.list_users(page, per_page).await
    }

    /// Updates the caller's own profile. `None` fields stay unchanged.
    ///
    /// Requires a stored JWT.
    pub async fn update_user(
        &self,
        id: i64,
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> BlogClientResult<User> {
        let token = self.require_token()?;
        let payload = UpdateUserRequestDto {
            name,
            email,
            password,
        };
        self.http.update_user(token, id, &payload).await
    }

    /// Deletes the caller's own account along with its posts.
    ///
    /// Requires a stored JWT.
    pub async fn delete_user(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_user(token, id).await
    }

    /// Creates a post with tags.
    ///
    /// The server normalizes tag names; duplicates and blank names
    /// are ignored. Requires a stored JWT.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http
            .create_post(token, title, content, Some(tags))
            .await
    }

    /// Fetches a post by id.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Updates a post by id.
    ///
    /// `tags: None` keeps the current tags, `Some(&[])` removes all of them.
    /// Requires a stored JWT.
    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        tags: Option<&[String]>,
    ) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http
            .update_post(token, id, title, content, tags)
            .await
    }

    /// Deletes a post by id.
    ///
    /// Requires a stored JWT.
    pub async fn delete_post(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_post(token, id).await
    }

    /// Fetches a page of posts, newest first.
    pub async fn list_posts(&self, page: u32, per_page: u32) -> BlogClientResult<Page<Post>> {
        self.http.list_posts(page, per_page).await
    }

    /// Creates a tag. Requires a stored JWT.
    pub async fn create_tag(&self, name: &str) -> BlogClientResult<Tag> {
        let token = self.require_token()?;
        self.http.create_tag(token, name).await
    }

    /// Fetches a tag by id.
    pub async fn get_tag(&self, id: i64) -> BlogClientResult<Tag> {
        self.http.get_tag(id).await
    }

    /// Renames a tag. Requires a stored JWT.
    pub async fn update_tag(&self, id: i64, name: &str) -> BlogClientResult<Tag> {
        let token = self.require_token()?;
        self.http.update_tag(token, id, name).await
    }

    /// Deletes a tag and its post associations. Requires a stored JWT.
    pub async fn delete_tag(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_tag(token, id).await
    }

    /// Fetches a page of tags.
    pub async fn list_tags(&self, page: u32, per_page: u32) -> BlogClientResult<Page<Tag>> {
        self.http.list_tags(page, per_page).await
    }

    fn require_token(&self) -> BlogClientResult<&str> {
        self.token.as_deref().ok_or(BlogClientError::Unauthorized)
    }
}
