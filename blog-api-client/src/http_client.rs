use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BlogClientError, BlogClientResult};
use crate::models::{AuthResponse, Page, Post, Tag, User};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct PostRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct TagRequestDto<'a> {
    name: &'a str,
}

#[derive(Debug, Default, Serialize)]
/// Partial profile update; `None` fields are not sent.
pub(crate) struct UpdateUserRequestDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Serialize)]
struct PageQuery {
    page: u32,
    per_page: u32,
}

#[derive(Debug, Clone)]
/// HTTP transport for the `blog-api` REST API.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Builds a client for the given server base URL.
    pub(crate) fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BlogClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        BlogClientError::from_http_status(status, Some(message))
    }

    async fn execute(request: RequestBuilder) -> BlogClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// sends the request and decodes a json response
    async fn fetch<TRes: DeserializeOwned>(request: RequestBuilder) -> BlogClientResult<TRes> {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> BlogClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        Self::fetch(self.request(method, path, token).json(body)).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> BlogClientResult<Page<T>> {
        let query = PageQuery { page, per_page };
        Self::fetch(self.request(Method::GET, path, None).query(&query)).await
    }

    async fn delete(&self, token: &str, path: &str) -> BlogClientResult<()> {
        Self::execute(self.request(Method::DELETE, path, Some(token))).await?;
        Ok(())
    }

    pub(crate) async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            name,
            email,
            password,
        };
        self.send_json(Method::POST, "/api/auth/register", &payload, None)
            .await
    }

    pub(crate) async fn login(&self, email: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let payload = LoginRequestDto { email, password };
        self.send_json(Method::POST, "/api/auth/login", &payload, None)
            .await
    }

    pub(crate) async fn get_user(&self, id: i64) -> BlogClientResult<User> {
        Self::fetch(self.request(Method::GET, &format!("/api/users/{id}"), None)).await
    }

    pub(crate) async fn list_users(&self, page: u32, per_page: u32) -> BlogClientResult<Page<User>> {
        self.get_page("/api/users", page, per_page).await
    }

    pub(crate) async fn update_user(
        &self,
        token: &str,
        id: i64,
        payload: &UpdateUserRequestDto<'_>,
    ) -> BlogClientResult<User> {
        self.send_json(Method::PUT, &format!("/api/users/{id}"), payload, Some(token))
            .await
    }

    pub(crate) async fn delete_user(&self, token: &str, id: i64) -> BlogClientResult<()> {
        self.delete(token, &format!("/api/users/{id}")).await
    }

    /// Creates a post on behalf of the token's user.
    ///
    /// `tags: None` creates the post without tags.
    pub(crate) async fn create_post(
        &self,
        token: &str,
        title: &str,
        content: &str,
        tags: Option<&[String]>,
    ) -> BlogClientResult<Post> {
        let payload = PostRequestDto {
            title,
            content,
            tags,
        };
        self.send_json(Method::POST, "/api/posts", &payload, Some(token))
            .await
    }

    pub(crate) async fn get_post(&self, id: i64) -> BlogClientResult<Post> {
        Self::fetch(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await
    }

    /// Updates a post.
    ///
    /// `tags: None` keeps the current tags, `Some(&[])` removes all of them.
    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: i64,
        title: &str,
        content: &str,
        tags: Option<&[String]>,
    ) -> BlogClientResult<Post> {
        let payload = PostRequestDto {
            title,
            content,
            tags,
        };
        self.send_json(
            Method::PUT,
            &format!("/api/posts/{id}"),
            &payload,
            Some(token),
        )
        .await
    }

    pub(crate) async fn delete_post(&self, token: &str, id: i64) -> BlogClientResult<()> {
        self.delete(token, &format!("/api/posts/{id}")).await
    }

    pub(crate) async fn list_posts(&self, page: u32, per_page: u32) -> BlogClientResult<Page<Post>> {
        self.get_page("/api/posts", page, per_page).await
    }

    pub(crate) async fn create_tag(&self, token: &str, name: &str) -> BlogClientResult<Tag> {
        let payload = TagRequestDto { name };
        self.send_json(Method::POST, "/api/tags", &payload, Some(token))
            .await
    }

    pub(crate) async fn get_tag(&self, id: i64) -> BlogClientResult<Tag> {
        Self::fetch(self.request(Method::GET, &format!("/api/tags/{id}"), None)).await
    }

    pub(crate) async fn update_tag(&self, token: &str, id: i64, name: &str) -> BlogClientResult<Tag> {
        let payload = TagRequestDto { name };
        self.send_json(Method::PUT, &format!("/api/tags/{id}"), &payload, Some(token))
            .await
    }

    pub(crate) async fn delete_tag(&self, token: &str, id: i64) -> BlogClientResult<()> {
        self.delete(token, &format!("/api/tags/{id}")).await
    }

    pub(crate) async fn list_tags(&self, page: u32, per_page: u32) -> BlogClientResult<Page<Tag>> {
        self.get_page("/api/tags", page, per_page).await
    }
}
