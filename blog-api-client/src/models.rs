use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public user model.
pub struct User {
    /// User id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public tag model.
pub struct Tag {
    /// Tag id.
    pub id: i64,
    /// Trimmed display name.
    pub name: String,
    /// Slug that identifies the tag; names with equal slugs are the same tag.
    pub slug: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public post model together with its tags.
pub struct Post {
    /// Post id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Slug derived from the title.
    pub slug: String,
    /// Author's user id.
    pub user_id: i64,
    /// Tags attached to the post.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update time (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Response to a successful registration or login.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Token type, always `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One page of a listing.
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Page number, starting at 1.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: i64,
}
