use async_trait::async_trait;

use crate::data::Pagination;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::tag::Tag;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) slug: String,
    pub(crate) user_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) slug: String,
}

/// Post persistence bound to one connection or transaction.
#[async_trait]
pub(crate) trait PostRepository: Send {
    async fn create_post(&mut self, input: NewPost) -> Result<Post, DomainError>;
    async fn find_post(&mut self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Same as `find_post`, but keeps the row locked until the transaction ends.
    async fn find_post_for_update(&mut self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update_post(&mut self, id: i64, patch: PostPatch)
    -> Result<Option<Post>, DomainError>;
    async fn delete_post(&mut self, id: i64) -> Result<bool, DomainError>;
    async fn list_posts(&mut self, pagination: Pagination) -> Result<Vec<Post>, DomainError>;
    async fn total_posts(&mut self) -> Result<i64, DomainError>;

    /// Additive insert of associations; the post must not already hold any of `tag_ids`.
    async fn attach_tags(&mut self, post_id: i64, tag_ids: &[i64]) -> Result<(), DomainError>;
    /// Makes the post's association set equal to `tag_ids`.
    async fn sync_tags(&mut self, post_id: i64, tag_ids: &[i64]) -> Result<(), DomainError>;
    /// `(post_id, tag)` pairs for every association of the given posts.
    async fn tags_for_posts(&mut self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DomainError>;
}
