use async_trait::async_trait;

use crate::data::Pagination;
use crate::domain::error::DomainError;
use crate::domain::tag::Tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewTag {
    pub(crate) name: String,
    pub(crate) slug: String,
}

#[async_trait]
pub(crate) trait TagRepository: Send {
    async fn find_tag(&mut self, id: i64) -> Result<Option<Tag>, DomainError>;
    async fn find_tag_by_slug(&mut self, slug: &str) -> Result<Option<Tag>, DomainError>;
    /// Returns `None` when a tag with the same slug already exists.
    async fn insert_tag_if_absent(&mut self, input: NewTag) -> Result<Option<Tag>, DomainError>;
    /// Fails with `Conflict` when the slug is taken.
    async fn create_tag(&mut self, input: NewTag) -> Result<Tag, DomainError>;
    async fn update_tag(&mut self, id: i64, input: NewTag) -> Result<Option<Tag>, DomainError>;
    async fn delete_tag(&mut self, id: i64) -> Result<bool, DomainError>;
    async fn list_tags(&mut self, pagination: Pagination) -> Result<Vec<Tag>, DomainError>;
    async fn total_tags(&mut self) -> Result<i64, DomainError>;
}
