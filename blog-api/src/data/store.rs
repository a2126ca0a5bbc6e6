use async_trait::async_trait;

use crate::data::post_repository::PostRepository;
use crate::data::tag_repository::TagRepository;
use crate::domain::error::DomainError;

/// A transaction over posts and tags. Dropping it without `commit` discards
/// every write made through it.
#[async_trait]
pub(crate) trait UnitOfWork: PostRepository + TagRepository + Sized {
    async fn commit(self) -> Result<(), DomainError>;
    async fn rollback(self) -> Result<(), DomainError>;
}

#[async_trait]
pub(crate) trait BlogStore: Send + Sync {
    type Session: PostRepository + TagRepository;
    type Tx: UnitOfWork;

    /// Plain connection for reads.
    async fn session(&self) -> Result<Self::Session, DomainError>;
    async fn begin(&self) -> Result<Self::Tx, DomainError>;
}
