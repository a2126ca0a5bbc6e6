use tracing::info;

use crate::application::transaction::complete;
use crate::data::Pagination;
use crate::data::store::BlogStore;
use crate::data::tag_repository::{NewTag, TagRepository};
use crate::domain::error::DomainError;
use crate::domain::tag::{Tag, TagRequest};

#[derive(Debug, Clone)]
pub(crate) struct ListTagsResult {
    pub(crate) tags: Vec<Tag>,
    pub(crate) page: u32,
    pub(crate) per_page: u32,
    pub(crate) total: i64,
}

pub(crate) struct TagService<S: BlogStore> {
    store: S,
}

impl<S: BlogStore> TagService<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    pub(crate) async fn list_tags(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ListTagsResult, DomainError> {
        let mut session = self.store.session().await?;
        let tags = session.list_tags(Pagination { page, per_page }).await?;
        let total = session.total_tags().await?;

        Ok(ListTagsResult {
            tags,
            page,
            per_page,
            total,
        })
    }

    pub(crate) async fn get_tag(&self, id: i64) -> Result<Tag, DomainError> {
        let mut session = self.store.session().await?;
        session
            .find_tag(id)
            .await?
            .ok_or_else(|| DomainError::not_found("tag", id))
    }

    pub(crate) async fn create_tag(
        &self,
        actor_user_id: i64,
        req: TagRequest,
    ) -> Result<Tag, DomainError> {
        let name = req.validate()?;

        let mut tx = self.store.begin().await?;
        let result = tx
            .create_tag(NewTag {
                name: name.name,
                slug: name.slug,
            })
            .await;
        let tag = complete(tx, result, "create_tag").await?;

        info!(tag_id = tag.id, slug = %tag.slug, user_id = actor_user_id, "tag created");
        Ok(tag)
    }

    pub(crate) async fn update_tag(
        &self,
        actor_user_id: i64,
        id: i64,
        req: TagRequest,
    ) -> Result<Tag, DomainError> {
        let name = req.validate()?;

        let mut tx = self.store.begin().await?;
        let result = tx
            .update_tag(
                id,
                NewTag {
                    name: name.name,
                    slug: name.slug,
                },
            )
            .await
            .and_then(|tag| tag.ok_or_else(|| DomainError::not_found("tag", id)));
        let tag = complete(tx, result, "update_tag").await?;

        info!(tag_id = tag.id, slug = %tag.slug, user_id = actor_user_id, "tag updated");
        Ok(tag)
    }

    pub(crate) async fn delete_tag(&self, actor_user_id: i64, id: i64) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;
        let result = match tx.delete_tag(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::not_found("tag", id)),
            Err(err) => Err(err),
        };
        complete(tx, result, "delete_tag").await?;

        info!(tag_id = id, user_id = actor_user_id, "tag deleted");
        Ok(())
    }
}
