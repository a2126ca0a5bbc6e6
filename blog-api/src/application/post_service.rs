use std::collections::HashMap;

use tracing::{debug, info};

use crate::application::tag_resolver::resolve_tags;
use crate::application::transaction::complete;
use crate::data::Pagination;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::data::store::BlogStore;
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, PostWithTags, UpdatePostRequest};
use crate::domain::slug::slugify;
use crate::domain::tag::Tag;

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<PostWithTags>,
    pub(crate) page: u32,
    pub(crate) per_page: u32,
    pub(crate) total: i64,
}

pub(crate) struct PostService<S: BlogStore> {
    store: S,
}

impl<S: BlogStore> PostService<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    pub(crate) async fn create_post(
        &self,
        actor_user_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostWithTags, DomainError> {
        let req = req.validate()?;

        let mut tx = self.store.begin().await?;
        let result = Self::create_in(&mut tx, actor_user_id, req).await;
        let created = complete(tx, result, "create_post").await?;

        info!(
            post_id = created.post.id,
            user_id = actor_user_id,
            tags = created.tags.len(),
            "post created"
        );
        Ok(created)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostWithTags, DomainError> {
        let mut session = self.store.session().await?;
        let post = session
            .find_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        with_tags(&mut session, post).await
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostWithTags, DomainError> {
        let req = req.validate()?;

        let mut tx = self.store.begin().await?;
        let result = Self::update_in(&mut tx, actor_user_id, post_id, req).await;
        let updated = complete(tx, result, "update_post").await?;

        info!(post_id, user_id = actor_user_id, "post updated");
        Ok(updated)
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;
        let result = Self::delete_in(&mut tx, actor_user_id, post_id).await;
        complete(tx, result, "delete_post").await?;

        info!(post_id, user_id = actor_user_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ListPostsResult, DomainError> {
        let pagination = Pagination { page, per_page };
        let mut session = self.store.session().await?;

        let posts = session.list_posts(pagination).await?;
        let total = session.total_posts().await?;

        let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        let mut tags_by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (post_id, tag) in session.tags_for_posts(&ids).await? {
            tags_by_post.entry(post_id).or_default().push(tag);
        }

        let posts = posts
            .into_iter()
            .map(|post| {
                let tags = tags_by_post.remove(&post.id).unwrap_or_default();
                PostWithTags { post, tags }
            })
            .collect();

        Ok(ListPostsResult {
            posts,
            page,
            per_page,
            total,
        })
    }

    async fn create_in(
        tx: &mut S::Tx,
        actor_user_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostWithTags, DomainError> {
        let slug = slugify(&req.title);
        let post = tx
            .create_post(NewPost {
                title: req.title,
                content: req.content,
                slug,
                user_id: actor_user_id,
            })
            .await?;

        if let Some(names) = req.tags {
            let tag_ids = resolve_tags(tx, &names).await?;
            tx.attach_tags(post.id, &tag_ids).await?;
            debug!(post_id = post.id, ?tag_ids, "tags attached");
        }

        with_tags(tx, post).await
    }

    async fn update_in(
        tx: &mut S::Tx,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostWithTags, DomainError> {
        let existing = tx
            .find_post_for_update(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if !existing.is_owned_by(actor_user_id) {
            return Err(DomainError::Forbidden);
        }

        let slug = if existing.title == req.title {
            existing.slug
        } else {
            let slug = slugify(&req.title);
            debug!(post_id, old = %existing.slug, new = %slug, "post slug recomputed");
            slug
        };

        let post = tx
            .update_post(
                post_id,
                PostPatch {
                    title: req.title,
                    content: req.content,
                    slug,
                },
            )
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if let Some(names) = req.tags {
            let tag_ids = resolve_tags(tx, &names).await?;
            tx.sync_tags(post.id, &tag_ids).await?;
            debug!(post_id = post.id, ?tag_ids, "tags synced");
        }

        with_tags(tx, post).await
    }

    async fn delete_in(
        tx: &mut S::Tx,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let existing = tx
            .find_post_for_update(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if !existing.is_owned_by(actor_user_id) {
            return Err(DomainError::Forbidden);
        }

        if !tx.delete_post(post_id).await? {
            return Err(DomainError::not_found("post", post_id));
        }
        Ok(())
    }
}

async fn with_tags<R>(repo: &mut R, post: Post) -> Result<PostWithTags, DomainError>
where
    R: PostRepository,
{
    let tags = repo
        .tags_for_posts(&[post.id])
        .await?
        .into_iter()
        .map(|(_, tag)| tag)
        .collect();
    Ok(PostWithTags { post, tags })
}
