//! In-memory `BlogStore` for service tests.
//!
//! Every transaction works on a private copy of the committed state and
//! publishes it on `commit`, so an aborted transaction leaves nothing behind.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::Pagination;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::data::store::{BlogStore, UnitOfWork};
use crate::data::tag_repository::{NewTag, TagRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::slug::slugify;
use crate::domain::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailPoint {
    CreatePost,
    AttachTags,
    SyncTags,
    InsertTag,
    DeletePost,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    pub(crate) posts: BTreeMap<i64, Post>,
    pub(crate) tags: BTreeMap<i64, Tag>,
    pub(crate) post_tags: BTreeSet<(i64, i64)>,
    next_post_id: i64,
    next_tag_id: i64,
}

impl MemoryState {
    pub(crate) fn tag_slugs_of(&self, post_id: i64) -> Vec<String> {
        let mut slugs: Vec<String> = self
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, tag_id)| self.tags.get(tag_id))
            .map(|tag| tag.slug.clone())
            .collect();
        slugs.sort();
        slugs
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_point: Arc<Mutex<Option<FailPoint>>>,
    commits: Arc<Mutex<usize>>,
    rollbacks: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_on(&self, point: FailPoint) {
        *self.fail_point.lock().expect("fail_point mutex poisoned") = Some(point);
    }

    pub(crate) fn snapshot(&self) -> MemoryState {
        self.state.lock().expect("state mutex poisoned").clone()
    }

    pub(crate) fn commits(&self) -> usize {
        *self.commits.lock().expect("commits mutex poisoned")
    }

    pub(crate) fn rollbacks(&self) -> usize {
        *self.rollbacks.lock().expect("rollbacks mutex poisoned")
    }

    /// Inserts a committed post directly, bypassing services.
    pub(crate) fn seed_post(&self, user_id: i64, title: &str, tag_names: &[&str]) -> Post {
        let mut state = self.state.lock().expect("state mutex poisoned");
        let post = insert_post(
            &mut state,
            NewPost {
                title: title.to_string(),
                content: "seeded content".to_string(),
                slug: slugify(title),
                user_id,
            },
        )
        .expect("seed post must be valid");

        for name in tag_names {
            let tag = match find_by_slug(&state, &slugify(name)) {
                Some(tag) => tag,
                None => insert_tag(
                    &mut state,
                    NewTag {
                        name: name.to_string(),
                        slug: slugify(name),
                    },
                )
                .expect("seed tag must be valid"),
            };
            state.post_tags.insert((post.id, tag.id));
        }
        post
    }

    fn open(&self) -> MemoryTx {
        MemoryTx {
            working: self.snapshot(),
            fail_point: *self.fail_point.lock().expect("fail_point mutex poisoned"),
            store: self.clone(),
        }
    }
}

pub(crate) struct MemoryTx {
    working: MemoryState,
    fail_point: Option<FailPoint>,
    store: MemoryStore,
}

impl MemoryTx {
    fn check(&self, point: FailPoint) -> Result<(), DomainError> {
        if self.fail_point == Some(point) {
            return Err(DomainError::Unexpected(format!(
                "injected failure at {point:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    type Session = MemoryTx;
    type Tx = MemoryTx;

    async fn session(&self) -> Result<Self::Session, DomainError> {
        Ok(self.open())
    }

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        Ok(self.open())
    }
}

#[async_trait]
impl UnitOfWork for MemoryTx {
    async fn commit(self) -> Result<(), DomainError> {
        *self.store.state.lock().expect("state mutex poisoned") = self.working;
        *self.store.commits.lock().expect("commits mutex poisoned") += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), DomainError> {
        *self.store.rollbacks.lock().expect("rollbacks mutex poisoned") += 1;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryTx {
    async fn create_post(&mut self, input: NewPost) -> Result<Post, DomainError> {
        self.check(FailPoint::CreatePost)?;
        insert_post(&mut self.working, input)
    }

    async fn find_post(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.working.posts.get(&id).cloned())
    }

    async fn find_post_for_update(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.working.posts.get(&id).cloned())
    }

    async fn update_post(
        &mut self,
        id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        if self
            .working
            .posts
            .values()
            .any(|post| post.id != id && post.slug == patch.slug)
        {
            return Err(DomainError::Conflict("post slug".to_string()));
        }

        let Some(post) = self.working.posts.get_mut(&id) else {
            return Ok(None);
        };
        post.title = patch.title;
        post.content = patch.content;
        post.slug = patch.slug;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&mut self, id: i64) -> Result<bool, DomainError> {
        self.check(FailPoint::DeletePost)?;
        let removed = self.working.posts.remove(&id).is_some();
        self.working.post_tags.retain(|(post_id, _)| *post_id != id);
        Ok(removed)
    }

    async fn list_posts(&mut self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self.working.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }

    async fn total_posts(&mut self) -> Result<i64, DomainError> {
        Ok(self.working.posts.len() as i64)
    }

    async fn attach_tags(&mut self, post_id: i64, tag_ids: &[i64]) -> Result<(), DomainError> {
        self.check(FailPoint::AttachTags)?;
        for tag_id in tag_ids {
            if !self.working.tags.contains_key(tag_id) {
                return Err(DomainError::NotFound("tag".to_string()));
            }
            if !self.working.post_tags.insert((post_id, *tag_id)) {
                return Err(DomainError::Conflict("post tag".to_string()));
            }
        }
        Ok(())
    }

    async fn sync_tags(&mut self, post_id: i64, tag_ids: &[i64]) -> Result<(), DomainError> {
        self.check(FailPoint::SyncTags)?;
        self.working
            .post_tags
            .retain(|(p, t)| *p != post_id || tag_ids.contains(t));
        for tag_id in tag_ids {
            self.working.post_tags.insert((post_id, *tag_id));
        }
        Ok(())
    }

    async fn tags_for_posts(&mut self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DomainError> {
        let mut pairs: Vec<(i64, Tag)> = self
            .working
            .post_tags
            .iter()
            .filter(|(post_id, _)| post_ids.contains(post_id))
            .filter_map(|(post_id, tag_id)| {
                self.working
                    .tags
                    .get(tag_id)
                    .map(|tag| (*post_id, tag.clone()))
            })
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.slug.cmp(&b.1.slug)));
        Ok(pairs)
    }
}

#[async_trait]
impl TagRepository for MemoryTx {
    async fn find_tag(&mut self, id: i64) -> Result<Option<Tag>, DomainError> {
        Ok(self.working.tags.get(&id).cloned())
    }

    async fn find_tag_by_slug(&mut self, slug: &str) -> Result<Option<Tag>, DomainError> {
        Ok(find_by_slug(&self.working, slug))
    }

    async fn insert_tag_if_absent(&mut self, input: NewTag) -> Result<Option<Tag>, DomainError> {
        self.check(FailPoint::InsertTag)?;
        if find_by_slug(&self.working, &input.slug).is_some() {
            return Ok(None);
        }
        insert_tag(&mut self.working, input).map(Some)
    }

    async fn create_tag(&mut self, input: NewTag) -> Result<Tag, DomainError> {
        self.check(FailPoint::InsertTag)?;
        if find_by_slug(&self.working, &input.slug).is_some() {
            return Err(DomainError::Conflict("tag slug".to_string()));
        }
        insert_tag(&mut self.working, input)
    }

    async fn update_tag(&mut self, id: i64, input: NewTag) -> Result<Option<Tag>, DomainError> {
        if find_by_slug(&self.working, &input.slug).is_some_and(|tag| tag.id != id) {
            return Err(DomainError::Conflict("tag slug".to_string()));
        }
        let Some(tag) = self.working.tags.get_mut(&id) else {
            return Ok(None);
        };
        tag.name = input.name;
        tag.slug = input.slug;
        tag.updated_at = Utc::now();
        Ok(Some(tag.clone()))
    }

    async fn delete_tag(&mut self, id: i64) -> Result<bool, DomainError> {
        let removed = self.working.tags.remove(&id).is_some();
        self.working.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(removed)
    }

    async fn list_tags(&mut self, pagination: Pagination) -> Result<Vec<Tag>, DomainError> {
        Ok(self
            .working
            .tags
            .values()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .cloned()
            .collect())
    }

    async fn total_tags(&mut self) -> Result<i64, DomainError> {
        Ok(self.working.tags.len() as i64)
    }
}

fn insert_post(state: &mut MemoryState, input: NewPost) -> Result<Post, DomainError> {
    if state.posts.values().any(|post| post.slug == input.slug) {
        return Err(DomainError::Conflict("post slug".to_string()));
    }
    state.next_post_id += 1;
    let now = Utc::now();
    let post = Post::new(
        state.next_post_id,
        input.title,
        input.content,
        input.slug,
        input.user_id,
        now,
        now,
    )?;
    state.posts.insert(post.id, post.clone());
    Ok(post)
}

fn insert_tag(state: &mut MemoryState, input: NewTag) -> Result<Tag, DomainError> {
    state.next_tag_id += 1;
    let now = Utc::now();
    let tag = Tag::new(state.next_tag_id, input.name, input.slug, now, now)?;
    state.tags.insert(tag.id, tag.clone());
    Ok(tag)
}

fn find_by_slug(state: &MemoryState, slug: &str) -> Option<Tag> {
    state.tags.values().find(|tag| tag.slug == slug).cloned()
}
