use std::collections::BTreeMap;

use tracing::debug;

use crate::data::tag_repository::{NewTag, TagRepository};
use crate::domain::error::DomainError;
use crate::domain::tag::{Tag, TagName};

/// Turns free-form tag names into ids, creating missing tags.
///
/// Blank names are skipped. Names that normalize to the same slug resolve to
/// one tag. Slugs are processed in sorted order so concurrent writers lock
/// tag rows in the same sequence.
pub(crate) async fn resolve_tags<R>(
    repo: &mut R,
    names: &[String],
) -> Result<Vec<i64>, DomainError>
where
    R: TagRepository,
{
    let mut by_slug: BTreeMap<String, String> = BTreeMap::new();
    for raw in names {
        if raw.trim().is_empty() {
            continue;
        }
        let parsed = TagName::parse(raw, "tags")?;
        by_slug.entry(parsed.slug).or_insert(parsed.name);
    }

    let mut ids = Vec::with_capacity(by_slug.len());
    for (slug, name) in by_slug {
        let tag = find_or_create(repo, NewTag { name, slug }).await?;
        ids.push(tag.id);
    }
    Ok(ids)
}

async fn find_or_create<R>(repo: &mut R, input: NewTag) -> Result<Tag, DomainError>
where
    R: TagRepository,
{
    if let Some(tag) = repo.find_tag_by_slug(&input.slug).await? {
        return Ok(tag);
    }

    let slug = input.slug.clone();
    if let Some(tag) = repo.insert_tag_if_absent(input).await? {
        debug!(tag_id = tag.id, slug = %tag.slug, "tag created");
        return Ok(tag);
    }

    // Lost the insert race: another writer committed the same slug.
    repo.find_tag_by_slug(&slug).await?.ok_or_else(|| {
        DomainError::Unexpected(format!("tag '{slug}' vanished after conflict"))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::resolve_tags;
    use crate::data::Pagination;
    use crate::data::repositories::memory::MemoryStore;
    use crate::data::store::{BlogStore, UnitOfWork};
    use crate::data::tag_repository::{NewTag, TagRepository};
    use crate::domain::error::DomainError;
    use crate::domain::tag::Tag;

    /// Behaves as if another writer inserts each slug between our lookup and
    /// our insert.
    #[derive(Clone, Default)]
    struct RacingTagRepo {
        committed_elsewhere: Arc<Mutex<Vec<Tag>>>,
        lookups: Arc<Mutex<usize>>,
        inserts: Arc<Mutex<Vec<NewTag>>>,
        refetch_finds_nothing: bool,
    }

    #[async_trait]
    impl TagRepository for RacingTagRepo {
        async fn find_tag(&mut self, _id: i64) -> Result<Option<Tag>, DomainError> {
            Ok(None)
        }

        async fn find_tag_by_slug(&mut self, slug: &str) -> Result<Option<Tag>, DomainError> {
            *self.lookups.lock().expect("lookups mutex poisoned") += 1;
            Ok(self
                .committed_elsewhere
                .lock()
                .expect("committed mutex poisoned")
                .iter()
                .find(|tag| tag.slug == slug)
                .cloned())
        }

        async fn insert_tag_if_absent(
            &mut self,
            input: NewTag,
        ) -> Result<Option<Tag>, DomainError> {
            self.inserts
                .lock()
                .expect("inserts mutex poisoned")
                .push(input.clone());
            if !self.refetch_finds_nothing {
                let mut committed = self
                    .committed_elsewhere
                    .lock()
                    .expect("committed mutex poisoned");
                let id = committed.len() as i64 + 100;
                let now = Utc::now();
                committed.push(
                    Tag::new(id, input.name, input.slug, now, now).expect("tag must be valid"),
                );
            }
            Ok(None)
        }

        async fn create_tag(&mut self, _input: NewTag) -> Result<Tag, DomainError> {
            unreachable!("resolve_tags must not call create_tag")
        }

        async fn update_tag(
            &mut self,
            _id: i64,
            _input: NewTag,
        ) -> Result<Option<Tag>, DomainError> {
            Ok(None)
        }

        async fn delete_tag(&mut self, _id: i64) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn list_tags(&mut self, _pagination: Pagination) -> Result<Vec<Tag>, DomainError> {
            Ok(Vec::new())
        }

        async fn total_tags(&mut self) -> Result<i64, DomainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn resolve_tags_creates_missing_tags_once_per_slug() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.expect("begin must succeed");

        let names = vec![
            "Rust".to_string(),
            "  rust ".to_string(),
            "RUST".to_string(),
            "Web Dev".to_string(),
        ];
        let ids = resolve_tags(&mut tx, &names)
            .await
            .expect("resolve must succeed");
        tx.commit().await.expect("commit must succeed");

        assert_eq!(ids.len(), 2);
        let state = store.snapshot();
        let mut slugs: Vec<&str> = state.tags.values().map(|t| t.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["rust", "web-dev"]);
        let rust = state
            .tags
            .values()
            .find(|t| t.slug == "rust")
            .expect("rust tag must exist");
        assert_eq!(rust.name, "Rust");
    }

    #[tokio::test]
    async fn resolve_tags_is_idempotent() {
        let store = MemoryStore::new();
        let names = vec!["Laravel".to_string(), "API".to_string()];

        let mut tx = store.begin().await.expect("begin must succeed");
        let mut first = resolve_tags(&mut tx, &names).await.expect("first resolve");
        tx.commit().await.expect("commit must succeed");

        let mut tx = store.begin().await.expect("begin must succeed");
        let mut second = resolve_tags(&mut tx, &names).await.expect("second resolve");
        tx.commit().await.expect("commit must succeed");

        first.sort();
        second.sort();
        assert_eq!(first, second);
        assert_eq!(store.snapshot().tags.len(), 2);
    }

    #[tokio::test]
    async fn resolve_tags_skips_blank_names() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.expect("begin must succeed");

        let names = vec!["".to_string(), "   ".to_string(), "\t\n".to_string()];
        let ids = resolve_tags(&mut tx, &names)
            .await
            .expect("resolve must succeed");
        tx.commit().await.expect("commit must succeed");

        assert!(ids.is_empty());
        assert!(store.snapshot().tags.is_empty());
    }

    #[tokio::test]
    async fn resolve_tags_rejects_punctuation_only_names() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.expect("begin must succeed");

        let names = vec!["Rust".to_string(), "!!!".to_string()];
        let err = resolve_tags(&mut tx, &names)
            .await
            .expect_err("resolve must fail");

        assert!(matches!(err, DomainError::Validation { field: "tags", .. }));
    }

    #[tokio::test]
    async fn resolve_tags_rejects_too_long_names() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.expect("begin must succeed");

        let names = vec!["a".repeat(256)];
        let err = resolve_tags(&mut tx, &names)
            .await
            .expect_err("resolve must fail");

        assert!(matches!(err, DomainError::Validation { field: "tags", .. }));
    }

    #[tokio::test]
    async fn resolve_tags_refetches_after_losing_insert_race() {
        let mut repo = RacingTagRepo::default();

        let ids = resolve_tags(&mut repo, &["Go".to_string()])
            .await
            .expect("resolve must succeed");

        assert_eq!(ids, vec![100]);
        assert_eq!(*repo.lookups.lock().expect("lookups mutex poisoned"), 2);
        let inserts = repo.inserts.lock().expect("inserts mutex poisoned");
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].slug, "go");
    }

    #[tokio::test]
    async fn resolve_tags_reports_unexpected_when_refetch_finds_nothing() {
        let mut repo = RacingTagRepo {
            refetch_finds_nothing: true,
            ..RacingTagRepo::default()
        };

        let err = resolve_tags(&mut repo, &["Go".to_string()])
            .await
            .expect_err("resolve must fail");

        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    #[tokio::test]
    async fn resolve_tags_processes_slugs_in_sorted_order() {
        let mut repo = RacingTagRepo::default();
        let names = vec!["zig".to_string(), "Ada".to_string(), "go".to_string()];

        resolve_tags(&mut repo, &names)
            .await
            .expect("resolve must succeed");

        let inserts = repo.inserts.lock().expect("inserts mutex poisoned");
        let order: Vec<&str> = inserts.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(order, vec!["ada", "go", "zig"]);
    }
}
