use std::ops::DerefMut;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::is_unique_violation;
use super::store::PostgresScope;
use crate::data::Pagination;
use crate::data::tag_repository::{NewTag, TagRepository};
use crate::domain::error::DomainError;
use crate::domain::tag::Tag;

#[derive(sqlx::FromRow)]
pub(super) struct TagRow {
    id: i64,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl<C> TagRepository for PostgresScope<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    async fn find_tag(&mut self, id: i64) -> Result<Option<Tag>, DomainError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        row.map(map_row_to_tag).transpose()
    }

    async fn find_tag_by_slug(&mut self, slug: &str) -> Result<Option<Tag>, DomainError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tags
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        row.map(map_row_to_tag).transpose()
    }

    async fn insert_tag_if_absent(&mut self, input: NewTag) -> Result<Option<Tag>, DomainError> {
        // Blocks on a concurrent uncommitted insert of the same slug until it resolves.
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (name, slug)
            VALUES ($1, $2)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_optional(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        row.map(map_row_to_tag).transpose()
    }

    async fn create_tag(&mut self, input: NewTag) -> Result<Tag, DomainError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_one(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        map_row_to_tag(row)
    }

    async fn update_tag(&mut self, id: i64, input: NewTag) -> Result<Option<Tag>, DomainError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            UPDATE tags
            SET name = $2,
                slug = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_optional(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        row.map(map_row_to_tag).transpose()
    }

    async fn delete_tag(&mut self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_tags(&mut self, pagination: Pagination) -> Result<Vec<Tag>, DomainError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tags
            ORDER BY id ASC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        rows.into_iter().map(map_row_to_tag).collect()
    }

    async fn total_tags(&mut self) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tags
            "#,
        )
        .fetch_one(self.conn())
        .await
        .map_err(map_tag_db_error)?;

        Ok(count)
    }
}

pub(super) fn map_row_to_tag(row: TagRow) -> Result<Tag, DomainError> {
    Tag::new(row.id, row.name, row.slug, row.created_at, row.updated_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_tag_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && is_unique_violation(&**db_err)
    {
        return DomainError::Conflict("tag slug".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
