use std::ops::DerefMut;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use super::store::PostgresScope;
use super::tag_repository::{TagRow, map_row_to_tag};
use super::{is_foreign_key_violation, is_unique_violation};
use crate::data::Pagination;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::tag::Tag;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    slug: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    #[sqlx(flatten)]
    tag: TagRow,
}

#[async_trait]
impl<C> PostRepository for PostgresScope<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    async fn create_post(&mut self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, slug, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, slug, user_id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.slug)
        .bind(input.user_id)
        .fetch_one(self.conn())
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn find_post(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            id,
            title,
            content,
            slug,
            user_id,
            created_at,
            updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn find_post_for_update(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            id,
            title,
            content,
            slug,
            user_id,
            created_at,
            updated_at
            FROM posts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(self.conn())
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(
        &mut self,
        id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                slug = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, slug, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(&patch.slug)
        .fetch_optional(self.conn())
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&mut self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.conn())
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&mut self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id,
                title,
                content,
                slug,
                user_id,
                created_at,
                updated_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.conn())
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn total_posts(&mut self) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts
            "#,
        )
        .fetch_one(self.conn())
        .await
        .map_err(map_post_db_error)?;

        Ok(count)
    }

    async fn attach_tags(&mut self, post_id: i64, tag_ids: &[i64]) -> Result<(), DomainError> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO post_tag (post_id, tag_id)
            SELECT $1, tag_id
            FROM UNNEST($2::BIGINT[]) AS input(tag_id)
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(self.conn())
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn sync_tags(&mut self, post_id: i64, tag_ids: &[i64]) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM post_tag
            WHERE post_id = $1
              AND tag_id <> ALL($2::BIGINT[])
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(self.conn())
        .await
        .map_err(map_post_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO post_tag (post_id, tag_id)
            SELECT $1, tag_id
            FROM UNNEST($2::BIGINT[]) AS input(tag_id)
            ON CONFLICT (post_id, tag_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(self.conn())
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn tags_for_posts(&mut self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DomainError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT
                pt.post_id,
                t.id,
                t.name,
                t.slug,
                t.created_at,
                t.updated_at
            FROM post_tag pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1::BIGINT[])
            ORDER BY pt.post_id, t.slug
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.conn())
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter()
            .map(|row| Ok((row.post_id, map_row_to_tag(row.tag)?)))
            .collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.content,
        row.slug,
        row.user_id,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if is_unique_violation(&**db_err) {
            return match db_err.constraint() {
                Some("posts_slug_key") => DomainError::Conflict("post slug".to_string()),
                _ => DomainError::Conflict("post".to_string()),
            };
        }
        if is_foreign_key_violation(&**db_err) {
            let resource = match db_err.constraint() {
                Some("posts_user_id_fkey") => "user",
                Some("post_tag_tag_id_fkey") => "tag",
                _ => "post",
            };
            return DomainError::NotFound(resource.to_string());
        }
    }
    DomainError::Unexpected(err.to_string())
}
