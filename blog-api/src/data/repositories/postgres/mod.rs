use sqlx::error::DatabaseError;

pub(crate) mod post_repository;
pub(crate) mod store;
pub(crate) mod tag_repository;
pub(crate) mod user_repository;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_unique_violation(db_err: &dyn DatabaseError) -> bool {
    db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
}

fn is_foreign_key_violation(db_err: &dyn DatabaseError) -> bool {
    db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
}
