use self::error::DomainError;

pub(crate) mod error;
pub(crate) mod post;
pub(crate) mod slug;
pub(crate) mod tag;
pub(crate) mod user;

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}
