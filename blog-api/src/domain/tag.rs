use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::slug::slugify;
use super::validate_positive_i64;

pub(crate) const TAG_NAME_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Tag {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Tag {
    pub(crate) fn new(
        id: i64,
        name: impl Into<String>,
        slug: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        let name = name.into();
        let slug = slug.into();
        if slug.is_empty() {
            return Err(DomainError::Validation {
                field: "slug",
                message: "must not be empty",
            });
        }

        Ok(Self {
            id,
            name,
            slug,
            created_at,
            updated_at,
        })
    }
}

/// Trimmed tag name plus the slug that identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagName {
    pub(crate) name: String,
    pub(crate) slug: String,
}

impl TagName {
    /// `field` names the request field reported on validation failure.
    pub(crate) fn parse(raw: &str, field: &'static str) -> Result<Self, DomainError> {
        let name = raw.trim();
        let len = name.chars().count();
        if len == 0 || len > TAG_NAME_MAX_CHARS {
            return Err(DomainError::Validation {
                field,
                message: "tag name must be 1..255 chars",
            });
        }

        let slug = slugify(name);
        if slug.is_empty() {
            return Err(DomainError::Validation {
                field,
                message: "tag name must contain at least one letter or digit",
            });
        }

        Ok(Self {
            name: name.to_string(),
            slug,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TagRequest {
    pub(crate) name: String,
}

impl TagRequest {
    pub(crate) fn validate(self) -> Result<TagName, DomainError> {
        TagName::parse(&self.name, "name")
    }
}
