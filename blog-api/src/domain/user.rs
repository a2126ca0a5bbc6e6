use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;
use super::validate_positive_i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            email: normalize_email(&self.email)?,
            password: validate_password(self.password)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || email.len() > 255 {
            return Err(DomainError::Validation {
                field: "email",
                message: "must be 1..255 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

/// Partial profile update; absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdateUserRequest {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) password: Option<String>,
}

impl UpdateUserRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            email: self.email.as_deref().map(normalize_email).transpose()?,
            password: self.password.map(validate_password).transpose()?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        let name = normalize_name(&name.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            name,
            email,
            created_at,
            updated_at,
        })
    }
}

fn normalize_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 || len > 255 {
        return Err(DomainError::Validation {
            field: "name",
            message: "must be 1..255 chars",
        });
    }
    Ok(name.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

fn validate_password(password: String) -> Result<String, DomainError> {
    let password_len = password.chars().count();
    if !(6..=128).contains(&password_len) {
        return Err(DomainError::Validation {
            field: "password",
            message: "must be 6..128 chars",
        });
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::{LoginRequest, RegisterRequest, UpdateUserRequest, User, normalize_email};
    use crate::domain::error::DomainError;
    use chrono::Utc;

    #[test]
    fn user_new_rejects_non_positive_id() {
        let now = Utc::now();
        let result = User::new(0, "Valid User", "test@example.com", now, now);
        assert!(result.is_err());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn register_password_length_is_checked() {
        let short = RegisterRequest {
            name: "Valid User".to_string(),
            email: "test@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            name: "  Valid User ".to_string(),
            email: "Test@Example.com".to_string(),
            password: "secret123".to_string(),
        };
        let validated = ok.validate().expect("must be valid");
        assert_eq!(validated.name, "Valid User");
        assert_eq!(validated.email, "test@example.com");
    }

    #[test]
    fn login_request_lowercases_email() {
        let req = LoginRequest {
            email: "  Admin@Example.COM ".to_string(),
            password: "admin123".to_string(),
        };
        let validated = req.validate().expect("must be valid");
        assert_eq!(validated.email, "admin@example.com");
    }

    #[test]
    fn update_user_request_validates_only_present_fields() {
        let empty = UpdateUserRequest::default()
            .validate()
            .expect("empty patch is valid");
        assert!(empty.name.is_none() && empty.email.is_none() && empty.password.is_none());

        let err = UpdateUserRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        }
        .validate()
        .expect_err("invalid email must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "email", .. }));
    }
}
