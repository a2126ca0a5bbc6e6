use tracing::info;

use crate::data::Pagination;
use crate::data::user_repository::{UserPatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{UpdateUserRequest, User};
use crate::infrastructure::password::hash_password;

#[derive(Debug, Clone)]
pub(crate) struct ListUsersResult {
    pub(crate) users: Vec<User>,
    pub(crate) page: u32,
    pub(crate) per_page: u32,
    pub(crate) total: i64,
}

pub(crate) struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn list_users(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ListUsersResult, DomainError> {
        let users = self.repo.list_users(Pagination { page, per_page }).await?;
        let total = self.repo.total_users().await?;

        Ok(ListUsersResult {
            users,
            page,
            per_page,
            total,
        })
    }

    pub(crate) async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.repo
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Users may only edit their own profile.
    pub(crate) async fn update_user(
        &self,
        actor_user_id: i64,
        id: i64,
        req: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        if actor_user_id != id {
            return Err(DomainError::Forbidden);
        }
        let req = req.validate()?;

        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        let patch = UserPatch {
            name: req.name,
            email: req.email,
            password_hash,
        };

        let user = self
            .repo
            .update_user(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))?;

        info!(user_id = id, "user updated");
        Ok(user)
    }

    pub(crate) async fn delete_user(&self, actor_user_id: i64, id: i64) -> Result<(), DomainError> {
        if actor_user_id != id {
            return Err(DomainError::Forbidden);
        }

        if !self.repo.delete_user(id).await? {
            return Err(DomainError::not_found("user", id));
        }

        info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::UserService;
    use crate::data::Pagination;
    use crate::data::user_repository::{NewUser, UserCredentials, UserPatch, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::user::{UpdateUserRequest, User};
    use crate::infrastructure::password::verify_password;

    #[derive(Clone, Default)]
    struct FakeUserRepo {
        users: Arc<Mutex<Vec<User>>>,
        last_patch: Arc<Mutex<Option<UserPatch>>>,
        last_pagination: Arc<Mutex<Option<Pagination>>>,
    }

    impl FakeUserRepo {
        fn with_users(users: Vec<User>) -> Self {
            Self {
                users: Arc::new(Mutex::new(users)),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, _input: NewUser) -> Result<User, DomainError> {
            Err(DomainError::Unexpected("not used".to_string()))
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(None)
        }

        async fn find_user(&self, id: i64) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .expect("users mutex poisoned")
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DomainError> {
            *self.last_patch.lock().expect("last patch mutex poisoned") = Some(patch.clone());
            let mut users = self.users.lock().expect("users mutex poisoned");
            let Some(user) = users.iter_mut().find(|u| u.id == id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(email) = patch.email {
                user.email = email;
            }
            Ok(Some(user.clone()))
        }

        async fn delete_user(&self, id: i64) -> Result<bool, DomainError> {
            let mut users = self.users.lock().expect("users mutex poisoned");
            let before = users.len();
            users.retain(|u| u.id != id);
            Ok(users.len() != before)
        }

        async fn list_users(&self, pagination: Pagination) -> Result<Vec<User>, DomainError> {
            *self
                .last_pagination
                .lock()
                .expect("last pagination mutex poisoned") = Some(pagination);
            Ok(self.users.lock().expect("users mutex poisoned").clone())
        }

        async fn total_users(&self) -> Result<i64, DomainError> {
            Ok(self.users.lock().expect("users mutex poisoned").len() as i64)
        }
    }

    #[tokio::test]
    async fn update_user_applies_patch_for_self() {
        let repo = FakeUserRepo::with_users(vec![sample_user(1, "Alice", "alice@example.com")]);
        let service = UserService::new(repo.clone());

        let req = UpdateUserRequest {
            name: Some("  Alicia ".to_string()),
            email: None,
            password: Some("new-secret-password".to_string()),
        };
        let user = service
            .update_user(1, 1, req)
            .await
            .expect("update must succeed");

        assert_eq!(user.name, "Alicia");
        assert_eq!(user.email, "alice@example.com");

        let patch = repo
            .last_patch
            .lock()
            .expect("last patch mutex poisoned")
            .clone()
            .expect("update_user must be called");
        assert!(patch.email.is_none());
        let hash = patch.password_hash.expect("password must be hashed");
        verify_password("new-secret-password", &hash).expect("hash must match new password");
    }

    #[tokio::test]
    async fn update_user_for_someone_else_is_forbidden() {
        let repo = FakeUserRepo::with_users(vec![sample_user(1, "Alice", "alice@example.com")]);
        let service = UserService::new(repo.clone());

        let err = service
            .update_user(2, 1, UpdateUserRequest::default())
            .await
            .expect_err("update must fail");

        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.last_patch
                .lock()
                .expect("last patch mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_user_rejects_invalid_email() {
        let repo = FakeUserRepo::with_users(vec![sample_user(1, "Alice", "alice@example.com")]);
        let service = UserService::new(repo);

        let req = UpdateUserRequest {
            email: Some("not-an-email".to_string()),
            ..UpdateUserRequest::default()
        };
        let err = service
            .update_user(1, 1, req)
            .await
            .expect_err("update must fail");

        assert!(matches!(err, DomainError::Validation { field: "email", .. }));
    }

    #[tokio::test]
    async fn delete_user_only_allows_self() {
        let repo = FakeUserRepo::with_users(vec![
            sample_user(1, "Alice", "alice@example.com"),
            sample_user(2, "Bob", "bob@example.com"),
        ]);
        let service = UserService::new(repo.clone());

        let err = service
            .delete_user(1, 2)
            .await
            .expect_err("delete must fail");
        assert!(matches!(err, DomainError::Forbidden));

        service.delete_user(2, 2).await.expect("delete must succeed");
        let remaining = repo.users.lock().expect("users mutex poisoned").len();
        assert_eq!(remaining, 1);

        let err = service
            .delete_user(2, 2)
            .await
            .expect_err("second delete must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_and_list_users() {
        let repo = FakeUserRepo::with_users(vec![sample_user(1, "Alice", "alice@example.com")]);
        let service = UserService::new(repo.clone());

        let user = service.get_user(1).await.expect("get must succeed");
        assert_eq!(user.name, "Alice");

        let err = service.get_user(9).await.expect_err("get must fail");
        assert!(matches!(err, DomainError::NotFound(_)));

        let page = service.list_users(2, 5).await.expect("list must succeed");
        assert_eq!(page.total, 1);
        assert_eq!(page.page, 2);
        assert_eq!(
            *repo
                .last_pagination
                .lock()
                .expect("last pagination mutex poisoned"),
            Some(Pagination {
                page: 2,
                per_page: 5
            })
        );
    }

    fn sample_user(id: i64, name: &str, email: &str) -> User {
        let now = Utc::now();
        User::new(id, name, email, now, now).expect("sample user must be valid")
    }
}
