use std::sync::Arc;

use sqlx::PgPool;

use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::application::tag_service::TagService;
use crate::application::user_service::UserService;
use crate::data::repositories::postgres::store::PostgresStore;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) user_service: Arc<UserService<PostgresUserRepository>>,
    pub(crate) post_service: Arc<PostService<PostgresStore>>,
    pub(crate) tag_service: Arc<TagService<PostgresStore>>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(pool: PgPool, jwt: JwtService) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let store = PostgresStore::new(pool);

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt.clone())),
            user_service: Arc::new(UserService::new(users)),
            post_service: Arc::new(PostService::new(store.clone())),
            tag_service: Arc::new(TagService::new(store)),
            jwt: Arc::new(jwt),
        }
    }
}
