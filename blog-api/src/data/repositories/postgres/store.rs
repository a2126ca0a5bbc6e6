use std::ops::DerefMut;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::data::store::{BlogStore, UnitOfWork};
use crate::domain::error::DomainError;

/// Repositories bound to a single pooled connection or open transaction.
pub(crate) struct PostgresScope<C> {
    conn: C,
}

impl<C> PostgresScope<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub(crate) fn new(conn: C) -> Self {
        Self { conn }
    }

    pub(super) fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

pub(crate) type PostgresSession = PostgresScope<PoolConnection<Postgres>>;
pub(crate) type PostgresTransaction = PostgresScope<Transaction<'static, Postgres>>;

#[derive(Debug, Clone)]
pub(crate) struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogStore for PostgresStore {
    type Session = PostgresSession;
    type Tx = PostgresTransaction;

    async fn session(&self) -> Result<Self::Session, DomainError> {
        let conn = self.pool.acquire().await.map_err(map_store_error)?;
        Ok(PostgresScope::new(conn))
    }

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let tx = self.pool.begin().await.map_err(map_store_error)?;
        Ok(PostgresScope::new(tx))
    }
}

#[async_trait]
impl UnitOfWork for PostgresTransaction {
    async fn commit(self) -> Result<(), DomainError> {
        self.conn.commit().await.map_err(map_store_error)
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.conn.rollback().await.map_err(map_store_error)
    }
}

fn map_store_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}
