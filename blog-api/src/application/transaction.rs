use tracing::{debug, error};

use crate::data::store::UnitOfWork;
use crate::domain::error::DomainError;

/// Commits `tx` when `result` is `Ok`, otherwise rolls it back and hands the
/// original error back to the caller.
pub(crate) async fn complete<T, U>(
    tx: U,
    result: Result<T, DomainError>,
    operation: &'static str,
) -> Result<T, DomainError>
where
    U: UnitOfWork,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(operation, error = %rollback_err, "transaction rollback failed");
            }
            if err.is_client_error() {
                debug!(operation, error = %err, "transaction rolled back");
            } else {
                error!(operation, error = %err, "transaction rolled back");
            }
            Err(err)
        }
    }
}
