//! Transaction scope helper

use std::future::Future;

use cacheside_domain::error::Result;
use cacheside_domain::ports::repositories::TransactionManager;
use cacheside_domain::value_objects::TransactionContext;
use tracing::{debug, warn};

/// Run `work` inside a store transaction
///
/// Commits when `work` returns `Ok`, aborts when it returns `Err`. The work
/// error wins over an abort failure, which is only logged.
pub async fn run_in_transaction<T, F, Fut>(manager: &dyn TransactionManager, work: F) -> Result<T>
where
    F: FnOnce(TransactionContext) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let ctx = manager.begin().await?;
    let tx_id = ctx.id().to_string();
    debug!(tx = %tx_id, "Transaction started");

    match work(ctx.clone()).await {
        Ok(value) => {
            manager.commit(ctx).await?;
            debug!(tx = %tx_id, "Transaction committed");
            Ok(value)
        }
        Err(error) => {
            if let Err(abort_error) = manager.abort(ctx).await {
                warn!(tx = %tx_id, error = %abort_error, "Transaction abort failed");
            } else {
                debug!(tx = %tx_id, "Transaction aborted");
            }
            Err(error)
        }
    }
}
