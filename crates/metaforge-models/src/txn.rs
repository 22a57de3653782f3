//! Read-transaction contract.
//!
//! The scraper engine never opens write transactions; it only needs a scoped
//! read view while loading the entity being re-scraped. Storage backends run
//! the supplied unit of work under a read-only transactional context and
//! release it on every exit path.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;

/// A unit of work to run inside a transaction. The future borrows from the
/// caller's scope, so results are written into captured locals.
pub type TxnWork<'a> = BoxFuture<'a, Result<()>>;

/// Storage transaction manager.
#[async_trait]
pub trait TxnManager: Send + Sync {
    /// Run `work` under a read-only transactional context.
    async fn with_read_txn<'a>(&self, work: TxnWork<'a>) -> Result<()>;
}
