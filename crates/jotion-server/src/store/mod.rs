//! Persistence backends for documents.
//!
//! Both backends answer the same two questions the document operations ask:
//! "store this new record" and "which live documents sit directly under this
//! parent for this user". Authorization happens above this layer.

mod memory;
mod postgres;

use async_trait::async_trait;
use jotion_shared::Document;
use uuid::Uuid;

use crate::error::AppError;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document. Either the whole record is stored or nothing is.
    async fn insert(&self, document: &Document) -> Result<(), AppError>;

    /// Non-archived documents owned by `user_id` whose parent is exactly
    /// `parent` (`None` selects root documents), newest first.
    async fn list_children(
        &self,
        user_id: &str,
        parent: Option<Uuid>,
    ) -> Result<Vec<Document>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError>;
}
