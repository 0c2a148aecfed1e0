use async_trait::async_trait;
use jotion_shared::Document;
use uuid::Uuid;

use super::DocumentStore;
use crate::db::DbPool;
use crate::error::AppError;

const DOCUMENT_COLUMNS: &str = "id, title, user_id, parent_document, is_archived, is_published, \
                                content, cover_image, icon, created_at";

pub struct PgDocumentStore {
    db: DbPool,
}

impl PgDocumentStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, title, user_id, parent_document, is_archived,
                                   is_published, content, cover_image, icon, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(document.id)
        .bind(&document.title)
        .bind(&document.user_id)
        .bind(document.parent_document)
        .bind(document.is_archived)
        .bind(document.is_published)
        .bind(&document.content)
        .bind(&document.cover_image)
        .bind(&document.icon)
        .bind(document.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn list_children(
        &self,
        user_id: &str,
        parent: Option<Uuid>,
    ) -> Result<Vec<Document>, AppError> {
        // Separate statements so both forms stay on documents_by_user_parent.
        let documents = match parent {
            Some(parent_id) => {
                let sql = format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents \
                     WHERE user_id = $1 AND parent_document = $2 AND is_archived = FALSE \
                     ORDER BY seq DESC"
                );
                sqlx::query_as::<_, Document>(&sql)
                    .bind(user_id)
                    .bind(parent_id)
                    .fetch_all(&self.db)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents \
                     WHERE user_id = $1 AND parent_document IS NULL AND is_archived = FALSE \
                     ORDER BY seq DESC"
                );
                sqlx::query_as::<_, Document>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(documents)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1");
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(document)
    }
}
