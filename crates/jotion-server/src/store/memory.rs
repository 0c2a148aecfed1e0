use async_trait::async_trait;
use jotion_shared::Document;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::DocumentStore;
use crate::error::AppError;

/// Documents held in insertion order for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        self.documents.write().await.push(document.clone());
        Ok(())
    }

    async fn list_children(
        &self,
        user_id: &str,
        parent: Option<Uuid>,
    ) -> Result<Vec<Document>, AppError> {
        let documents = self.documents.read().await;

        Ok(documents
            .iter()
            .rev()
            .filter(|d| d.user_id == user_id && d.parent_document == parent && !d.is_archived)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryDocumentStore::new();
        for title in ["one", "two", "three"] {
            store.insert(&Document::new("u", title, None)).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_children("u", None)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn skips_archived_documents() {
        let store = MemoryDocumentStore::new();
        let mut archived = Document::new("u", "old", None);
        archived.is_archived = true;
        store.insert(&archived).await.unwrap();
        store.insert(&Document::new("u", "live", None)).await.unwrap();

        let docs = store.list_children("u", None).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "live");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn root_query_does_not_match_children() {
        let store = MemoryDocumentStore::new();
        let root = Document::new("u", "root", None);
        store.insert(&root).await.unwrap();
        store
            .insert(&Document::new("u", "child", Some(root.id)))
            .await
            .unwrap();

        let roots = store.list_children("u", None).await.unwrap();
        assert_eq!(roots.len(), 1);
        let children = store.list_children("u", Some(root.id)).await.unwrap();
        assert_eq!(children[0].title, "child");
        assert_eq!(store.get(root.id).await.unwrap(), Some(root));
    }
}
