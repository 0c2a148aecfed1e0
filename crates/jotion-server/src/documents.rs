//! The document operations exposed to clients.
//!
//! Every operation takes the caller identity as an explicit argument and
//! rejects anonymous callers before touching the store, so nothing is read or
//! written on behalf of an unresolved identity.

use jotion_shared::Document;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::store::DocumentStore;

/// Live documents directly under `parent` (roots when `None`) that belong to
/// the caller, newest first.
pub async fn get_sidebar(
    store: &dyn DocumentStore,
    caller: Option<&CallerIdentity>,
    parent: Option<Uuid>,
) -> Result<Vec<Document>, AppError> {
    let caller = caller.ok_or(AppError::Unauthenticated)?;

    store.list_children(&caller.subject, parent).await
}

/// Create a document owned by the caller and return its id.
///
/// The title must not be blank. A parent, when given, must be an existing
/// document owned by the caller.
pub async fn create(
    store: &dyn DocumentStore,
    caller: Option<&CallerIdentity>,
    title: String,
    parent: Option<Uuid>,
) -> Result<Uuid, AppError> {
    let caller = caller.ok_or(AppError::Unauthenticated)?;

    if title.trim().is_empty() {
        return Err(AppError::Validation("Document title is required".to_string()));
    }

    if let Some(parent_id) = parent {
        match store.get(parent_id).await? {
            Some(p) if p.user_id == caller.subject => {}
            _ => {
                return Err(AppError::Validation(
                    "Parent document not found".to_string(),
                ))
            }
        }
    }

    let document = Document::new(caller.subject.clone(), title, parent);
    store.insert(&document).await?;

    tracing::info!(
        document_id = %document.id,
        parent = ?document.parent_document,
        "Document created"
    );

    Ok(document.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;

    fn alice() -> CallerIdentity {
        CallerIdentity::new("user_alice")
    }

    fn bob() -> CallerIdentity {
        CallerIdentity::new("user_bob")
    }

    fn titles(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.title.as_str()).collect()
    }

    #[tokio::test]
    async fn create_untitled_root_document() {
        let store = MemoryDocumentStore::new();
        let id = create(&store, Some(&alice()), "Untitled".to_string(), None)
            .await
            .unwrap();

        let doc = store.get(id).await.unwrap().unwrap();
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.user_id, "user_alice");
        assert_eq!(doc.parent_document, None);
        assert!(!doc.is_archived);
        assert!(!doc.is_published);
    }

    #[tokio::test]
    async fn anonymous_caller_is_rejected_without_side_effects() {
        let store = MemoryDocumentStore::new();

        let err = create(&store, None, "Untitled".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
        assert!(store.is_empty().await);

        let err = get_sidebar(&store, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn sidebar_is_scoped_by_user_and_parent() {
        let store = MemoryDocumentStore::new();
        let alpha = create(&store, Some(&alice()), "Alpha".to_string(), None)
            .await
            .unwrap();
        create(&store, Some(&alice()), "Beta".to_string(), Some(alpha))
            .await
            .unwrap();

        let roots = get_sidebar(&store, Some(&alice()), None).await.unwrap();
        assert_eq!(titles(&roots), ["Alpha"]);

        let children = get_sidebar(&store, Some(&alice()), Some(alpha)).await.unwrap();
        assert_eq!(titles(&children), ["Beta"]);

        let others = get_sidebar(&store, Some(&bob()), None).await.unwrap();
        assert!(others.is_empty());
    }

    #[tokio::test]
    async fn sidebar_never_returns_archived_or_foreign_documents() {
        let store = MemoryDocumentStore::new();
        let mut archived = Document::new("user_alice", "Archived", None);
        archived.is_archived = true;
        store.insert(&archived).await.unwrap();
        store
            .insert(&Document::new("user_bob", "Bob's", None))
            .await
            .unwrap();
        create(&store, Some(&alice()), "Live".to_string(), None)
            .await
            .unwrap();

        let docs = get_sidebar(&store, Some(&alice()), None).await.unwrap();
        assert_eq!(titles(&docs), ["Live"]);
        assert!(docs.iter().all(|d| d.user_id == "user_alice" && !d.is_archived));
    }

    #[tokio::test]
    async fn sidebar_orders_newest_first() {
        let store = MemoryDocumentStore::new();
        for title in ["First", "Second", "Third"] {
            create(&store, Some(&alice()), title.to_string(), None)
                .await
                .unwrap();
        }

        let docs = get_sidebar(&store, Some(&alice()), None).await.unwrap();
        assert_eq!(titles(&docs), ["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let store = MemoryDocumentStore::new();
        let err = create(&store, Some(&alice()), "   ".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn parent_must_exist_and_belong_to_caller() {
        let store = MemoryDocumentStore::new();
        let bobs = create(&store, Some(&bob()), "Bob's".to_string(), None)
            .await
            .unwrap();

        let err = create(&store, Some(&alice()), "Child".to_string(), Some(bobs))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create(&store, Some(&alice()), "Child".to_string(), Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_titles_are_allowed() {
        let store = MemoryDocumentStore::new();
        let first = create(&store, Some(&alice()), "Untitled".to_string(), None)
            .await
            .unwrap();
        let second = create(&store, Some(&alice()), "Untitled".to_string(), None)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(get_sidebar(&store, Some(&alice()), None).await.unwrap().len(), 2);
    }
}
