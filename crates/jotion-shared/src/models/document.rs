use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-owned note, optionally nested under another document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    /// Subject of the identity that created the document. Never changes.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document: Option<Uuid>,
    pub is_archived: bool,
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// A fresh, unarchived and unpublished document with no optional fields set.
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, parent_document: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            user_id: user_id.into(),
            parent_document,
            is_archived: false,
            is_published: false,
            content: None,
            cover_image: None,
            icon: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_document.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_defaults() {
        let doc = Document::new("user_1", "Untitled", None);
        assert_eq!(doc.user_id, "user_1");
        assert_eq!(doc.title, "Untitled");
        assert!(doc.is_root());
        assert!(!doc.is_archived);
        assert!(!doc.is_published);
        assert!(doc.content.is_none());
        assert!(doc.cover_image.is_none());
        assert!(doc.icon.is_none());
    }

    #[test]
    fn serializes_camel_case_and_omits_unset_fields() {
        let parent = Uuid::new_v4();
        let doc = Document::new("user_1", "Beta", Some(parent));
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["userId"], "user_1");
        assert_eq!(value["parentDocument"], parent.to_string());
        assert_eq!(value["isArchived"], false);
        assert_eq!(value["isPublished"], false);
        assert!(value.get("content").is_none());
        assert!(value.get("coverImage").is_none());
        assert!(value.get("icon").is_none());
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Alpha",
            "userId": "user_1",
            "isArchived": false,
            "isPublished": true,
            "createdAt": "2024-01-01T00:00:00Z",
        });
        let doc: Document = serde_json::from_value(json).unwrap();
        assert!(doc.is_root());
        assert!(doc.is_published);
    }
}
