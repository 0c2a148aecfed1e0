use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDocumentResponse {
    pub id: Uuid,
}

/// Query string of `GET /api/v1/documents/sidebar`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_document: Option<Uuid>,
}
