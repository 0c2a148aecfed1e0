use axum::{
    extract::{Query, State},
    Extension, Json,
};
use jotion_shared::{
    api::{CreateDocumentRequest, CreateDocumentResponse, SidebarParams},
    Document,
};

use crate::auth::CallerIdentity;
use crate::documents;
use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/v1/documents/sidebar
pub async fn get_sidebar(
    State(state): State<AppState>,
    Extension(caller): Extension<Option<CallerIdentity>>,
    Query(params): Query<SidebarParams>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents =
        documents::get_sidebar(state.store.as_ref(), caller.as_ref(), params.parent_document)
            .await?;

    Ok(Json(documents))
}

/// POST /api/v1/documents
pub async fn create_document(
    State(state): State<AppState>,
    Extension(caller): Extension<Option<CallerIdentity>>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Json<CreateDocumentResponse>, AppError> {
    let id = documents::create(
        state.store.as_ref(),
        caller.as_ref(),
        req.title,
        req.parent_document,
    )
    .await?;

    Ok(Json(CreateDocumentResponse { id }))
}
