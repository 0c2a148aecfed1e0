use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::routes::AppState;

use super::{jwt::verify_access_token, CallerIdentity};

/// Resolve the caller from the bearer token and attach it to the request as
/// `Option<CallerIdentity>`.
///
/// A missing or invalid token resolves to `None` rather than rejecting the
/// request; each document operation decides what an anonymous caller gets.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| verify_access_token(token, &state.config.jwt_secret).ok())
        .map(|claims| CallerIdentity::new(claims.sub));

    if identity.is_none() {
        tracing::debug!("No caller identity resolved for {}", request.uri().path());
    }

    request.extensions_mut().insert(identity);

    next.run(request).await
}
