use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

fn token_matches(presented: Option<&str>, expected: &str) -> bool {
    presented.is_some_and(|token| bool::from(token.as_bytes().ct_eq(expected.as_bytes())))
}

pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.settings.auth_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if !token_matches(presented, expected) {
        warn!(path = %request.uri().path(), "rejected unauthenticated request");
        let err = AppError::Unauthorized;
        state
            .metrics
            .registration_rejections_total
            .with_label_values(&[err.reason()])
            .inc();
        return Err(err);
    }

    Ok(next.run(request).await)
}
