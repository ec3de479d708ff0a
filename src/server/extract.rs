use super::types::ErrorResponse;
use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::warn;

/// `Json` extractor that answers schema failures with `{"detail": ...}`.
///
/// Missing fields and type mismatches come back as 422, malformed JSON as
/// 400 and a missing JSON content type as 415. The handler never runs for
/// a rejected body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let status = rejection.status();
                let detail = rejection.body_text();
                warn!("Rejected request body ({}): {}", status, detail);
                Err((status, Json(ErrorResponse { detail })))
            }
        }
    }
}

