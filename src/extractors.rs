use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

use crate::response::AppError;

/// `axum::Json<T>` wrapper that rejects with our JSON `AppError` envelope
/// instead of Axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                let detail = match &rejection {
                    JsonRejection::JsonDataError(e) => format!("data error: {e}"),
                    JsonRejection::JsonSyntaxError(e) => format!("syntax error: {e}"),
                    JsonRejection::MissingJsonContentType(e) => format!("content type: {e}"),
                    JsonRejection::BytesRejection(e) => format!("body read: {e}"),
                    other => format!("rejection: {other}"),
                };
                tracing::warn!(error = %detail, "Invalid JSON request body");
                Err(AppError::bad_request(
                    "INVALID_REQUEST_BODY",
                    "Request body is not valid JSON for this endpoint",
                ))
            }
        }
    }
}

// Allow destructuring like `JsonBody(req)` in handler parameters
impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: serde::Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}
