use crate::services::metrics;
use crate::startup::AppState;
use anyhow::anyhow;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, MatchedPath, Request};
use axum::response::{IntoResponse, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::error::AppError;
use service_core::utils::secrets_match;
use validator::Validate;

/// Body field carrying the shared secret.
pub const CLIENT_SECRET_FIELD: &str = "client_secret";

/// JSON body admitted by the client-secret gate.
///
/// The secret is checked on the raw JSON before the body is decoded into `T`,
/// so a caller without the secret always gets `403`, whatever else is wrong
/// with the payload. Only then is the body decoded (`400` on failure) and
/// validated (`400` with field details).
///
/// A body that is not JSON at all carries no secret and is rejected with `403`.
#[derive(Debug, Clone)]
pub struct Authorized<T>(pub T);

#[async_trait]
impl<T> FromRequest<AppState> for Authorized<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map(|path| path.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());

        // Oversized bodies keep axum's own 413 rejection.
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) if has_secret(&body, state.config.auth.client_secret.expose_secret()) => {
                body
            }
            _ => {
                metrics::record_gate_rejection(&route);
                tracing::warn!(route = %route, "Rejected request without a valid client secret");
                return Err(
                    AppError::Forbidden(anyhow!("client secret mismatch")).into_response(),
                );
            }
        };

        let payload: T = serde_json::from_value(body).map_err(|e| {
            tracing::debug!(route = %route, error = %e, "Request body failed to decode");
            AppError::BadRequest(anyhow!("Invalid request body: {}", e)).into_response()
        })?;

        payload
            .validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(Authorized(payload))
    }
}

fn has_secret(body: &Value, expected: &str) -> bool {
    body.get(CLIENT_SECRET_FIELD)
        .and_then(Value::as_str)
        .is_some_and(|provided| secrets_match(provided, expected))
}
