use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use custodia_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves HTTP Basic credentials to a principal stored as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let (name, password) = basic_credentials(request.headers())?;
    let principal = state
        .authentication_service
        .authenticate(name.as_str(), password.as_str())
        .await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?
        .to_str()
        .map_err(|_| malformed_credentials())?;

    let (scheme, encoded) = value.split_once(' ').ok_or_else(malformed_credentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AppError::Unauthorized(
            "only basic authentication is supported".to_owned(),
        ));
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| malformed_credentials())?;
    let decoded = String::from_utf8(decoded).map_err(|_| malformed_credentials())?;
    let (name, password) = decoded.split_once(':').ok_or_else(malformed_credentials)?;

    Ok((name.to_owned(), password.to_owned()))
}

fn malformed_credentials() -> AppError {
    AppError::Unauthorized("malformed basic credentials".to_owned())
}
