use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("infra error: {0}")]
    Infra(#[from] vpn_infra::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Credential file problems are ours, upstream API problems
            // are the gateway's.
            ApiError::Infra(vpn_infra::Error::Store(_) | vpn_infra::Error::Encode(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Infra(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
