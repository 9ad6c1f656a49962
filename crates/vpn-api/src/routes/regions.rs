use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;

use do_api::DoClient;

use crate::dto::RegionsResponse;
use crate::error::ApiError;
use crate::routes::status::StatusQuery;
use crate::routes::{header_value, present};
use crate::state::AppState;

/// GET /regions
///
/// Available regions for the location picker.
pub async fn list_regions(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
    headers: HeaderMap,
) -> Result<Json<RegionsResponse>, ApiError> {
    let stored = state.store.load().await;

    let token = present(header_value(&headers, "x-do-token"))
        .or(present(query.token))
        .or(stored.do_token)
        .ok_or_else(|| ApiError::Unauthorized("DigitalOcean token is required".into()))?;

    let compute = DoClient::new(token);
    let regions = compute.list_regions().await.map_err(vpn_infra::Error::from)?;

    Ok(Json(RegionsResponse { regions }))
}
