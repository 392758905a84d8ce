use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use nearby_search::{SearchRequest, SearchResponse};

use crate::middleware::RequestId;

use super::{map_search_error, parse_body, ApiError, ApiResponse, AppState};

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let request = parse_body(&req_id.0, body)?;

    let response = state
        .engine
        .search(&request)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, response)))
}
