use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use nearby_core::Coordinates;
use nearby_geocode::{DistanceEstimate, GeocodeResult, TravelMode};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_geocode_error, parse_body, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReverseGeocodeRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DistanceRequest {
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
    pub mode: Option<String>,
}

fn required(req_id: &str, field: &str, value: Option<f64>) -> Result<f64, ApiError> {
    value.ok_or_else(|| ApiError::validation(req_id, field, format!("{field} is required")))
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GeocodeResult>>, ApiError> {
    let request = parse_body(&req_id.0, body)?;

    let result = state
        .geocoder
        .geocode(&request.address)
        .await
        .map_err(|e| map_geocode_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, result)))
}

pub(super) async fn reverse_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ReverseGeocodeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GeocodeResult>>, ApiError> {
    let request = parse_body(&req_id.0, body)?;
    let latitude = required(&req_id.0, "latitude", request.latitude)?;
    let longitude = required(&req_id.0, "longitude", request.longitude)?;

    let result = state
        .geocoder
        .reverse_geocode(latitude, longitude)
        .await
        .map_err(|e| map_geocode_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, result)))
}

pub(super) async fn distance(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<DistanceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DistanceEstimate>>, ApiError> {
    let request = parse_body(&req_id.0, body)?;
    let from = Coordinates::new(
        required(&req_id.0, "fromLat", request.from_lat)?,
        required(&req_id.0, "fromLon", request.from_lon)?,
    );
    let to = Coordinates::new(
        required(&req_id.0, "toLat", request.to_lat)?,
        required(&req_id.0, "toLon", request.to_lon)?,
    );
    let mode = match request.mode.as_deref() {
        None => TravelMode::default(),
        Some(raw) => TravelMode::parse(raw).ok_or_else(|| {
            ApiError::validation(
                &req_id.0,
                "mode",
                format!("unsupported travel mode: {raw}"),
            )
        })?,
    };

    let estimate = state
        .geocoder
        .distance_between(from, to, mode)
        .await
        .map_err(|e| map_geocode_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, estimate)))
}
