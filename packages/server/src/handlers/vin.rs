use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::DecodedVin;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::ApiToken;
use crate::models::vin::VinResponse;
use crate::services::vin_cache::VinCacheService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/decode/{vin}",
    tag = "VIN",
    operation_id = "decodeVin",
    summary = "Decode a VIN",
    description = "Returns the cached record for the VIN. On first sight the VIN is decoded structurally, enriched from the vehicle registry and stored with every registry attribute. Later calls never contact the registry.",
    params(("vin" = String, Path, description = "17-character VIN, case-insensitive")),
    responses(
        (status = 200, description = "Decoded VIN", body = VinResponse),
        (status = 400, description = "VIN is not 17 characters (INVALID_VIN_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Registry failed (REGISTRY_UNAVAILABLE)", body = ErrorBody),
        (status = 504, description = "Registry timed out (REGISTRY_TIMEOUT)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth), fields(vin = %vin))]
pub async fn decode_vin(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<VinResponse>, AppError> {
    let lookup = VinCacheService::new(&state.db, state.registry())
        .decode(&vin)
        .await?;
    Ok(Json(VinResponse::from(lookup)))
}

#[utoipa::path(
    get,
    path = "/decode/{vin}/structure",
    tag = "VIN",
    operation_id = "decodeVinStructure",
    summary = "Structural decode only",
    description = "Splits the VIN into WMI/VDS/VIS, verifies the check digit and maps the model year and make locally. Touches neither storage nor the registry.",
    params(("vin" = String, Path, description = "17-character VIN, case-insensitive")),
    responses(
        (status = 200, description = "Structural decode", body = DecodedVin),
        (status = 400, description = "VIN is not 17 characters (INVALID_VIN_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(_auth), fields(vin = %vin))]
pub async fn decode_structure(
    _auth: ApiToken,
    Path(vin): Path<String>,
) -> Result<Json<DecodedVin>, AppError> {
    let decoded = VinCacheService::<sea_orm::DatabaseConnection>::structural(&vin)?;
    Ok(Json(decoded))
}

#[utoipa::path(
    delete,
    path = "/vins/{vin}",
    tag = "VIN",
    operation_id = "deleteVin",
    summary = "Delete a cached VIN",
    description = "Removes the VIN record together with its registry attributes and images. The next decode repopulates it from the registry.",
    params(("vin" = String, Path, description = "VIN, case-insensitive")),
    responses(
        (status = 204, description = "VIN deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "VIN not cached (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth), fields(vin = %vin))]
pub async fn delete_vin(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<StatusCode, AppError> {
    VinCacheService::new(&state.db, None).delete(&vin).await?;
    Ok(StatusCode::NO_CONTENT)
}
