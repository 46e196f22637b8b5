use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::ApiToken;
use crate::models::image::ImageResponse;
use crate::services::image_store::{ImagePayload, ImageStore, resolve_content_type};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/decode/{vin}/image",
    tag = "Images",
    operation_id = "getLatestImage",
    summary = "Latest image of a VIN",
    description = "Returns the raw bytes of the most recently uploaded image with its stored content type.",
    params(("vin" = String, Path, description = "VIN, case-insensitive")),
    responses(
        (status = 200, description = "Image bytes with the stored content type"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No image for this VIN (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth), fields(vin = %vin))]
pub async fn latest_image(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Response, AppError> {
    let payload = ImageStore::new(&state.db, None).latest(&vin).await?;
    image_response(payload)
}

#[utoipa::path(
    post,
    path = "/vins/{vin}/image",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image for a VIN",
    description = "Stores the multipart field `file` as a new image of the VIN. An unknown VIN is decoded and cached first. The content type comes from the part header, then the filename extension, then defaults to `image/png`.",
    params(("vin" = String, Path, description = "17-character VIN, case-insensitive")),
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 201, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Empty payload or bad VIN (EMPTY_PAYLOAD, INVALID_VIN_LENGTH, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 413, description = "Body exceeds images.max_upload_size (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 502, description = "Registry failed while caching the VIN (REGISTRY_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth, multipart), fields(vin = %vin))]
pub async fn upload_image(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path(vin): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let content_type = resolve_content_type(field.content_type(), field.file_name());
            let data = field.bytes().await?;
            upload = Some((data.to_vec(), content_type));
            break;
        }
    }

    let (data, content_type) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    let summary = ImageStore::new(&state.db, state.registry())
        .upload(&vin, data, &content_type)
        .await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(summary))))
}

#[utoipa::path(
    get,
    path = "/vins/{vin}/images",
    tag = "Images",
    operation_id = "listImages",
    summary = "List images of a VIN",
    description = "Metadata of every image of the VIN, newest first.",
    params(("vin" = String, Path, description = "VIN, case-insensitive")),
    responses(
        (status = 200, description = "Image metadata", body = Vec<ImageResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No images for this VIN (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth), fields(vin = %vin))]
pub async fn list_images(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let images = ImageStore::new(&state.db, None).list(&vin).await?;
    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/vins/{vin}/images/{image_id}",
    tag = "Images",
    operation_id = "getImageById",
    summary = "Image of a VIN by id",
    description = "Returns the raw bytes of the image. The image must belong to the VIN in the path.",
    params(
        ("vin" = String, Path, description = "VIN, case-insensitive"),
        ("image_id" = i32, Path, description = "Image ID"),
    ),
    responses(
        (status = 200, description = "Image bytes with the stored content type"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such image for this VIN (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth), fields(vin = %vin))]
pub async fn get_image(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path((vin, image_id)): Path<(String, i32)>,
) -> Result<Response, AppError> {
    let payload = ImageStore::new(&state.db, None).get(&vin, image_id).await?;
    image_response(payload)
}

#[utoipa::path(
    get,
    path = "/images/make/{make}/model/{model}",
    tag = "Images",
    operation_id = "findImagesByMakeModel",
    summary = "Images by make and model",
    description = "Metadata of images of every cached VIN whose make and model match, case-insensitively. Newest first.",
    params(
        ("make" = String, Path, description = "Vehicle make"),
        ("model" = String, Path, description = "Vehicle model"),
    ),
    responses(
        (status = 200, description = "Image metadata", body = Vec<ImageResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No matching images (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, _auth))]
pub async fn images_by_make_model(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path((make, model)): Path<(String, String)>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let images = ImageStore::new(&state.db, None)
        .find_by_make_model(&make, &model)
        .await?;
    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

/// Body limit layer for the upload route.
pub fn upload_body_limit(max_upload_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_size)
}

fn image_response(payload: ImagePayload) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, payload.content_type)
        .header(header::CONTENT_LENGTH, payload.data.len().to_string())
        .body(Body::from(payload.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
