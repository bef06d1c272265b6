//! Library handlers: browse and download.

use super::PathQuery;
use crate::api::AppState;
use crate::archive::content_disposition;
use crate::error::Result;
use crate::library::LibraryPath;
use crate::types::BrowseResponse;
use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

/// GET /browse - List a library folder
#[utoipa::path(
    get,
    path = "/api/browse",
    tag = "library",
    params(PathQuery),
    responses(
        (status = 200, description = "Folders (with covers) then videos (with posters)", body = BrowseResponse),
        (status = 400, description = "Path escapes the library root", body = crate::error::ApiError),
        (status = 404, description = "Folder not found", body = crate::error::ApiError),
        (status = 502, description = "Cloud drive error", body = crate::error::ApiError)
    )
)]
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<BrowseResponse>> {
    let path = LibraryPath::parse(query.path.as_deref().unwrap_or_default())?;
    let items = state.library.browse(&path).await?;
    Ok(Json(BrowseResponse { items }))
}

/// GET /download - Zip every video below a folder
#[utoipa::path(
    get,
    path = "/api/download",
    tag = "library",
    params(PathQuery),
    responses(
        (status = 200, description = "Streaming zip archive (application/zip)"),
        (status = 400, description = "Path escapes the library root", body = crate::error::ApiError),
        (status = 404, description = "Folder not found", body = crate::error::ApiError),
        (status = 502, description = "Cloud drive error", body = crate::error::ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Response> {
    let path = LibraryPath::parse(query.path.as_deref().unwrap_or_default())?;
    let archive = state.library.download(&path).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&archive.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"videos.zip\""));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/zip")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(archive.stream),
    )
        .into_response())
}
