//! OpenAPI documentation and schema generation
//!
//! Generated at compile time with utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the cinesphere REST API
///
/// Served at `/api/openapi.json`; the Swagger UI (when enabled) lives at
/// `/api/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "cinesphere REST API",
        version = "0.2.0",
        description = "Browse a OneDrive media library and download folders of videos as zip archives",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        crate::api::routes::browse,
        crate::api::routes::download,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::LibraryItem,
        crate::types::FolderEntry,
        crate::types::VideoEntry,
        crate::types::BrowseResponse,
        crate::api::routes::PathQuery,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "library", description = "Folder listing and downloads"),
        (name = "system", description = "Health and API documentation")
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in ["/api/browse", "/api/download", "/api/health", "/api/openapi.json"] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }

    #[test]
    fn document_serializes_with_schemas() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &json["components"]["schemas"];
        assert!(schemas.get("LibraryItem").is_some());
        assert!(schemas.get("ApiError").is_some());
    }
}
