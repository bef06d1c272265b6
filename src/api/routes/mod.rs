//! Route handlers for the REST API
//!
//! - [`library`]: folder listing and zip downloads
//! - [`system`]: health and OpenAPI

use serde::{Deserialize, Serialize};

mod library;
mod system;

pub use library::*;
pub use system::*;

/// Query parameters for `GET /browse` and `GET /download`
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PathQuery {
    /// Folder path relative to the library root, e.g. `Movies/Bollywood`
    /// (empty or absent for the root)
    pub path: Option<String>,
}
