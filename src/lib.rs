//! # cinesphere
//!
//! Backend for a personal streaming library kept in a OneDrive folder.
//!
//! The library is whatever folder tree lives under one root folder of a
//! user's drive: categories, series and seasons as folders, videos as files,
//! and cover/poster art as plain images next to them. cinesphere reads that
//! tree through Microsoft Graph and serves it as JSON cards, and can zip a
//! whole folder of videos on the fly.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cinesphere::{Config, Library};
//! use cinesphere::api::{AppState, start_api_server};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     config.validate()?;
//!
//!     let library = Library::from_config(&config)?;
//!     let state = AppState::new(Arc::new(library), Arc::new(config));
//!
//!     start_api_server(state, cinesphere::wait_for_signal()).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Streaming zip downloads
pub mod archive;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Microsoft Graph drive access
pub mod graph;
/// Library browsing
pub mod library;
/// File classification and name matching
pub mod media;
/// Retry logic with exponential backoff
pub mod retry;
/// API-facing types
pub mod types;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::Config;
pub use error::{Error, Result};
pub use graph::{DriveItem, DriveProvider, GraphClient};
pub use library::{Library, LibraryPath};
pub use types::{BrowseResponse, FolderEntry, LibraryItem, VideoEntry};

/// Wait for SIGTERM or SIGINT (Ctrl+C elsewhere)
///
/// Handy as the shutdown future for [`api::start_api_server`].
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (term, int) => {
            if let Err(e) = term.as_ref().and(int.as_ref()) {
                tracing::warn!(
                    error = %e,
                    "Could not register signal handlers, using ctrl_c fallback"
                );
            }
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received Ctrl+C");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
        _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
    }
}

/// Wait for Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
