#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transport client for the RLIS analysis service.
//!
//! Three calls are exposed through the [`OpsApi`] trait:
//!
//! | Call | Method | Path |
//! |---|---|---|
//! | list locations | `GET` | `/locations` |
//! | list incidents | `GET` | `/incidents` |
//! | submit log | `POST` | `/predict` |
//!
//! Implementors provide the fallible `fetch_*`/[`OpsApi::classify`]
//! methods. The provided `list_*`/[`OpsApi::submit_log`] methods never
//! fail: any transport error, non-2xx status or malformed body is logged
//! and collapsed to an empty list or `None`.
//!
//! No retries or timeouts are applied at this layer.

pub mod http;

use rlis_ops_models::{ClassificationResult, Incident, Location};
use thiserror::Error;

pub use http::OpsClient;

/// Errors from calls to the analysis service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS,
    /// reset, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network / transport failure.
    Transport,
    /// Non-success HTTP status.
    Status,
    /// Unparseable body.
    Malformed,
}

impl ClientError {
    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http(e) if e.is_decode() => FailureKind::Malformed,
            Self::Http(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Status,
            Self::Json(_) => FailureKind::Malformed,
        }
    }
}

/// The analysis service as seen by the dashboard.
#[async_trait::async_trait]
pub trait OpsApi: Send + Sync {
    /// Fetches every network node.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request, status or body is bad.
    async fn fetch_locations(&self) -> Result<Vec<Location>, ClientError>;

    /// Fetches the stored incident history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request, status or body is bad.
    async fn fetch_incidents(&self) -> Result<Vec<Incident>, ClientError>;

    /// Submits a raw driver log for classification.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request, status or body is bad.
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClientError>;

    /// Lists network nodes, returning an empty list on any failure.
    async fn list_locations(&self) -> Vec<Location> {
        self.fetch_locations().await.unwrap_or_else(|e| {
            log::error!("Error fetching locations: {e}");
            Vec::new()
        })
    }

    /// Lists stored incidents, returning an empty list on any failure.
    async fn list_incidents(&self) -> Vec<Incident> {
        self.fetch_incidents().await.unwrap_or_else(|e| {
            log::error!("Error fetching incidents: {e}");
            Vec::new()
        })
    }

    /// Submits a log for analysis, returning `None` on any failure.
    async fn submit_log(&self, text: &str) -> Option<ClassificationResult> {
        match self.classify(text).await {
            Ok(result) => Some(result),
            Err(e) => {
                log::error!("Error analyzing log: {e}");
                None
            }
        }
    }
}
