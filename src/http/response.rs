//! Status document rendering.
//!
//! # Design Decisions
//! - Status code is chosen from the snapshot verdict, never from the body
//! - No snapshot yet means unhealthy with a "not yet evaluated" detail
//! - A serialization failure degrades to a minimal fallback document rather
//!   than an error response from the framework

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{AggregateSnapshot, ResultSet};
use crate::error::ConfigurationError;

pub const NOT_YET_EVALUATED: &str = "not yet evaluated";

/// The two configurable response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodes {
    pub healthy: StatusCode,
    pub unhealthy: StatusCode,
}

impl StatusCodes {
    pub fn from_config(ok_status: u16, nok_status: u16) -> Result<Self, ConfigurationError> {
        let parse = |field: &str, code: u16| {
            StatusCode::from_u16(code).map_err(|_| ConfigurationError::InvalidStatusCode {
                field: field.to_string(),
                code,
            })
        };
        Ok(Self {
            healthy: parse("ok_status", ok_status)?,
            unhealthy: parse("nok_status", nok_status)?,
        })
    }

    pub fn for_health(&self, healthy: bool) -> StatusCode {
        if healthy {
            self.healthy
        } else {
            self.unhealthy
        }
    }
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            healthy: StatusCode::OK,
            unhealthy: StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Body served by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDocument {
    pub overall_healthy: bool,
    #[serde(default)]
    pub cycle: Option<u64>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub results: ResultSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StatusDocument {
    pub fn not_yet_evaluated() -> Self {
        Self {
            overall_healthy: false,
            cycle: None,
            started_at: None,
            generated_at: None,
            results: ResultSet::default(),
            detail: Some(NOT_YET_EVALUATED.to_string()),
        }
    }

    pub fn from_snapshot(snapshot: &AggregateSnapshot) -> Self {
        Self {
            overall_healthy: snapshot.overall_healthy,
            cycle: Some(snapshot.cycle),
            started_at: Some(snapshot.started_at),
            generated_at: Some(snapshot.generated_at),
            results: snapshot.results.clone(),
            detail: None,
        }
    }
}

/// Build the status response for the latest snapshot, if any.
pub fn render(snapshot: Option<&AggregateSnapshot>, codes: &StatusCodes) -> Response {
    let (status, document) = match snapshot {
        Some(snapshot) => (
            codes.for_health(snapshot.overall_healthy),
            StatusDocument::from_snapshot(snapshot),
        ),
        None => (codes.unhealthy, StatusDocument::not_yet_evaluated()),
    };
    encode(status, &document, codes)
}

fn encode<T: Serialize>(status: StatusCode, document: &T, codes: &StatusCodes) -> Response {
    match serde_json::to_vec(document) {
        Ok(body) => json_response(status, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize status document");
            let fallback = serde_json::json!({
                "overall_healthy": false,
                "results": [],
                "detail": format!("serialization failed: {e}"),
            });
            json_response(codes.unhealthy, fallback.to_string().into_bytes())
        }
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
