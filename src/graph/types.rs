//! Core types for the branch directory.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single physical service location.
///
/// Branches are immutable snapshots rebuilt on every fetch; the directory
/// is read-only and nothing is updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Upstream metadata key, or `"<name>-<zip>"` when the upstream has
    /// none. The fallback can collide for branches sharing name and zip.
    pub id: String,
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// A country derived from branch records, never stored upstream.
///
/// `code` is the upstream ISO alpha-2 code when present, else an uppercase
/// slug of the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// A branch augmented with its distance from a caller-supplied origin.
///
/// `distance_miles` is present iff an origin was supplied and the branch
/// had valid coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedBranch {
    #[serde(flatten)]
    pub branch: Branch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

/// Failures surfaced by the upstream graph. One failure per operation;
/// nothing here is fatal to the process and nothing is retried.
#[derive(Debug)]
pub enum GraphError {
    Network(String),
    /// Non-success status or a populated `errors` array; carries the
    /// upstream messages joined with "; ".
    Api(String),
    InvalidResponse(String),
    /// HTTP success but no `data` object in the envelope.
    MissingData,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Api(msg) => write!(f, "Graph error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid graph response: {}", msg),
            Self::MissingData => write!(f, "Missing data in graph response"),
        }
    }
}

impl std::error::Error for GraphError {}
