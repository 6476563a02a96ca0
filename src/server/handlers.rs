use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::geo::{self, Coordinates};
use crate::graph::client::DEFAULT_LIMIT;
use crate::graph::{Branch, Country, RankedBranch};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// Upstream failures stay scoped to the one request that hit them.
fn gateway_error(e: crate::graph::GraphError) -> ApiError {
    api_error(StatusCode::BAD_GATEWAY, e.to_string())
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── POST /api/graph ─────────────────────────────────────────────

/// The proxy boundary: forward the body upstream with the credential
/// injected server-side, and return the upstream response with its
/// original status, verbatim.
pub async fn graph_proxy(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    if !body.is_object() {
        return api_error(StatusCode::BAD_REQUEST, "Request body must be a JSON object")
            .into_response();
    }

    match state.client.post_raw(&body) {
        Ok(upstream) => {
            let status =
                StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(upstream.body)).into_response()
        }
        Err(e) => gateway_error(e).into_response(),
    }
}

// ─── GET /api/branches ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct BranchesQuery {
    pub limit: Option<u32>,
    /// Accepted for interface compatibility; the upstream has no offset.
    pub skip: Option<u32>,
}

pub async fn list_branches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BranchesQuery>,
) -> Result<Json<Vec<Branch>>, Response> {
    let start = Instant::now();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let branches = state
        .client
        .fetch_branches(limit, params.skip)
        .map_err(|e| gateway_error(e).into_response())?;

    eprintln!(
        "[{}] GET /api/branches limit={} -> {} rows ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        limit,
        branches.len(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(branches))
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<RankedBranch>>, Response> {
    let start = Instant::now();
    let term = params.q.as_deref().unwrap_or("");
    let origin = origin_from_params(params.lat, params.lon).map_err(IntoResponse::into_response)?;

    let hits = state
        .client
        .search_branches(term, params.limit.unwrap_or(100))
        .map_err(|e| gateway_error(e).into_response())?;
    let ranked = geo::rank_by_distance(origin, hits);

    eprintln!(
        "[{}] GET /api/search q={:?} -> {} rows ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        term,
        ranked.len(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(ranked))
}

// ─── GET /api/countries ──────────────────────────────────────────

pub async fn countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Country>>, Response> {
    let countries = state
        .client
        .fetch_countries()
        .map_err(|e| gateway_error(e).into_response())?;
    Ok(Json(countries))
}

// ─── GET /api/countries/{code}/branches ──────────────────────────

#[derive(Deserialize)]
pub struct CountryBranchesQuery {
    pub limit: Option<u32>,
}

/// The country page navigates by code, but the upstream only filters by
/// name, so the code is resolved through the derived country list first.
pub async fn country_branches(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(params): Query<CountryBranchesQuery>,
) -> Result<Json<Vec<Branch>>, Response> {
    let countries = state
        .client
        .fetch_countries()
        .map_err(|e| gateway_error(e).into_response())?;

    let name = countries
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(&code))
        .map(|c| c.name.clone())
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("Unknown country code '{}'", code),
            )
            .into_response()
        })?;

    let branches = state
        .client
        .fetch_branches_by_country(&name, params.limit.unwrap_or(100))
        .map_err(|e| gateway_error(e).into_response())?;

    Ok(Json(branches))
}

// ─── GET /api/nearest ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearestQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub limit: Option<usize>,
    pub fetch_limit: Option<u32>,
}

pub async fn nearest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestQuery>,
) -> Result<Json<Vec<RankedBranch>>, Response> {
    let start = Instant::now();

    let origin = origin_from_params(params.lat, params.lon)
        .map_err(IntoResponse::into_response)?
        .ok_or_else(|| {
            api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters")
                .into_response()
        })?;

    let ranked = state
        .client
        .nearest_branches(
            origin,
            params.limit.unwrap_or(10),
            params.fetch_limit.unwrap_or(100),
        )
        .map_err(|e| gateway_error(e).into_response())?;

    eprintln!(
        "[{}] GET /api/nearest lat={:.4} lon={:.4} -> {} rows ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        origin.lat,
        origin.lon,
        ranked.len(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(ranked))
}

// ─── Helpers ─────────────────────────────────────────────────────

fn origin_from_params(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Coordinates>, ApiError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "Invalid coordinates. Lat: -90..90, Lon: -180..180",
                ));
            }
            Ok(Some(Coordinates { lat, lon }))
        }
        _ => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Provide both 'lat' and 'lon', or neither",
        )),
    }
}
