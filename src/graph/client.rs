//! Graph client: fixed queries through the proxy boundary, plus the
//! client-side filtering the upstream schema cannot do for us.
//!
//! The upstream exposes no `where` input for country or free-text fields,
//! so search and country filtering fetch a window of records and scan them
//! locally. That limitation is deliberate and documented, not worked around.

use super::normalize::{country_slug, map_branch, RawBranch, RawCountryItem};
use super::types::{Branch, Country, GraphError, RankedBranch};
use crate::geo::{self, Coordinates};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Default upstream content graph endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://cg.optimizely.com/content/v2";

/// The upstream enforces a 0..=100 window on `limit`.
const MAX_LIMIT: u32 = 100;

/// Default page size when the caller does not care.
pub const DEFAULT_LIMIT: u32 = 50;

fn clamp_limit(limit: u32) -> u32 {
    limit.min(MAX_LIMIT)
}

// ─── Queries ─────────────────────────────────────────────────────

const QUERY_BRANCHES: &str = r#"
query GetBranches($limit: Int!) {
  Branch(limit: $limit) {
    items {
      Name
      Street
      City
      ZipCode
      Country
      CountryCode
      Phone
      Email
      Coordinates
      _metadata { key }
    }
  }
}
"#;

const QUERY_COUNTRIES: &str = r#"
query GetCountries($limit: Int!) {
  Branch(limit: $limit) {
    items { Country CountryCode }
  }
}
"#;

// ─── Transport ───────────────────────────────────────────────────

/// An upstream HTTP response before any GraphQL-level interpretation.
/// The proxy route forwards this verbatim; `post_graph` inspects it.
#[derive(Debug, Clone)]
pub struct GraphHttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Raw JSON transport to the upstream endpoint.
///
/// The one production implementation speaks HTTP via ureq; tests
/// substitute a canned transport so nothing touches the network.
pub trait GraphTransport {
    /// POST a `{query, variables}` body and return the raw payload.
    fn post(&self, body: &Value) -> Result<GraphHttpResponse, GraphError>;
}

/// HTTP transport that injects the server-held credential as the `auth`
/// query parameter. The credential never appears in any response or log.
pub struct UreqTransport {
    endpoint: String,
    auth: String,
}

impl UreqTransport {
    pub fn new(endpoint: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth: auth.into(),
        }
    }
}

impl GraphTransport for UreqTransport {
    fn post(&self, body: &Value) -> Result<GraphHttpResponse, GraphError> {
        let url = format!("{}?auth={}", self.endpoint, urlencode(&self.auth));

        let result = ureq::post(&url)
            .set("Content-Type", "application/json")
            .set("User-Agent", "BranchBeacon/0.3 (branch-locator)")
            .timeout(Duration::from_secs(12))
            .send_json(body);

        // Non-2xx still carries a response body worth surfacing upstream;
        // only transport-level failures become Network errors.
        let response = match result {
            Ok(r) => r,
            Err(ureq::Error::Status(_, r)) => r,
            Err(e) => return Err(GraphError::Network(e.to_string())),
        };

        let status = response.status();
        let body = response
            .into_json()
            .map_err(|e| GraphError::InvalidResponse(e.to_string()))?;

        Ok(GraphHttpResponse { status, body })
    }
}

// ─── Client ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphMessage>,
}

#[derive(Deserialize)]
struct GraphMessage {
    #[serde(default)]
    message: String,
}

/// Stateless client over the upstream graph. One outbound call per
/// operation, awaited to completion; callers that want last-request-wins
/// cancellation simply discard stale results.
pub struct GraphClient {
    transport: Box<dyn GraphTransport + Send + Sync>,
}

impl GraphClient {
    pub fn new(endpoint: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            transport: Box::new(UreqTransport::new(endpoint, auth)),
        }
    }

    /// Build a client over a custom transport (for testing).
    pub fn with_transport(transport: Box<dyn GraphTransport + Send + Sync>) -> Self {
        Self { transport }
    }

    /// Forward a raw request body and return the upstream response as-is.
    /// Used by the proxy route; no GraphQL-level checks happen here.
    pub fn post_raw(&self, body: &Value) -> Result<GraphHttpResponse, GraphError> {
        self.transport.post(body)
    }

    /// POST a query and unwrap the GraphQL envelope. Non-success status or
    /// a populated `errors` array is a single reportable failure; partial
    /// data is never returned.
    fn post_graph(&self, query: &str, variables: Value) -> Result<Value, GraphError> {
        let body = json!({ "query": query, "variables": variables });
        let response = self.transport.post(&body)?;

        let envelope: GraphEnvelope = serde_json::from_value(response.body)
            .map_err(|e| GraphError::InvalidResponse(e.to_string()))?;

        if !(200..300).contains(&response.status) || !envelope.errors.is_empty() {
            let msg = if envelope.errors.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                envelope
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            return Err(GraphError::Api(msg));
        }

        envelope.data.ok_or(GraphError::MissingData)
    }

    /// Fetch up to `limit` branches (upstream ceiling 100).
    ///
    /// `_skip` is accepted for interface compatibility but has no effect:
    /// the branch query exposes no offset, so paging past the first window
    /// is an illusion the caller manages. Kept as a documented no-op.
    pub fn fetch_branches(&self, limit: u32, _skip: Option<u32>) -> Result<Vec<Branch>, GraphError> {
        let data = self.post_graph(QUERY_BRANCHES, json!({ "limit": clamp_limit(limit) }))?;
        let raw = branch_items::<RawBranch>(data)?;
        Ok(raw.into_iter().map(map_branch).collect())
    }

    /// Case-insensitive substring search across name, city, zip, country,
    /// country code, and street. An empty or whitespace term is "no
    /// results" and issues no request at all.
    pub fn search_branches(&self, term: &str, limit: u32) -> Result<Vec<Branch>, GraphError> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let all = self.fetch_branches(limit, None)?;
        Ok(all.into_iter().filter(|b| branch_matches(b, &term)).collect())
    }

    /// Branches whose country name equals `country` after trimming and
    /// case-folding both sides. Empty input short-circuits like search.
    pub fn fetch_branches_by_country(
        &self,
        country: &str,
        limit: u32,
    ) -> Result<Vec<Branch>, GraphError> {
        let target = country.trim().to_lowercase();
        if target.is_empty() {
            return Ok(Vec::new());
        }

        let all = self.fetch_branches(limit, None)?;
        Ok(all
            .into_iter()
            .filter(|b| b.country.as_deref().unwrap_or("").trim().to_lowercase() == target)
            .collect())
    }

    /// Derive the country list from a best-effort over-fetch of branch
    /// records: dedupe by code (first-seen name per code wins, conflicting
    /// names under one code are not merged), sorted by name.
    pub fn fetch_countries(&self) -> Result<Vec<Country>, GraphError> {
        // Request well past the ceiling on purpose; the clamp brings it
        // back to the widest window the upstream allows.
        let data = self.post_graph(QUERY_COUNTRIES, json!({ "limit": clamp_limit(1000) }))?;
        let items = branch_items::<RawCountryItem>(data)?;

        let mut countries: Vec<Country> = Vec::new();
        for item in items {
            let name = item.country.as_deref().unwrap_or("").trim().to_string();
            if name.is_empty() {
                continue;
            }

            let code = item
                .country_code
                .as_deref()
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| country_slug(&name));

            if !countries.iter().any(|c| c.code == code) {
                countries.push(Country { code, name });
            }
        }

        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(countries)
    }

    /// Fetch up to `fetch_limit` branches and return the `limit` closest
    /// to `origin`, closest first. Branches without coordinates rank last,
    /// so they only appear when the located ones run out.
    pub fn nearest_branches(
        &self,
        origin: Coordinates,
        limit: usize,
        fetch_limit: u32,
    ) -> Result<Vec<RankedBranch>, GraphError> {
        let branches = self.fetch_branches(fetch_limit, None)?;
        let mut ranked = geo::rank_by_distance(Some(origin), branches);
        ranked.truncate(limit);
        Ok(ranked)
    }
}

/// Pull `data.Branch.items` out of a response, tolerating its absence.
fn branch_items<T: serde::de::DeserializeOwned>(data: Value) -> Result<Vec<T>, GraphError> {
    let items = data
        .pointer("/Branch/items")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(items).map_err(|e| GraphError::InvalidResponse(e.to_string()))
}

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

fn branch_matches(branch: &Branch, term: &str) -> bool {
    branch.name.to_lowercase().contains(term)
        || contains_ci(branch.city.as_deref(), term)
        || contains_ci(branch.zip_code.as_deref(), term)
        || contains_ci(branch.country.as_deref(), term)
        || contains_ci(branch.country_code.as_deref(), term)
        || contains_ci(branch.street.as_deref(), term)
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencode(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '=' => "%3D".to_string(),
            '+' => "%2B".to_string(),
            ',' => "%2C".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => format!("%{:02X}", c as u32),
        })
        .collect()
}
