//! Normalization of raw upstream records into canonical shapes.
//!
//! The upstream schema is loosely typed: every field can be absent. Each
//! field gets an explicit default here so nulls never leak past this module.

use super::types::Branch;
use crate::geo;
use serde::Deserialize;

/// A branch record exactly as the upstream returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranch {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Street", default)]
    pub street: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "ZipCode", default)]
    pub zip_code: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "CountryCode", default)]
    pub country_code: Option<String>,
    #[serde(rename = "Phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Coordinates", default)]
    pub coordinates: Option<String>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Option<RawMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub key: Option<String>,
}

/// The slimmer record shape used when only country fields are queried.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountryItem {
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "CountryCode", default)]
    pub country_code: Option<String>,
}

/// Map a raw upstream record to a canonical `Branch`.
///
/// The id falls back to `"<name>-<zip>"` when there is no metadata key.
/// That composite is not guaranteed unique; collisions are a documented
/// upstream data risk, not something to repair here.
pub fn map_branch(raw: RawBranch) -> Branch {
    let id = match raw.metadata.as_ref().and_then(|m| m.key.clone()) {
        Some(key) => key,
        None => format!(
            "{}-{}",
            raw.name.as_deref().unwrap_or("branch"),
            raw.zip_code.as_deref().unwrap_or(""),
        ),
    };

    let coordinates = geo::parse_coordinates(raw.coordinates.as_deref());

    Branch {
        id,
        name: raw.name.unwrap_or_default(),
        street: raw.street,
        city: raw.city,
        zip_code: raw.zip_code,
        country: raw.country,
        country_code: raw.country_code,
        phone: raw.phone,
        email: raw.email,
        coordinates,
    }
}

/// Derive a stable uppercase slug from a country name, for records with no
/// ISO code: runs of non-alphanumerics collapse to single underscores,
/// leading and trailing underscores are trimmed.
pub fn country_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.to_uppercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            slug.push(c);
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: Option<&str>, zip: Option<&str>, key: Option<&str>) -> RawBranch {
        RawBranch {
            name: name.map(String::from),
            street: None,
            city: None,
            zip_code: zip.map(String::from),
            country: None,
            country_code: None,
            phone: None,
            email: None,
            coordinates: None,
            metadata: key.map(|k| RawMetadata { key: Some(k.into()) }),
        }
    }

    #[test]
    fn test_map_branch_uses_metadata_key() {
        let b = map_branch(raw(Some("Tampa Midtown"), Some("33607"), Some("abc123")));
        assert_eq!(b.id, "abc123");
        assert_eq!(b.name, "Tampa Midtown");
    }

    #[test]
    fn test_map_branch_id_fallback() {
        let b = map_branch(raw(Some("Tampa Midtown"), Some("33607"), None));
        assert_eq!(b.id, "Tampa Midtown-33607");
    }

    #[test]
    fn test_map_branch_id_fallback_missing_fields() {
        let b = map_branch(raw(None, None, None));
        assert_eq!(b.id, "branch-");
        assert_eq!(b.name, "");
    }

    #[test]
    fn test_map_branch_parses_coordinates() {
        let mut r = raw(Some("HQ"), None, Some("k"));
        r.coordinates = Some("40.7128,-74.0060".into());
        let b = map_branch(r);
        let c = b.coordinates.unwrap();
        assert!((c.lat - 40.7128).abs() < 1e-9);

        let mut r = raw(Some("HQ"), None, Some("k"));
        r.coordinates = Some("not-a-coordinate".into());
        assert!(map_branch(r).coordinates.is_none());
    }

    #[test]
    fn test_map_branch_keeps_optional_fields_absent() {
        let b = map_branch(raw(Some("HQ"), None, Some("k")));
        assert!(b.street.is_none());
        assert!(b.phone.is_none());
        assert!(b.email.is_none());
    }

    #[test]
    fn test_country_slug() {
        assert_eq!(country_slug("United States"), "UNITED_STATES");
        assert_eq!(country_slug("usa"), "USA");
        assert_eq!(country_slug("Bosnia & Herzegovina"), "BOSNIA_HERZEGOVINA");
        assert_eq!(country_slug("  Sweden  "), "SWEDEN");
    }

    #[test]
    fn test_country_slug_non_ascii_collapses() {
        // Uppercased non-ASCII letters are outside A-Z0-9 and become
        // separators, matching the code derivation rule.
        assert_eq!(country_slug("Côte d'Ivoire"), "C_TE_D_IVOIRE");
    }

    #[test]
    fn test_country_slug_degenerate() {
        assert_eq!(country_slug("---"), "");
        assert_eq!(country_slug(""), "");
    }
}
