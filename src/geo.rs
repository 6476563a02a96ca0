//! Great-circle geometry: coordinate parsing, haversine distance, and
//! distance ranking of branch lists.
//!
//! Everything here is pure and synchronous so callers can wrap their own
//! caching or cancellation policy around it.

use crate::graph::types::{Branch, RankedBranch};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A validated latitude/longitude pair in degrees.
///
/// Always fully populated — an unknown or malformed location is
/// `Option::<Coordinates>::None`, never a half-filled pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Parse a `"<lat>,<lon>"` string into validated coordinates.
///
/// Upstream data quality is not guaranteed, so malformed input (wrong token
/// count, non-numeric or non-finite values, out-of-range degrees) is a
/// normal outcome: `None`, never an error.
pub fn parse_coordinates(raw: Option<&str>) -> Option<Coordinates> {
    let raw = raw?.trim();
    let mut tokens = raw.split(',');

    let lat: f64 = tokens.next()?.trim().parse().ok()?;
    let lon: f64 = tokens.next()?.trim().parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }

    // f64::from_str accepts "inf" and "NaN", and NaN slips through range
    // comparisons, so finiteness is checked before the ranges.
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return None;
    }

    Some(Coordinates { lat, lon })
}

/// Haversine great-circle distance in miles from `origin` to `dest`.
///
/// `dest` is optional because branch records routinely lack usable
/// coordinates; an unknown destination yields `None`, not zero.
pub fn distance_miles(origin: Coordinates, dest: Option<Coordinates>) -> Option<f64> {
    let dest = dest?;

    let d_lat = (dest.lat - origin.lat).to_radians();
    let d_lon = (dest.lon - origin.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + origin.lat.to_radians().cos() * dest.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // atan2 keeps the result defined when floating point pushes `a` just
    // past 0 or 1 at identical or antipodal points.
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Some(EARTH_RADIUS_MILES * c)
}

/// Attach distances from `origin` and order a branch list closest-first.
///
/// Branches without usable coordinates are never dropped: they keep their
/// relative order and move to the tail. Ties in the sorted group also keep
/// input order (`sort_by` is stable). With no origin the list passes
/// through untouched, with no distances attached.
pub fn rank_by_distance(origin: Option<Coordinates>, branches: Vec<Branch>) -> Vec<RankedBranch> {
    let Some(origin) = origin else {
        return branches
            .into_iter()
            .map(|branch| RankedBranch { branch, distance_miles: None })
            .collect();
    };

    let mut near = Vec::with_capacity(branches.len());
    let mut unknown = Vec::new();

    for branch in branches {
        match distance_miles(origin, branch.coordinates) {
            Some(d) => near.push(RankedBranch { branch, distance_miles: Some(d) }),
            None => unknown.push(RankedBranch { branch, distance_miles: None }),
        }
    }

    near.sort_by(|a, b| {
        a.distance_miles
            .partial_cmp(&b.distance_miles)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    near.extend(unknown);
    near
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NYC: Coordinates = Coordinates { lat: 40.7128, lon: -74.0060 };
    const LA: Coordinates = Coordinates { lat: 34.0522, lon: -118.2437 };

    fn branch(id: &str, coordinates: Option<Coordinates>) -> Branch {
        Branch {
            id: id.into(),
            name: id.into(),
            street: None,
            city: None,
            zip_code: None,
            country: None,
            country_code: None,
            phone: None,
            email: None,
            coordinates,
        }
    }

    #[test]
    fn test_parse_valid() {
        let c = parse_coordinates(Some("40.0,-75.0")).unwrap();
        assert_relative_eq!(c.lat, 40.0);
        assert_relative_eq!(c.lon, -75.0);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let c = parse_coordinates(Some("  59.3293 , 18.0686  ")).unwrap();
        assert!((c.lat - 59.3293).abs() < 1e-9);
        assert!((c.lon - 18.0686).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_coordinates(Some("bad")).is_none());
        assert!(parse_coordinates(Some("")).is_none());
        assert!(parse_coordinates(Some("40.0")).is_none());
        assert!(parse_coordinates(Some("1,2,3")).is_none());
        assert!(parse_coordinates(Some("40.0,")).is_none());
        assert!(parse_coordinates(None).is_none());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_coordinates(Some("200,0")).is_none());
        assert!(parse_coordinates(Some("-91,0")).is_none());
        assert!(parse_coordinates(Some("0,181")).is_none());
        assert!(parse_coordinates(Some("0,-180.5")).is_none());
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(parse_coordinates(Some("NaN,0")).is_none());
        assert!(parse_coordinates(Some("inf,0")).is_none());
        assert!(parse_coordinates(Some("0,-inf")).is_none());
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let d = distance_miles(NYC, Some(NYC)).unwrap();
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_distance_nyc_to_la() {
        // Known great-circle distance: ~2445 miles.
        let d = distance_miles(NYC, Some(LA)).unwrap();
        assert!((d - 2445.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_distance_symmetric() {
        let there = distance_miles(NYC, Some(LA)).unwrap();
        let back = distance_miles(LA, Some(NYC)).unwrap();
        assert_relative_eq!(there, back, max_relative = 1e-12);
    }

    #[test]
    fn test_distance_unknown_destination() {
        assert!(distance_miles(NYC, None).is_none());
    }

    #[test]
    fn test_rank_no_origin_passthrough() {
        let input = vec![branch("a", Some(LA)), branch("b", None), branch("c", Some(NYC))];
        let ranked = rank_by_distance(None, input);

        let ids: Vec<&str> = ranked.iter().map(|r| r.branch.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(ranked.iter().all(|r| r.distance_miles.is_none()));
    }

    #[test]
    fn test_rank_partitions_and_sorts() {
        // a and d lack coordinates; b is close to the origin, c is far.
        let input = vec![
            branch("a", None),
            branch("b", Some(Coordinates { lat: 40.8, lon: -74.1 })),
            branch("c", Some(LA)),
            branch("d", None),
        ];
        let ranked = rank_by_distance(Some(NYC), input);

        let ids: Vec<&str> = ranked.iter().map(|r| r.branch.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a", "d"]);
        assert!(ranked[0].distance_miles.unwrap() < ranked[1].distance_miles.unwrap());
        assert!(ranked[2].distance_miles.is_none());
        assert!(ranked[3].distance_miles.is_none());
    }

    #[test]
    fn test_rank_keeps_every_branch() {
        let input = vec![
            branch("a", Some(NYC)),
            branch("b", None),
            branch("c", Some(LA)),
            branch("d", None),
            branch("e", Some(Coordinates { lat: 0.0, lon: 0.0 })),
        ];
        let n = input.len();
        let ranked = rank_by_distance(Some(LA), input);
        assert_eq!(ranked.len(), n);

        let mut ids: Vec<&str> = ranked.iter().map(|r| r.branch.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let spot = Coordinates { lat: 10.0, lon: 10.0 };
        let input = vec![branch("first", Some(spot)), branch("second", Some(spot))];
        let ranked = rank_by_distance(Some(NYC), input);

        assert_eq!(ranked[0].branch.id, "first");
        assert_eq!(ranked[1].branch.id, "second");
    }

    #[test]
    fn test_rank_empty_list() {
        assert!(rank_by_distance(Some(NYC), Vec::new()).is_empty());
    }

    #[test]
    fn test_rank_all_unknown_preserves_order() {
        let input = vec![branch("x", None), branch("y", None), branch("z", None)];
        let ranked = rank_by_distance(Some(NYC), input);

        let ids: Vec<&str> = ranked.iter().map(|r| r.branch.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert!(ranked.iter().all(|r| r.distance_miles.is_none()));
    }
}
