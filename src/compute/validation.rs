//! Validation for geographic coordinates and point sets.

use crate::error::{ClusterError, Result};
use rustc_hash::FxHashSet;
use spatio_cluster_types::point::GeoPoint;

/// Validates a whole point set before it is indexed.
///
/// Every longitude must lie in [-180, 180] and every latitude in [-90, 90],
/// both finite, and ids must be unique. The first offending point is reported
/// with its position and id.
///
/// # Examples
///
/// ```
/// use spatio_cluster::validation::validate_points;
/// use spatio_cluster::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new("a", -74.0, 40.7, ()),
///     GeoPoint::new("b", 999.0, 40.0, ()),
/// ];
/// assert!(validate_points(&points).is_err());
/// ```
pub fn validate_points<P>(points: &[GeoPoint<P>]) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    seen.reserve(points.len());

    for (idx, point) in points.iter().enumerate() {
        let (lon, lat) = (point.longitude(), point.latitude());
        let problem = if !lon.is_finite() || !lat.is_finite() {
            Some("coordinates must be finite")
        } else if !(-180.0..=180.0).contains(&lon) {
            Some("longitude outside [-180, 180]")
        } else if !(-90.0..=90.0).contains(&lat) {
            Some("latitude outside [-90, 90]")
        } else {
            None
        };

        if let Some(problem) = problem {
            return Err(ClusterError::InvalidPoint(format!(
                "point {:?} at index {}: {} ({}, {})",
                point.id, idx, problem, lon, lat
            )));
        }

        if !seen.insert(point.id.as_str()) {
            return Err(ClusterError::InvalidPoint(format!(
                "duplicate point id {:?} at index {}",
                point.id, idx
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(lon: f64, lat: f64) -> Result<()> {
        validate_points(&[GeoPoint::new("p", lon, lat, ())])
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(single(-74.0060, 40.7128).is_ok());
        assert!(single(139.6917, 35.6895).is_ok());

        // Edges are inclusive
        assert!(single(180.0, 0.0).is_ok());
        assert!(single(-180.0, 0.0).is_ok());
        assert!(single(0.0, 90.0).is_ok());
        assert!(single(0.0, -90.0).is_ok());

        assert!(single(180.1, 40.0).is_err());
        assert!(single(-200.0, 40.0).is_err());
        assert!(single(-74.0, 90.1).is_err());
        assert!(single(-74.0, -95.0).is_err());
    }

    #[test]
    fn test_non_finite_coordinates() {
        assert!(single(f64::NAN, 40.0).is_err());
        assert!(single(-74.0, f64::NAN).is_err());
        assert!(single(f64::INFINITY, 40.0).is_err());
        assert!(single(-74.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_points() {
        let valid = vec![
            GeoPoint::new("a", -74.0, 40.7, ()),
            GeoPoint::new("b", -73.9, 40.8, ()),
        ];
        assert!(validate_points(&valid).is_ok());

        let invalid = vec![
            GeoPoint::new("a", -74.0, 40.7, ()),
            GeoPoint::new("b", -74.0, 95.0, ()),
        ];
        let err = validate_points(&invalid).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidPoint(_)));
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dup = vec![
            GeoPoint::new("same", 0.0, 0.0, ()),
            GeoPoint::new("same", 1.0, 1.0, ()),
        ];
        assert!(matches!(
            validate_points(&dup),
            Err(ClusterError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_empty_set_is_valid() {
        let empty: Vec<GeoPoint<()>> = Vec::new();
        assert!(validate_points(&empty).is_ok());
    }
}
