use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A longitude/latitude bounding box, `[min_lon, min_lat, max_lon, max_lat]`.
///
/// Unlike `geo::Rect`, the corners are kept exactly as given: a box whose
/// `min_lon` is greater than its `max_lon` crosses the antimeridian (for example
/// a viewport from 170°E to 170°W is `[170, y0, -170, y1]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Western edge in degrees
    pub min_lon: f64,
    /// Southern edge in degrees
    pub min_lat: f64,
    /// Eastern edge in degrees
    pub max_lon: f64,
    /// Northern edge in degrees
    pub max_lat: f64,
}

impl BoundingBox2D {
    /// Create a new bounding box from its west, south, east and north edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster_types::bbox::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(-74.0, 40.7, -73.9, 40.8);
    /// assert!(!bbox.crosses_antimeridian());
    /// ```
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// The whole world, `[-180, -90, 180, 90]`.
    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Build from the `[west, south, east, north]` array layout used by GeoJSON.
    pub fn from_array(bbox: [f64; 4]) -> Self {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }

    /// Build from a south-west and a north-east corner.
    pub fn from_corners(south_west: Point<f64>, north_east: Point<f64>) -> Self {
        Self::new(south_west.x(), south_west.y(), north_east.x(), north_east.y())
    }

    /// Build from a `geo::Rect` (never crosses the antimeridian).
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// The `[west, south, east, north]` array layout.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// True when all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// True when the western edge lies east of the eastern edge.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Longitudinal extent in degrees, wrapping across the antimeridian.
    pub fn width(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.max_lon - self.min_lon + 360.0
        } else {
            self.max_lon - self.min_lon
        }
    }

    /// Latitudinal extent in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Get the center point, taking antimeridian wrap into account.
    pub fn center(&self) -> Point<f64> {
        let mut lon = self.min_lon + self.width() / 2.0;
        if lon > 180.0 {
            lon -= 360.0;
        }
        Point::new(lon, (self.min_lat + self.max_lat) / 2.0)
    }

    /// Check if a point lies inside the box (edges inclusive).
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        let (x, y) = (point.x(), point.y());
        if y < self.min_lat || y > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            x >= self.min_lon || x <= self.max_lon
        } else {
            x >= self.min_lon && x <= self.max_lon
        }
    }

    /// Scale the box around its center by `factor` in both axes.
    pub fn scale(&self, factor: f64) -> Self {
        let center = self.center();
        let half_w = self.width() * factor / 2.0;
        let half_h = self.height() * factor / 2.0;
        Self::new(
            center.x() - half_w,
            center.y() - half_h,
            center.x() + half_w,
            center.y() + half_h,
        )
    }
}

impl From<[f64; 4]> for BoundingBox2D {
    fn from(bbox: [f64; 4]) -> Self {
        Self::from_array(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_height() {
        let bbox = BoundingBox2D::new(-10.0, -5.0, 10.0, 5.0);
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.height(), 10.0);
        assert_eq!(bbox.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_antimeridian_width_and_center() {
        let bbox = BoundingBox2D::new(170.0, -10.0, -170.0, 10.0);
        assert!(bbox.crosses_antimeridian());
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.center().x(), 180.0);
    }

    #[test]
    fn test_contains_point() {
        let bbox = BoundingBox2D::new(-74.05, 40.68, -73.90, 40.88);
        assert!(bbox.contains_point(&Point::new(-74.0, 40.7)));
        assert!(!bbox.contains_point(&Point::new(-75.0, 40.7)));

        let wrapped = BoundingBox2D::new(179.0, -1.0, -179.0, 1.0);
        assert!(wrapped.contains_point(&Point::new(179.5, 0.0)));
        assert!(wrapped.contains_point(&Point::new(-179.5, 0.0)));
        assert!(!wrapped.contains_point(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_scale() {
        let bbox = BoundingBox2D::new(0.0, 0.0, 10.0, 20.0);
        let small = bbox.scale(0.1);
        assert!((small.width() - 1.0).abs() < 1e-12);
        assert!((small.height() - 2.0).abs() < 1e-12);
        assert_eq!(small.center(), bbox.center());
    }

    #[test]
    fn test_array_roundtrip_and_finite() {
        let bbox = BoundingBox2D::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(bbox.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert!(bbox.is_finite());
        assert!(!BoundingBox2D::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
    }
}
