use bytes::Bytes;
use geo::Point;
use serde::{Deserialize, Serialize};

/// A caller-identified geographic point with an opaque payload.
///
/// The payload is never inspected by the clustering engine; it is handed back
/// untouched whenever the point surfaces in a query result. By default it is a
/// byte buffer, but any type works (a marker descriptor, a row id, ...).
///
/// # Examples
///
/// ```
/// use spatio_cluster_types::point::GeoPoint;
/// use bytes::Bytes;
///
/// let shop: GeoPoint = GeoPoint::new("shop-42", 2.3522, 48.8566, Bytes::from("Paris"));
/// assert_eq!(shop.longitude(), 2.3522);
/// assert_eq!(shop.latitude(), 48.8566);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint<P = Bytes> {
    /// Identifier assigned by the caller, unique within one load
    pub id: String,
    /// Location as (longitude, latitude)
    pub point: Point<f64>,
    /// Opaque caller data
    pub payload: P,
}

impl<P> GeoPoint<P> {
    /// Create a new point from longitude, latitude and payload.
    ///
    /// # Arguments
    ///
    /// * `id` - Caller-assigned identifier
    /// * `longitude` - Longitude in degrees
    /// * `latitude` - Latitude in degrees
    /// * `payload` - Data returned with the point in query results
    pub fn new(id: impl Into<String>, longitude: f64, latitude: f64, payload: P) -> Self {
        Self {
            id: id.into(),
            point: Point::new(longitude, latitude),
            payload,
        }
    }

    /// Create a point from an existing `geo::Point`.
    pub fn from_point(id: impl Into<String>, point: Point<f64>, payload: P) -> Self {
        Self {
            id: id.into(),
            point,
            payload,
        }
    }

    /// Get the longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.point.x()
    }

    /// Get the latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    /// Replace the payload, keeping id and location.
    pub fn map_payload<Q>(self, f: impl FnOnce(P) -> Q) -> GeoPoint<Q> {
        GeoPoint {
            id: self.id,
            point: self.point,
            payload: f(self.payload),
        }
    }
}
