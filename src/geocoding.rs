//! Camera targets for geocoding results.
//!
//! A geocoding service answers a search with a center point, usually a bounding
//! box and, for countries, a short country code. [`CameraPlanner`] turns such a
//! result into the longitude, latitude and zoom a map should move to. A few
//! countries have geocoder boxes that are unusable for framing (overseas
//! territories, or a box spanning the antimeridian the wrong way); those are
//! replaced by the extents in [`COUNTRY_EXTENTS`].

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::compute::fit::fit_zoom;
use crate::config::{BoundingBox2D, FitOptions};
use crate::error::Result;

/// A named country extent used instead of the geocoder's own box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryExtent {
    pub name: &'static str,
    pub bbox: BoundingBox2D,
}

/// Country extents keyed by lowercase short code.
pub static COUNTRY_EXTENTS: Lazy<FxHashMap<&'static str, CountryExtent>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    table.insert(
        "fr",
        CountryExtent {
            name: "France",
            bbox: BoundingBox2D::new(-4.59235, 41.380007, 9.560016, 51.148506),
        },
    );
    table.insert(
        "us",
        CountryExtent {
            name: "United States",
            bbox: BoundingBox2D::new(-171.791111, 18.91619, -66.96466, 71.357764),
        },
    );
    // East edge past 180 keeps the box from wrapping
    table.insert(
        "ru",
        CountryExtent {
            name: "Russia",
            bbox: BoundingBox2D::new(19.66064, 41.151416, 190.10042, 81.2504),
        },
    );
    table.insert(
        "ca",
        CountryExtent {
            name: "Canada",
            bbox: BoundingBox2D::new(-140.99778, 41.675105, -52.648099, 83.23324),
        },
    );
    table
});

/// Override extent for a short code, case-insensitive.
pub fn country_extent(short_code: &str) -> Option<&'static CountryExtent> {
    COUNTRY_EXTENTS.get(short_code.to_ascii_lowercase().as_str())
}

/// Properties of a geocoding result that matter for framing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodingProperties {
    #[serde(default)]
    pub short_code: Option<String>,
}

/// One geocoding result, deserializable from a Mapbox geocoding feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    /// `[west, south, east, north]`
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub properties: GeocodingProperties,
    #[serde(default)]
    pub place_name: String,
}

impl GeocodingResult {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            center: [longitude, latitude],
            bbox: None,
            properties: GeocodingProperties::default(),
            place_name: String::new(),
        }
    }

    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_short_code(mut self, code: impl Into<String>) -> Self {
        self.properties.short_code = Some(code.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where to move the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

/// Computes camera targets for geocoding results.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPlanner {
    /// Zoom used when the result has no usable extent
    pub default_zoom: f64,
    pub fit: FitOptions,
}

impl Default for CameraPlanner {
    fn default() -> Self {
        Self {
            default_zoom: 16.0,
            fit: FitOptions::default().with_padding(0.0),
        }
    }
}

impl CameraPlanner {
    pub fn new(default_zoom: f64, fit: FitOptions) -> Self {
        Self { default_zoom, fit }
    }

    /// Camera target for `result` in a `width` x `height` viewport.
    ///
    /// The camera is centered on the result's center. The zoom frames the
    /// country override extent when the short code has one, else the result's
    /// own box, else it is the default zoom. A box that cannot be fitted also
    /// falls back to the default zoom.
    ///
    /// ```rust
    /// use spatio_cluster::geocoding::{CameraPlanner, GeocodingResult};
    ///
    /// let planner = CameraPlanner::default();
    /// let street = GeocodingResult::new(2.2945, 48.8584);
    /// assert_eq!(planner.camera_for(&street, 800.0, 600.0).zoom, 16.0);
    ///
    /// let france = GeocodingResult::new(2.2, 46.2)
    ///     .with_bbox([-61.8, -21.4, 55.8, 51.1])
    ///     .with_short_code("fr");
    /// assert_eq!(planner.camera_for(&france, 800.0, 600.0).zoom, 4.0);
    /// ```
    pub fn camera_for(&self, result: &GeocodingResult, width: f64, height: f64) -> CameraTarget {
        let [longitude, latitude] = result.center;

        let bbox = result
            .properties
            .short_code
            .as_deref()
            .and_then(country_extent)
            .map(|extent| extent.bbox)
            .or_else(|| result.bbox.map(BoundingBox2D::from_array));

        let zoom = match bbox {
            Some(bbox) => match fit_zoom(&bbox, width, height, &self.fit) {
                Ok(zoom) => zoom,
                Err(e) => {
                    log::warn!(
                        "could not frame geocoding result {:?} ({}), using zoom {}",
                        result.place_name,
                        e,
                        self.default_zoom
                    );
                    self.default_zoom
                }
            },
            None => self.default_zoom,
        };

        CameraTarget {
            longitude,
            latitude,
            zoom,
        }
    }
}
