//! Clustering and viewport fit configuration
//!
//! This module provides the option types recognized by the engine and re-exports
//! the point and bounding box types from the `spatio-cluster-types` crate for
//! convenience.
use serde::de::Error;

use crate::error::{ClusterError, Result as ClusterResult};

pub use spatio_cluster_types::bbox::BoundingBox2D;
pub use spatio_cluster_types::point::GeoPoint;

/// Highest zoom the index can be configured to cluster at.
pub const MAX_SUPPORTED_ZOOM: u8 = 24;

/// Largest k-d tree leaf bucket.
pub const MAX_NODE_SIZE: usize = u16::MAX as usize;

/// Clustering options.
///
/// # Example
///
/// ```rust
/// use spatio_cluster::ClusterConfig;
///
/// let config = ClusterConfig::default().with_radius(60.0).with_max_zoom(14);
/// assert!(config.validate().is_ok());
///
/// let json = r#"{ "radius": 80.0, "max_zoom": 12 }"#;
/// let config = ClusterConfig::from_json(json).unwrap();
/// assert_eq!(config.extent, 512.0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Lowest zoom level at which clusters are generated
    #[serde(default)]
    pub min_zoom: u8,

    /// Highest zoom level at which clusters are generated
    #[serde(default = "ClusterConfig::default_max_zoom")]
    pub max_zoom: u8,

    /// Cluster radius in pixels
    #[serde(default = "ClusterConfig::default_radius")]
    pub radius: f64,

    /// Tile extent in pixels; the radius is measured relative to it
    #[serde(default = "ClusterConfig::default_extent")]
    pub extent: f64,

    /// Leaf bucket size of the per-level k-d trees
    #[serde(default = "ClusterConfig::default_node_size")]
    pub node_size: usize,
}

impl ClusterConfig {
    const fn default_max_zoom() -> u8 {
        16
    }

    const fn default_radius() -> f64 {
        40.0
    }

    const fn default_extent() -> f64 {
        512.0
    }

    const fn default_node_size() -> usize {
        64
    }

    pub fn with_min_zoom(mut self, zoom: u8) -> Self {
        self.min_zoom = zoom;
        self
    }

    pub fn with_max_zoom(mut self, zoom: u8) -> Self {
        self.max_zoom = zoom;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_node_size(mut self, node_size: usize) -> Self {
        self.node_size = node_size;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> ClusterResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ClusterError::Configuration(format!(
                "radius must be a positive number, got: {}",
                self.radius
            )));
        }

        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(ClusterError::Configuration(format!(
                "extent must be a positive number, got: {}",
                self.extent
            )));
        }

        if self.min_zoom > self.max_zoom {
            return Err(ClusterError::Configuration(format!(
                "min_zoom ({}) must not exceed max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }

        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(ClusterError::Configuration(format!(
                "max_zoom must be at most {}, got: {}",
                MAX_SUPPORTED_ZOOM, self.max_zoom
            )));
        }

        if self.node_size == 0 {
            return Err(ClusterError::Configuration(
                "node_size must be greater than zero".to_string(),
            ));
        }

        if self.node_size > MAX_NODE_SIZE {
            return Err(ClusterError::Configuration(format!(
                "node_size must be at most {}, got: {}",
                MAX_NODE_SIZE, self.node_size
            )));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: ClusterConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: ClusterConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: Self::default_max_zoom(),
            radius: Self::default_radius(),
            extent: Self::default_extent(),
            node_size: Self::default_node_size(),
        }
    }
}

/// Options for fitting a bounding box into a viewport.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitOptions {
    /// Pixels kept free on every side of the viewport
    #[serde(default = "FitOptions::default_padding")]
    pub padding: f64,

    /// Lowest zoom the fit may return
    #[serde(default)]
    pub min_zoom: f64,

    /// Highest zoom the fit may return
    #[serde(default = "FitOptions::default_max_zoom")]
    pub max_zoom: f64,

    /// Zoom used for zero-area boxes (a single place rather than a region)
    #[serde(default)]
    pub fallback_zoom: Option<f64>,
}

impl FitOptions {
    const fn default_padding() -> f64 {
        8.0
    }

    const fn default_max_zoom() -> f64 {
        20.0
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_fallback_zoom(mut self, zoom: f64) -> Self {
        self.fallback_zoom = Some(zoom);
        self
    }

    pub fn validate(&self) -> ClusterResult<()> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ClusterError::Configuration(format!(
                "padding must be a non-negative number, got: {}",
                self.padding
            )));
        }

        if !self.min_zoom.is_finite()
            || !self.max_zoom.is_finite()
            || self.min_zoom > self.max_zoom
        {
            return Err(ClusterError::Configuration(format!(
                "invalid fit zoom range [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }

        if let Some(zoom) = self.fallback_zoom
            && !zoom.is_finite()
        {
            return Err(ClusterError::Configuration(format!(
                "fallback zoom must be finite, got: {}",
                zoom
            )));
        }

        Ok(())
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: Self::default_padding(),
            min_zoom: 0.0,
            max_zoom: Self::default_max_zoom(),
            fallback_zoom: None,
        }
    }
}
