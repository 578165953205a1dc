//! Engine builder for flexible configuration
//!
//! This module provides a builder pattern for creating clustering engines with
//! custom clustering and viewport fit options.

use crate::config::{ClusterConfig, FitOptions, GeoPoint};
use crate::engine::Clusterer;
#[cfg(feature = "sync")]
use crate::engine::SyncClusterer;
use crate::error::Result;

/// Builder for engine configuration.
///
/// ```rust
/// use spatio_cluster::{Clusterer, GeoPoint};
///
/// let clusterer = Clusterer::builder()
///     .min_zoom(2)
///     .max_zoom(12)
///     .radius(50.0)
///     .build_with_points(vec![GeoPoint::new("a", 13.4, 52.5, ())])
///     .unwrap();
/// assert_eq!(clusterer.config().max_zoom, 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClustererBuilder {
    config: ClusterConfig,
    fit: FitOptions,
}

impl ClustererBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole clustering configuration.
    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn min_zoom(mut self, zoom: u8) -> Self {
        self.config = self.config.with_min_zoom(zoom);
        self
    }

    pub fn max_zoom(mut self, zoom: u8) -> Self {
        self.config = self.config.with_max_zoom(zoom);
        self
    }

    /// Cluster radius in pixels.
    pub fn radius(mut self, radius: f64) -> Self {
        self.config = self.config.with_radius(radius);
        self
    }

    /// Tile extent in pixels.
    pub fn extent(mut self, extent: f64) -> Self {
        self.config = self.config.with_extent(extent);
        self
    }

    pub fn node_size(mut self, node_size: usize) -> Self {
        self.config = self.config.with_node_size(node_size);
        self
    }

    /// Options used by [`Clusterer::fit_zoom`] and `SyncClusterer::fit_zoom`.
    pub fn fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    /// Build an engine with no points loaded.
    pub fn build<P>(self) -> Result<Clusterer<P>> {
        self.fit.validate()?;
        Ok(Clusterer::new(self.config)?.with_fit_options(self.fit))
    }

    /// Build an engine and load `points` into it.
    pub fn build_with_points<P>(
        self,
        points: impl IntoIterator<Item = GeoPoint<P>>,
    ) -> Result<Clusterer<P>> {
        let mut clusterer = self.build()?;
        clusterer.load(points)?;
        Ok(clusterer)
    }

    /// Build a thread-safe engine with no points loaded.
    #[cfg(feature = "sync")]
    pub fn build_sync<P>(self) -> Result<SyncClusterer<P>> {
        SyncClusterer::with_options(self.config, self.fit)
    }
}
