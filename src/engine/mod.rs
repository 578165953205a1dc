//! The clustering engine: configuration plus the currently active index.
//!
//! This module defines [`Clusterer`], the single-owner entry point, and, behind
//! the `sync` feature, [`SyncClusterer`] for sharing one engine between threads.

use bytes::Bytes;
use std::sync::Arc;

use crate::builder::ClustererBuilder;
use crate::cluster::{ClusterId, ClusterIndex, Feature};
use crate::compute::fit::fit_zoom;
use crate::config::{BoundingBox2D, ClusterConfig, FitOptions, GeoPoint};
use crate::error::{ClusterError, Result};
use crate::store::PointStore;

#[cfg(feature = "sync")]
mod sync;

#[cfg(feature = "sync")]
pub use sync::SyncClusterer;

/// Map point clustering engine.
///
/// `Clusterer` owns a configuration and the index built from the last
/// successfully loaded point set. Every load or configuration change builds a
/// complete new index; a rejected load or configuration leaves the previous
/// index active.
///
/// The active index is held behind an `Arc`. [`Clusterer::snapshot`] hands out a
/// clone of it, which stays valid (and unchanged) after later reloads.
///
/// # Examples
///
/// ```rust
/// use spatio_cluster::{BoundingBox2D, Clusterer, GeoPoint};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut clusterer = Clusterer::builder().radius(60.0).max_zoom(14).build()?;
///
/// clusterer.load(vec![
///     GeoPoint::new("louvre", 2.3376, 48.8606, "Louvre".to_string()),
///     GeoPoint::new("orsay", 2.3266, 48.8600, "Orsay".to_string()),
///     GeoPoint::new("tate", -0.0994, 51.5076, "Tate Modern".to_string()),
/// ])?;
///
/// let features = clusterer.get_clusters(&BoundingBox2D::world(), 5.0);
/// assert_eq!(features.len(), 2);
///
/// let paris = features.iter().find(|f| f.is_cluster()).unwrap();
/// let leaves = clusterer.get_leaves(paris.id(), 10, 0)?;
/// assert_eq!(leaves.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Clusterer<P = Bytes> {
    config: ClusterConfig,
    fit: FitOptions,
    active: Option<Arc<ClusterIndex<P>>>,
}

impl<P> Clusterer<P> {
    /// Create an engine with `config` and no points loaded.
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fit: FitOptions::default(),
            active: None,
        })
    }

    pub(crate) fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn fit_options(&self) -> &FitOptions {
        &self.fit
    }

    /// Replace the point set and rebuild the index.
    ///
    /// Loading is all-or-nothing: if any point is invalid the call fails with
    /// [`ClusterError::InvalidPoint`] and the previously loaded points stay
    /// active. Returns the generation of the new index.
    pub fn load(&mut self, points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<u64> {
        let store = match PointStore::load(points) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("rejected point set, keeping previous index: {}", e);
                return Err(e);
            }
        };
        self.load_store(store)
    }

    /// Rebuild the index over an already validated store.
    pub fn load_store(&mut self, store: PointStore<P>) -> Result<u64> {
        let index = ClusterIndex::build(&store, &self.config)?;
        let generation = index.generation();
        self.swap(index);
        Ok(generation)
    }

    /// Change the configuration and rebuild over the loaded points.
    ///
    /// An invalid configuration is rejected and the current configuration and
    /// index stay in place.
    pub fn set_config(&mut self, config: ClusterConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            log::warn!("rejected cluster configuration: {}", e);
            return Err(e);
        }

        if let Some(active) = &self.active {
            let index = ClusterIndex::build(active.store(), &config)?;
            self.swap(index);
        }
        self.config = config;
        Ok(())
    }

    fn swap(&mut self, index: ClusterIndex<P>) {
        log::info!(
            "activated cluster index generation {} ({} points, zoom {}..={})",
            index.generation(),
            index.len(),
            index.config().min_zoom,
            index.config().max_zoom
        );
        self.active = Some(Arc::new(index));
    }

    /// Shared handle on the active index, if points were loaded.
    pub fn snapshot(&self) -> Option<Arc<ClusterIndex<P>>> {
        self.active.clone()
    }

    /// The active index, if points were loaded.
    pub fn index(&self) -> Option<&ClusterIndex<P>> {
        self.active.as_deref()
    }

    /// Generation of the active index.
    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|index| index.generation())
    }

    fn require_index(&self) -> Result<&ClusterIndex<P>> {
        self.index()
            .ok_or_else(|| ClusterError::UnknownCluster("no points have been loaded".to_string()))
    }

    /// Features visible in `bbox` at `zoom`. Empty when nothing is loaded.
    pub fn get_clusters(&self, bbox: &BoundingBox2D, zoom: f64) -> Vec<Feature<'_, P>> {
        match self.index() {
            Some(index) => index.get_clusters(bbox, zoom),
            None => Vec::new(),
        }
    }

    /// See [`ClusterIndex::get_children`].
    pub fn get_children(&self, id: ClusterId) -> Result<Vec<Feature<'_, P>>> {
        self.require_index()?.get_children(id)
    }

    /// See [`ClusterIndex::get_leaves`].
    pub fn get_leaves(&self, id: ClusterId, limit: usize, offset: usize) -> Result<Vec<&GeoPoint<P>>> {
        self.require_index()?.get_leaves(id, limit, offset)
    }

    /// See [`ClusterIndex::get_cluster_expansion_zoom`].
    pub fn get_cluster_expansion_zoom(&self, id: ClusterId) -> Result<u8> {
        self.require_index()?.get_cluster_expansion_zoom(id)
    }

    /// Zoom that frames `bbox` in a `width` x `height` viewport, using the
    /// engine's fit options.
    pub fn fit_zoom(&self, bbox: &BoundingBox2D, width: f64, height: f64) -> Result<f64> {
        fit_zoom(bbox, width, height, &self.fit)
    }
}

impl Clusterer {
    /// Create a builder for custom engine configuration.
    ///
    /// The payload type is chosen by [`ClustererBuilder::build`].
    pub fn builder() -> ClustererBuilder {
        ClustererBuilder::new()
    }
}

impl<P> Default for Clusterer<P> {
    fn default() -> Self {
        Self {
            config: ClusterConfig::default(),
            fit: FitOptions::default(),
            active: None,
        }
    }
}
