//! Thread-safe clustering engine.
//!
//! [`SyncClusterer`] shares one configuration and one active index between
//! threads. Writers (loads and reconfigurations) take a writer lock for the
//! whole read-config, build, swap sequence, so they apply one after another and
//! a rebuild never replaces a newer point set. Readers only touch the `Arc` of
//! the active index and are never blocked by a rebuild.
//!
//! Index queries go through [`SyncClusterer::snapshot`]; the results borrow from
//! the snapshot.
//!
//! # Examples
//!
//! ```rust
//! use spatio_cluster::{BoundingBox2D, ClusterConfig, GeoPoint, SyncClusterer};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine: SyncClusterer<()> = SyncClusterer::new(ClusterConfig::default())?;
//!
//! let writer = engine.clone();
//! let handle = thread::spawn(move || {
//!     writer
//!         .load(vec![GeoPoint::new("a", 0.0, 0.0, ()), GeoPoint::new("b", 20.0, 20.0, ())])
//!         .unwrap();
//! });
//! handle.join().unwrap();
//!
//! let snapshot = engine.snapshot().expect("loaded");
//! assert_eq!(snapshot.get_clusters(&BoundingBox2D::world(), 10.0).len(), 2);
//! # Ok(())
//! # }
//! ```

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use crate::cluster::ClusterIndex;
use crate::compute::fit::fit_zoom;
use crate::config::{BoundingBox2D, ClusterConfig, FitOptions, GeoPoint};
use crate::error::Result;
use crate::store::PointStore;

struct Shared<P> {
    config: RwLock<ClusterConfig>,
    fit: FitOptions,
    active: RwLock<Option<Arc<ClusterIndex<P>>>>,
    /// Held by loads and reconfigurations from reading the config to the swap
    writer: Mutex<()>,
}

/// Thread-safe engine handle. Cloning shares the same engine.
///
/// The returned snapshot `Arc` is an immutable index that can be queried for
/// as long as the caller holds it, regardless of reloads happening
/// concurrently.
pub struct SyncClusterer<P = bytes::Bytes> {
    inner: Arc<Shared<P>>,
}

impl<P> Clone for SyncClusterer<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> SyncClusterer<P> {
    pub fn new(config: ClusterConfig) -> Result<Self> {
        Self::with_options(config, FitOptions::default())
    }

    /// Create an engine with explicit viewport fit options.
    pub fn with_options(config: ClusterConfig, fit: FitOptions) -> Result<Self> {
        config.validate()?;
        fit.validate()?;
        Ok(Self {
            inner: Arc::new(Shared {
                config: RwLock::new(config),
                fit,
                active: RwLock::new(None),
                writer: Mutex::new(()),
            }),
        })
    }

    /// Validate `points`, build a new index and make it active.
    ///
    /// A rejected point set leaves the active index unchanged.
    pub fn load(&self, points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<u64> {
        let store = PointStore::load(points).inspect_err(|e| {
            log::warn!("rejected point set, keeping previous index: {}", e);
        })?;
        self.load_store(store)
    }

    /// Build over an already validated store and make it active.
    pub fn load_store(&self, store: PointStore<P>) -> Result<u64> {
        let _writer = self.inner.writer.lock();
        let config = self.inner.config.read().clone();
        let index = ClusterIndex::build(&store, &config)?;
        Ok(self.swap(index))
    }

    /// Change the configuration and rebuild over the active point set.
    pub fn reconfigure(&self, config: ClusterConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            log::warn!("rejected cluster configuration: {}", e);
            return Err(e);
        }

        let _writer = self.inner.writer.lock();
        if let Some(active) = self.snapshot() {
            let index = ClusterIndex::build(active.store(), &config)?;
            self.swap(index);
        }
        *self.inner.config.write() = config;
        Ok(())
    }

    fn swap(&self, index: ClusterIndex<P>) -> u64 {
        let generation = index.generation();
        log::info!(
            "activated cluster index generation {} ({} points)",
            generation,
            index.len()
        );
        *self.inner.active.write() = Some(Arc::new(index));
        generation
    }

    pub fn config(&self) -> ClusterConfig {
        self.inner.config.read().clone()
    }

    pub fn fit_options(&self) -> &FitOptions {
        &self.inner.fit
    }

    /// The active index, if points were loaded.
    pub fn snapshot(&self) -> Option<Arc<ClusterIndex<P>>> {
        self.inner.active.read().clone()
    }

    pub fn generation(&self) -> Option<u64> {
        self.inner.active.read().as_ref().map(|index| index.generation())
    }

    /// Zoom that fits `bbox` into a `width` x `height` pixel viewport.
    pub fn fit_zoom(&self, bbox: &BoundingBox2D, width: f64, height: f64) -> Result<f64> {
        fit_zoom(bbox, width, height, &self.inner.fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use std::thread;

    fn points(n: usize, offset: f64) -> Vec<GeoPoint<u32>> {
        (0..n)
            .map(|i| GeoPoint::new(format!("p{}", i), offset + i as f64, 0.0, i as u32))
            .collect()
    }

    #[test]
    fn test_load_and_snapshot() {
        let engine = SyncClusterer::new(ClusterConfig::default()).unwrap();
        assert!(engine.snapshot().is_none());

        let generation = engine.load(points(5, 0.0)).unwrap();
        assert_eq!(engine.generation(), Some(generation));
        assert_eq!(engine.snapshot().unwrap().len(), 5);
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let engine = SyncClusterer::new(ClusterConfig::default()).unwrap();
        engine.load(points(10, 0.0)).unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let reader = engine.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = reader.snapshot().unwrap();
                    let features = snapshot.get_clusters(&BoundingBox2D::world(), 0.0);
                    let total: usize = features.iter().map(|f| f.point_count()).sum();
                    assert_eq!(total, snapshot.len());
                }
            }));
        }

        let writer = engine.clone();
        handles.push(thread::spawn(move || {
            for round in 0..10 {
                writer.load(points(10 + round, 1.0)).unwrap();
            }
        }));

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(engine.snapshot().unwrap().len(), 19);
    }

    #[test]
    fn test_reconfigure() {
        let engine = SyncClusterer::new(ClusterConfig::default()).unwrap();
        engine.load(points(3, 0.0)).unwrap();

        engine
            .reconfigure(ClusterConfig::default().with_max_zoom(8))
            .unwrap();
        assert_eq!(engine.config().max_zoom, 8);
        assert_eq!(engine.snapshot().unwrap().config().max_zoom, 8);

        assert!(engine
            .reconfigure(ClusterConfig::default().with_node_size(0))
            .is_err());
        assert_eq!(engine.config().max_zoom, 8);
    }

    #[test]
    fn test_rejected_load() {
        let engine = SyncClusterer::new(ClusterConfig::default()).unwrap();
        engine.load(points(2, 0.0)).unwrap();
        let mut bad = points(2, 0.0);
        bad[1] = GeoPoint::new("bad", 181.0, 0.0, 0);
        assert!(engine.load(bad).is_err());
        assert_eq!(engine.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_fit_options_are_carried() {
        let engine: SyncClusterer<()> = SyncClusterer::with_options(
            ClusterConfig::default(),
            FitOptions::default().with_fallback_zoom(11.0),
        )
        .unwrap();
        let point = BoundingBox2D::new(2.0, 2.0, 2.0, 2.0);
        assert_eq!(engine.fit_zoom(&point, 800.0, 600.0).unwrap(), 11.0);

        assert!(matches!(
            SyncClusterer::<()>::with_options(
                ClusterConfig::default(),
                FitOptions::default().with_padding(f64::NAN),
            ),
            Err(ClusterError::Configuration(_))
        ));
    }
}
