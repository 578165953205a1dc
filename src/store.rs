//! Point store: the validated, immutable point set an index is built from.

use std::ops::Deref;
use std::sync::Arc;

use crate::compute::validation::validate_points;
use crate::config::GeoPoint;
use crate::error::Result;

/// An immutable, validated set of points.
///
/// Loading is all-or-nothing: one bad coordinate or duplicate id rejects the
/// whole set. The points live behind an `Arc`, so cloning a store (or handing
/// it to an index) never copies them.
#[derive(Debug)]
pub struct PointStore<P> {
    points: Arc<[GeoPoint<P>]>,
}

impl<P> PointStore<P> {
    /// Validate and take ownership of a point set.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_cluster::{GeoPoint, PointStore};
    ///
    /// let store = PointStore::load(vec![
    ///     GeoPoint::new("a", 2.35, 48.85, "Paris"),
    ///     GeoPoint::new("b", -0.12, 51.50, "London"),
    /// ])?;
    /// assert_eq!(store.len(), 2);
    ///
    /// assert!(PointStore::load(vec![GeoPoint::new("c", 0.0, 91.0, "nowhere")]).is_err());
    /// # Ok::<(), spatio_cluster::ClusterError>(())
    /// ```
    pub fn load(points: impl IntoIterator<Item = GeoPoint<P>>) -> Result<Self> {
        let points: Vec<GeoPoint<P>> = points.into_iter().collect();
        validate_points(&points)?;
        Ok(Self {
            points: points.into(),
        })
    }

    /// Map arbitrary records to points, then load them.
    pub fn from_records<R>(
        records: impl IntoIterator<Item = R>,
        to_point: impl FnMut(R) -> GeoPoint<P>,
    ) -> Result<Self> {
        Self::load(records.into_iter().map(to_point))
    }

    /// An empty store.
    pub fn empty() -> Self {
        Self {
            points: Arc::from(Vec::new()),
        }
    }

    pub fn points(&self) -> &[GeoPoint<P>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<P> Clone for PointStore<P> {
    fn clone(&self) -> Self {
        Self {
            points: Arc::clone(&self.points),
        }
    }
}

impl<P> Deref for PointStore<P> {
    type Target = [GeoPoint<P>];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}
