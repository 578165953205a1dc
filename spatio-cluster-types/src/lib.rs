//! # spatio-cluster-types
//!
//! Core data types shared by the spatio-cluster engine and its hosts.
//!
//! - **Point types**: `GeoPoint`, a caller-identified marker location with an
//!   opaque payload
//! - **Bounding box types**: `BoundingBox2D`, a longitude/latitude rectangle that may
//!   cross the antimeridian
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use spatio_cluster_types::bbox::BoundingBox2D;
//! use spatio_cluster_types::point::GeoPoint;
//!
//! let cafe = GeoPoint::new("cafe-1", -74.0060, 40.7128, "Corner cafe");
//! let manhattan = BoundingBox2D::new(-74.0479, 40.6829, -73.9067, 40.8820);
//! assert!(manhattan.contains_point(&cafe.point));
//! ```

pub mod bbox;
pub mod point;

pub use bbox::BoundingBox2D;
pub use point::GeoPoint;
