//! Viewport fit: the highest zoom at which a bounding box stays fully visible.

use crate::compute::projection::{WORLD_SIZE_PX, to_world_pixels};
use crate::config::{BoundingBox2D, FitOptions};
use crate::error::{ClusterError, Result};

/// Compute the zoom level that frames `bbox` inside a `width` x `height` pixel
/// viewport.
///
/// Both corners are projected to Web Mercator world pixels at zoom 0; for each
/// axis the usable viewport size (viewport minus padding on both sides) is
/// divided by the projected span, and the smaller ratio decides the zoom:
/// `floor(log2(min(ratio_x, ratio_y)))`, clamped to the option's zoom range.
///
/// A box with zero width or zero height has no meaningful fit; the fallback
/// zoom from `options` is returned when one is set. Without a fallback a box
/// that is flat on a single axis is fitted on the other axis alone, and a box
/// collapsed to a point is an error.
///
/// # Examples
///
/// ```
/// use spatio_cluster::{BoundingBox2D, FitOptions, fit_zoom};
///
/// let france = BoundingBox2D::new(-4.59, 41.38, 9.56, 51.15);
/// let zoom = fit_zoom(&france, 800.0, 600.0, &FitOptions::default())?;
/// assert_eq!(zoom, 4.0);
/// # Ok::<(), spatio_cluster::ClusterError>(())
/// ```
pub fn fit_zoom(bbox: &BoundingBox2D, width: f64, height: f64, options: &FitOptions) -> Result<f64> {
    if !bbox.is_finite() {
        return Err(ClusterError::DegenerateBounds(format!(
            "bounding box has non-finite coordinates: {:?}",
            bbox.to_array()
        )));
    }

    let (_, north) = to_world_pixels(bbox.min_lon, bbox.max_lat);
    let (_, south) = to_world_pixels(bbox.max_lon, bbox.min_lat);
    let span_x = bbox.width().abs() / 360.0 * WORLD_SIZE_PX;
    let span_y = (south - north).abs();

    let flat_x = span_x <= f64::EPSILON;
    let flat_y = span_y <= f64::EPSILON;

    if flat_x || flat_y {
        if let Some(zoom) = options.fallback_zoom {
            return Ok(zoom);
        }
        if flat_x && flat_y {
            return Err(ClusterError::DegenerateBounds(format!(
                "bounding box collapses to a point at ({}, {}) and no fallback zoom is set",
                bbox.min_lon, bbox.min_lat
            )));
        }
    }

    let target_w = (width - 2.0 * options.padding).max(1.0);
    let target_h = (height - 2.0 * options.padding).max(1.0);

    let ratio_x = if flat_x { f64::INFINITY } else { target_w / span_x };
    let ratio_y = if flat_y { f64::INFINITY } else { target_h / span_y };

    let zoom = ratio_x.min(ratio_y).log2().floor();
    Ok(zoom.max(options.min_zoom).min(options.max_zoom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france() -> BoundingBox2D {
        BoundingBox2D::new(-4.59, 41.38, 9.56, 51.15)
    }

    #[test]
    fn test_france_in_800x600() {
        let zoom = fit_zoom(&france(), 800.0, 600.0, &FitOptions::default()).unwrap();
        assert_eq!(zoom, 4.0);
    }

    #[test]
    fn test_smaller_box_fits_higher_zoom() {
        let options = FitOptions::default();
        let big = fit_zoom(&france(), 800.0, 600.0, &options).unwrap();
        let small = fit_zoom(&france().scale(0.1), 800.0, 600.0, &options).unwrap();
        assert!(big < small);
    }

    #[test]
    fn test_height_constrains_wide_viewport() {
        let bbox = BoundingBox2D::new(-1.0, -1.0, 1.0, 1.0);
        let options = FitOptions::default().with_padding(0.0);
        let wide = fit_zoom(&bbox, 4000.0, 400.0, &options).unwrap();
        let square = fit_zoom(&bbox, 400.0, 400.0, &options).unwrap();
        assert_eq!(wide, square);
    }

    #[test]
    fn test_point_uses_fallback() {
        let point = BoundingBox2D::new(2.35, 48.85, 2.35, 48.85);
        let options = FitOptions::default().with_fallback_zoom(16.0);
        assert_eq!(fit_zoom(&point, 800.0, 600.0, &options).unwrap(), 16.0);
    }

    #[test]
    fn test_point_without_fallback_fails() {
        let point = BoundingBox2D::new(2.35, 48.85, 2.35, 48.85);
        let err = fit_zoom(&point, 800.0, 600.0, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, ClusterError::DegenerateBounds(_)));
    }

    #[test]
    fn test_flat_axis_without_fallback_uses_other_axis() {
        let line = BoundingBox2D::new(0.0, 10.0, 10.0, 10.0);
        let zoom = fit_zoom(&line, 800.0, 600.0, &FitOptions::default()).unwrap();
        // 10 degrees = 14.2px at zoom 0; 784 / 14.2 = 55 -> zoom 5
        assert_eq!(zoom, 5.0);
    }

    #[test]
    fn test_non_finite_bbox_fails() {
        let bad = BoundingBox2D::new(f64::NAN, 0.0, 1.0, 1.0);
        let options = FitOptions::default().with_fallback_zoom(10.0);
        assert!(matches!(
            fit_zoom(&bad, 800.0, 600.0, &options),
            Err(ClusterError::DegenerateBounds(_))
        ));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let world = BoundingBox2D::world();
        assert_eq!(
            fit_zoom(&world, 100.0, 100.0, &FitOptions::default()).unwrap(),
            0.0
        );

        let tiny = BoundingBox2D::new(0.0, 0.0, 1e-9, 1e-9);
        assert_eq!(
            fit_zoom(&tiny, 800.0, 600.0, &FitOptions::default()).unwrap(),
            20.0
        );
    }

    #[test]
    fn test_antimeridian_box_wraps() {
        let wrapped = BoundingBox2D::new(170.0, -10.0, -170.0, 10.0);
        let plain = BoundingBox2D::new(-10.0, -10.0, 10.0, 10.0);
        let options = FitOptions::default();
        assert_eq!(
            fit_zoom(&wrapped, 800.0, 600.0, &options).unwrap(),
            fit_zoom(&plain, 800.0, 600.0, &options).unwrap()
        );
    }
}
