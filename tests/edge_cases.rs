use spatio_cluster::{
    BoundingBox2D, ClusterConfig, ClusterError, Clusterer, FitOptions, GeoPoint, fit_zoom,
};

/// Many points on exactly the same spot
#[test]
fn test_identical_points_never_split() {
    let points: Vec<GeoPoint<u32>> = (0..50)
        .map(|i| GeoPoint::new(format!("same-{}", i), 12.5, 41.9, i))
        .collect();
    let mut clusterer = Clusterer::default();
    clusterer.load(points).unwrap();

    let world = BoundingBox2D::world();
    for zoom in 0..=16 {
        let features = clusterer.get_clusters(&world, zoom as f64);
        assert_eq!(features.len(), 1, "zoom {}", zoom);
        assert_eq!(features[0].point_count(), 50);
    }
    assert_eq!(clusterer.get_clusters(&world, 17.0).len(), 50);

    let top = clusterer.get_clusters(&world, 0.0);
    assert_eq!(clusterer.get_cluster_expansion_zoom(top[0].id()).unwrap(), 17);
}

/// Points at the poles and on the antimeridian are accepted and clustered
#[test]
fn test_extreme_coordinates() {
    let mut clusterer = Clusterer::default();
    clusterer
        .load(vec![
            GeoPoint::new("north", 0.0, 90.0, ()),
            GeoPoint::new("south", 0.0, -90.0, ()),
            GeoPoint::new("east", 180.0, 0.0, ()),
            GeoPoint::new("west", -180.0, 0.0, ()),
        ])
        .unwrap();

    let all = clusterer.get_clusters(&BoundingBox2D::world(), 17.0);
    assert_eq!(all.len(), 4);

    let polar = clusterer.get_clusters(&BoundingBox2D::new(-10.0, 80.0, 10.0, 90.0), 17.0);
    assert_eq!(polar.len(), 1);
}

#[test]
fn test_duplicate_ids_reject_load() {
    let mut clusterer = Clusterer::default();
    let err = clusterer
        .load(vec![
            GeoPoint::new("dup", 0.0, 0.0, ()),
            GeoPoint::new("dup", 1.0, 1.0, ()),
        ])
        .unwrap_err();
    assert!(matches!(err, ClusterError::InvalidPoint(_)));
    assert!(clusterer.snapshot().is_none());
}

#[test]
fn test_empty_point_set() {
    let mut clusterer: Clusterer<()> = Clusterer::default();
    clusterer.load(Vec::new()).unwrap();
    assert!(clusterer.index().unwrap().is_empty());
    assert!(clusterer.get_clusters(&BoundingBox2D::world(), 0.0).is_empty());
}

#[test]
fn test_single_zoom_range() {
    let mut clusterer = Clusterer::builder()
        .min_zoom(5)
        .max_zoom(5)
        .build()
        .unwrap();
    clusterer
        .load(vec![
            GeoPoint::new("a", 0.0, 0.0, ()),
            GeoPoint::new("b", 0.01, 0.0, ()),
        ])
        .unwrap();

    let world = BoundingBox2D::world();
    // Zooms below the range read the min_zoom level
    assert_eq!(clusterer.get_clusters(&world, 0.0).len(), 1);
    assert_eq!(clusterer.get_clusters(&world, 5.0).len(), 1);
    assert_eq!(clusterer.get_clusters(&world, 6.0).len(), 2);
    assert_eq!(clusterer.index().unwrap().stats().levels.len(), 2);
}

#[test]
fn test_invalid_configurations() {
    for config in [
        ClusterConfig::default().with_radius(0.0),
        ClusterConfig::default().with_extent(f64::INFINITY),
        ClusterConfig::default().with_min_zoom(8).with_max_zoom(4),
        ClusterConfig::default().with_max_zoom(30),
        ClusterConfig::default().with_node_size(0),
    ] {
        assert!(matches!(
            Clusterer::<()>::new(config),
            Err(ClusterError::Configuration(_))
        ));
    }
}

#[test]
fn test_degenerate_viewports() {
    let bbox = BoundingBox2D::new(-1.0, -1.0, 1.0, 1.0);
    let options = FitOptions::default();

    // Padding larger than the viewport still yields a clamped zoom
    let zoom = fit_zoom(&bbox, 10.0, 10.0, &options).unwrap();
    assert_eq!(zoom, 0.0);

    let point = BoundingBox2D::new(3.0, 3.0, 3.0, 3.0);
    assert!(matches!(
        fit_zoom(&point, 800.0, 600.0, &options),
        Err(ClusterError::DegenerateBounds(_))
    ));
}

#[test]
fn test_infinite_bbox_query() {
    let mut clusterer = Clusterer::default();
    clusterer.load(vec![GeoPoint::new("a", 0.0, 0.0, ())]).unwrap();
    let bbox = BoundingBox2D::new(f64::NEG_INFINITY, -10.0, f64::INFINITY, 10.0);
    assert!(clusterer.get_clusters(&bbox, 3.0).is_empty());
}

#[test]
fn test_fractional_zoom_is_floored() {
    let mut clusterer = Clusterer::default();
    clusterer
        .load(vec![
            GeoPoint::new("a", 0.0, 0.0, ()),
            GeoPoint::new("b", 0.001, 0.001, ()),
        ])
        .unwrap();
    let world = BoundingBox2D::world();
    assert_eq!(
        clusterer.get_clusters(&world, 16.99).len(),
        clusterer.get_clusters(&world, 16.0).len()
    );
}
