//! GeoJSON export of query results.

use geojson::feature::Id;
use geojson::{Feature as GeoJsonFeature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};

use crate::cluster::Feature;
use crate::error::{ClusterError, Result};

/// Converts one query result to a GeoJSON Feature.
///
/// Clusters carry `cluster`, `cluster_id`, `point_count` and
/// `point_count_abbreviated` properties; points carry `cluster: false` and
/// their own id, which also becomes the feature id.
pub fn feature_to_geojson<P>(feature: &Feature<'_, P>) -> GeoJsonFeature {
    let geom = Geometry::new(Value::Point(vec![feature.longitude(), feature.latitude()]));
    let mut props = Map::new();

    let id = match feature {
        Feature::Cluster(c) => {
            props.insert("cluster".to_string(), json!(true));
            props.insert("cluster_id".to_string(), json!(c.id.to_string()));
            props.insert("point_count".to_string(), json!(c.point_count));
            props.insert(
                "point_count_abbreviated".to_string(),
                json!(c.point_count_abbreviated),
            );
            props.insert("zoom".to_string(), json!(c.zoom));
            None
        }
        Feature::Point(p) => {
            props.insert("cluster".to_string(), json!(false));
            props.insert("id".to_string(), json!(p.point.id));
            Some(Id::String(p.point.id.clone()))
        }
    };

    GeoJsonFeature {
        bbox: None,
        geometry: Some(geom),
        id,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Converts query results to a GeoJSON FeatureCollection.
pub fn features_to_feature_collection<P>(features: &[Feature<'_, P>]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.iter().map(feature_to_geojson).collect(),
        foreign_members: None,
    }
}

/// Converts query results to a GeoJSON FeatureCollection string.
pub fn features_to_geojson<P>(features: &[Feature<'_, P>]) -> Result<String> {
    let collection = features_to_feature_collection(features);

    serde_json::to_string(&collection).map_err(|e| {
        ClusterError::SerializationErrorWithContext(format!(
            "Failed to serialize feature collection: {}",
            e
        ))
    })
}
