use climate_chart::ChartError;
use climate_chart::api::boundary_adapter::{BOUNDARY_ALPHA, boundary, location_markers};
use climate_chart::api::context::MapLocation;
use climate_chart::core::geometry::{Extent, LonLat};
use climate_chart::geo::{
    BoundaryFormat, BoundaryLoader, BoundaryOutput, BoundarySource, ExistenceProbe,
    GeoJsonLoader, LocalPathProbe,
};

const TWO_FEATURES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "name": "first" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [
          [[-71.0, 45.0], [-70.0, 45.0], [-70.0, 46.0], [-71.0, 45.0]],
          [[-70.8, 45.2], [-70.6, 45.2], [-70.6, 45.4], [-70.8, 45.2]]
        ]
      }
    },
    {
      "type": "Feature",
      "properties": { "name": "second" },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[-60.0, 50.0, 12.0], [-59.0, 50.0, 12.0], [-59.0, 51.0, 12.0], [-60.0, 50.0, 12.0]]],
          [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        ]
      }
    }
  ]
}"#;

#[test]
fn boundary_extent_is_the_vertex_bounding_box() {
    let vertices = [
        LonLat::new(-71.0, 45.0),
        LonLat::new(-70.0, 45.0),
        LonLat::new(-70.5, 46.5),
    ];
    let annotation = boundary(&vertices, &[vertices.to_vec()]).expect("boundary");
    assert_eq!(
        annotation.extent,
        Extent {
            x_min: -71.0,
            x_max: -70.0,
            y_min: 45.0,
            y_max: 46.5,
        }
    );
    assert!(!annotation.filled);
    assert_eq!(annotation.edge_color.alpha, BOUNDARY_ALPHA);
    assert_eq!(annotation.rings.len(), 1);
}

#[test]
fn empty_boundary_is_rejected() {
    let err = boundary(&[], &[]).expect_err("empty boundary");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn location_labels_are_offset_and_italic() {
    let markers = location_markers(&[MapLocation::new("Montreal", -73.57, 45.5)]);
    assert_eq!(markers.len(), 1);
    let marker = &markers[0];
    assert!(marker.hollow && marker.italic_label);
    assert_eq!(marker.position, LonLat::new(-73.57, 45.5));
    approx::assert_abs_diff_eq!(marker.label_position.longitude, -73.52, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(marker.label_position.latitude, 45.55, epsilon = 1e-9);
}

#[test]
fn first_feature_is_returned_by_default() {
    let features = GeoJsonLoader::new()
        .load(&BoundarySource::text(TWO_FEATURES))
        .expect("features");
    assert_eq!(features.len(), 1);

    let feature = &features[0];
    assert_eq!(feature.vertices.len(), 4);
    assert_eq!(feature.vertices[0], LonLat::new(-71.0, 45.0));
    assert_eq!(feature.coordinates.len(), 2);
}

#[test]
fn all_features_keep_first_polygon_of_multi_polygons() {
    let features = GeoJsonLoader::new()
        .with_all_features()
        .parse_str(TWO_FEATURES)
        .expect("features");
    assert_eq!(features.len(), 2);

    let multi = &features[1];
    assert_eq!(multi.coordinates.len(), 1);
    assert_eq!(multi.vertices[1], LonLat::new(-59.0, 50.0));
}

#[test]
fn lon_lat_table_splits_columns() {
    let outputs = GeoJsonLoader::new()
        .load_as(&BoundarySource::text(TWO_FEATURES), BoundaryFormat::LonLatTable)
        .expect("outputs");
    let [BoundaryOutput::LonLatTable(table)] = outputs.as_slice() else {
        panic!("expected one lon/lat table, got {outputs:?}");
    };
    assert_eq!(table.longitude, vec![-71.0, -70.0, -70.0, -71.0]);
    assert_eq!(table.latitude, vec![45.0, 45.0, 46.0, 45.0]);
}

#[test]
fn malformed_payloads_are_invalid_data() {
    let loader = GeoJsonLoader::new();
    for payload in [
        "not json",
        r#"{ "features": [ { "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } } ] }"#,
        r#"{ "features": [ { "geometry": { "type": "Polygon", "coordinates": [[[0.0]]] } } ] }"#,
        r#"{ "features": [ { "geometry": { "type": "Polygon", "coordinates": [] } } ] }"#,
    ] {
        let err = loader.parse_str(payload).expect_err(payload);
        assert!(matches!(err, ChartError::InvalidData(_)), "{payload}: {err}");
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("climate-chart-missing-boundary.geojson");
    let err = GeoJsonLoader::new()
        .load(&BoundarySource::path(&path))
        .expect_err("missing file");
    assert!(matches!(err, ChartError::Io { .. }));
    assert!(!LocalPathProbe.exists(&path.display().to_string()));
}

#[test]
fn boundary_file_round_trips_through_disk() {
    let path = std::env::temp_dir().join(format!(
        "climate-chart-boundary-{}.geojson",
        std::process::id()
    ));
    std::fs::write(&path, TWO_FEATURES).expect("write boundary");
    assert!(LocalPathProbe.exists(&path.display().to_string()));

    let features = GeoJsonLoader::new()
        .load(&BoundarySource::path(&path))
        .expect("features");
    std::fs::remove_file(&path).expect("remove boundary");

    let annotation = boundary(&features[0].vertices, &features[0].coordinates).expect("boundary");
    assert_eq!(annotation.extent.x_min, -71.0);
    assert_eq!(annotation.extent.y_max, 46.0);
    assert_eq!(annotation.rings.len(), 2);
}
