use sarview::io::BoundaryReader;
use sarview::types::SarError;
use std::io::Write;

/// Round trip Belgian Lambert 72 -> UTM 31N -> Belgian Lambert 72.
/// The transforms are analytic, so the round trip must return to the
/// starting coordinate to well under a millimeter.
#[test]
fn test_lambert72_utm_round_trip() {
    let forward = BoundaryReader::build_transform(31370, 32631).unwrap();
    let backward = BoundaryReader::build_transform(32631, 31370).unwrap();

    // Points spread over the Belgian Lambert 72 domain
    let originals = [(240_000.0_f64, 200_000.0_f64), (150_000.0, 170_000.0), (250_000.0, 160_000.0)];

    for &(x0, y0) in &originals {
        let mut xs = [x0];
        let mut ys = [y0];
        let mut zs = [0.0];
        forward.transform_coords(&mut xs, &mut ys, &mut zs).unwrap();
        backward
            .transform_coords(&mut xs, &mut ys, &mut zs)
            .unwrap();

        assert!(
            (xs[0] - x0).abs() < 1e-4,
            "x drifted by {} m for ({}, {})",
            (xs[0] - x0).abs(),
            x0,
            y0
        );
        assert!(
            (ys[0] - y0).abs() < 1e-4,
            "y drifted by {} m for ({}, {})",
            (ys[0] - y0).abs(),
            x0,
            y0
        );
    }
}

/// GeoJSON stands in for the shapefile here: same OGR read path, no binary
/// sidecar files to fabricate. Coordinates are written in Lambert 72 and the
/// reader is told so, exactly as it treats the CRS-less shapefile.
#[test]
fn test_read_boundary_reprojects_all_features() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boundary.geojson");

    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [240000.0, 200000.0],
                        [240400.0, 200000.0],
                        [240400.0, 200400.0],
                        [240000.0, 200400.0],
                        [240000.0, 200000.0]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [241000.0, 200000.0],
                        [241200.0, 200000.0],
                        [241200.0, 200200.0],
                        [241000.0, 200200.0],
                        [241000.0, 200000.0]
                    ]]
                }
            }
        ]
    }"#;
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(geojson.as_bytes()).unwrap();

    let boundary = BoundaryReader::read_boundary(&path, 31370, 32631).unwrap();

    // Both features survive, not just geometry[0]
    assert_eq!(boundary.0.len(), 2);

    // Reprojected rings land in plausible UTM 31N coordinates for Belgium
    for polygon in &boundary.0 {
        for coord in polygon.exterior().coords() {
            assert!(
                coord.x > 400_000.0 && coord.x < 800_000.0,
                "easting {} out of range",
                coord.x
            );
            assert!(
                coord.y > 5_400_000.0 && coord.y < 5_900_000.0,
                "northing {} out of range",
                coord.y
            );
        }
    }
}

#[test]
fn test_read_boundary_without_polygons_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.geojson");

    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [240000.0, 200000.0] }
            }
        ]
    }"#;
    std::fs::write(&path, geojson).unwrap();

    let result = BoundaryReader::read_boundary(&path, 31370, 32631);
    assert!(matches!(result, Err(SarError::InvalidFormat(_))));
}
