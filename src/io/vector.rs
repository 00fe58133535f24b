use crate::types::{SarError, SarResult};
use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal::vector::LayerAccess;
use gdal::Dataset;
use geo::MultiPolygon;
use std::path::Path;

/// Reader for the field-boundary shapefile.
///
/// Shapefiles in this pipeline arrive without usable CRS metadata, so the
/// source CRS is assigned rather than read, then every polygon is
/// reprojected into the raster CRS.
pub struct BoundaryReader;

impl BoundaryReader {
    /// Load all polygon features and reproject them from `source_epsg` to
    /// `target_epsg`. Features of other geometry types are skipped with a
    /// warning.
    pub fn read_boundary<P: AsRef<Path>>(
        path: P,
        source_epsg: u32,
        target_epsg: u32,
    ) -> SarResult<MultiPolygon<f64>> {
        let path = path.as_ref();
        log::info!(
            "Loading boundary from {} (EPSG:{} -> EPSG:{})",
            path.display(),
            source_epsg,
            target_epsg
        );

        let dataset = Dataset::open(path)?;
        let mut layer = dataset.layer(0)?;
        let transform = Self::build_transform(source_epsg, target_epsg)?;

        let mut polygons = Vec::new();
        for feature in layer.features() {
            let geometry = match feature.geometry() {
                Some(g) => g,
                None => continue,
            };

            let mut reprojected = geometry.clone();
            reprojected.transform_inplace(&transform)?;

            match geo::Geometry::<f64>::try_from(&reprojected)? {
                geo::Geometry::Polygon(polygon) => polygons.push(polygon),
                geo::Geometry::MultiPolygon(multi) => polygons.extend(multi.0),
                other => {
                    log::warn!("Skipping non-polygon feature: {}", geometry_kind(&other));
                }
            }
        }

        if polygons.is_empty() {
            return Err(SarError::InvalidFormat(format!(
                "no polygon features found in {}",
                path.display()
            )));
        }

        log::info!("Loaded {} boundary polygon(s)", polygons.len());
        Ok(MultiPolygon(polygons))
    }

    /// Coordinate transform between two EPSG codes with axis order pinned
    /// to traditional GIS (easting, northing).
    pub fn build_transform(source_epsg: u32, target_epsg: u32) -> SarResult<CoordTransform> {
        let source = spatial_ref(source_epsg)?;
        let target = spatial_ref(target_epsg)?;
        Ok(CoordTransform::new(&source, &target)?)
    }
}

fn spatial_ref(epsg: u32) -> SarResult<SpatialRef> {
    let sr = SpatialRef::from_epsg(epsg)?;
    sr.set_axis_mapping_strategy(gdal_sys::OSRAxisMappingStrategy::OAMS_TRADITIONAL_GIS_ORDER);
    Ok(sr)
}

fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
