use crate::types::{BackscatterScene, BoundingBox, GeoTransform, SarError, SarResult};
use gdal::Dataset;
use ndarray::Array2;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Band layout of the Process API response: fixed, assumed order.
const BAND_VV: usize = 1;
const BAND_VH: usize = 2;
const BAND_DATAMASK: usize = 3;

static VSI_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reader for the 3-band GeoTIFF returned by the Process API
pub struct SceneReader;

impl SceneReader {
    /// Decode a scene from an in-memory TIFF byte buffer.
    ///
    /// The buffer is registered as a GDAL `/vsimem/` file for the duration
    /// of the read and unlinked before returning.
    pub fn from_bytes(bytes: Vec<u8>) -> SarResult<BackscatterScene> {
        if bytes.is_empty() {
            return Err(SarError::InvalidFormat(
                "empty response body, no raster to decode".to_string(),
            ));
        }

        let vsi_path = format!(
            "/vsimem/sarview_scene_{}.tif",
            VSI_COUNTER.fetch_add(1, Ordering::SeqCst)
        );
        gdal::vsi::create_mem_file(&vsi_path, bytes)?;

        let scene = Self::from_path(&vsi_path);

        if let Err(e) = gdal::vsi::unlink_mem_file(&vsi_path) {
            log::warn!("Failed to unlink {}: {}", vsi_path, e);
        }

        scene
    }

    /// Open a scene from a GeoTIFF path (regular file or VSI path).
    pub fn from_path<P: AsRef<Path>>(path: P) -> SarResult<BackscatterScene> {
        let path = path.as_ref();
        log::debug!("Opening scene raster: {}", path.display());

        let dataset = Dataset::open(path)?;

        let band_count = dataset.raster_count();
        if band_count != 3 {
            return Err(SarError::InvalidFormat(format!(
                "expected 3 bands (VV, VH, dataMask), raster has {}",
                band_count
            )));
        }

        let (width, height) = dataset.raster_size();
        let geo_transform = dataset.geo_transform()?;
        log::info!("Opened scene with {} bands, {}x{} pixels", band_count, width, height);

        let epsg = read_epsg(&dataset)?;

        let vv_linear = read_band(&dataset, BAND_VV, width, height)?;
        let vh_linear = read_band(&dataset, BAND_VH, width, height)?;
        let data_mask = read_band(&dataset, BAND_DATAMASK, width, height)?;

        let top_left_x = geo_transform[0];
        let top_left_y = geo_transform[3];
        let bottom_y = top_left_y + geo_transform[5] * height as f64;
        let right_x = top_left_x + geo_transform[1] * width as f64;

        let bounds = BoundingBox {
            min_x: top_left_x.min(right_x),
            min_y: top_left_y.min(bottom_y),
            max_x: top_left_x.max(right_x),
            max_y: top_left_y.max(bottom_y),
            epsg,
        };

        Ok(BackscatterScene {
            vv_linear,
            vh_linear,
            data_mask,
            bounds,
            geo_transform: GeoTransform {
                top_left_x: geo_transform[0],
                pixel_width: geo_transform[1],
                rotation_x: geo_transform[2],
                top_left_y: geo_transform[3],
                rotation_y: geo_transform[4],
                pixel_height: geo_transform[5],
            },
        })
    }
}

/// Read one band into a row-major 2D array
fn read_band(
    dataset: &Dataset,
    band_index: usize,
    width: usize,
    height: usize,
) -> SarResult<Array2<f32>> {
    let rasterband = dataset.rasterband(band_index as isize)?;
    let band_data = rasterband.read_as::<f32>((0, 0), (width, height), (width, height), None)?;

    Array2::from_shape_vec((height, width), band_data.data)
        .map_err(|e| SarError::Processing(format!("Failed to reshape band {}: {}", band_index, e)))
}

/// EPSG code of the dataset's projected CRS
fn read_epsg(dataset: &Dataset) -> SarResult<u32> {
    let mut spatial_ref = dataset.spatial_ref()?;

    let code = match spatial_ref.auth_code() {
        Ok(code) => code,
        Err(_) => {
            // WKT without an authority block still often identifies cleanly
            spatial_ref.auto_identify_epsg().map_err(|_| {
                SarError::InvalidFormat("raster CRS carries no EPSG identifier".to_string())
            })?;
            spatial_ref.auth_code()?
        }
    };

    Ok(code as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdal::raster::Buffer;
    use gdal::spatial_ref::SpatialRef;
    use gdal::DriverManager;

    /// Write a small 3-band georeferenced GTiff for decode tests
    fn write_test_scene(path: &std::path::Path, width: usize, height: usize) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<f32, _>(path, width as isize, height as isize, 3)
            .unwrap();

        dataset
            .set_geo_transform(&[694510.0, 10.0, 0.0, 5666790.0, 0.0, -10.0])
            .unwrap();
        dataset
            .set_spatial_ref(&SpatialRef::from_epsg(32631).unwrap())
            .unwrap();

        for band_index in 1..=3 {
            let data = vec![band_index as f32; width * height];
            let mut band = dataset.rasterband(band_index).unwrap();
            let buffer = Buffer::new((width, height), data);
            band.write((0, 0), (width, height), &buffer).unwrap();
        }
    }

    #[test]
    fn test_decode_three_band_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.tif");
        write_test_scene(&path, 4, 3);

        let scene = SceneReader::from_path(&path).unwrap();
        assert_eq!(scene.dim(), (3, 4));
        assert_eq!(scene.bounds.epsg, 32631);
        assert_eq!(scene.vv_linear[[0, 0]], 1.0);
        assert_eq!(scene.vh_linear[[0, 0]], 2.0);
        assert_eq!(scene.data_mask[[0, 0]], 3.0);

        // Bounds derived from the geotransform, north-up
        assert!((scene.bounds.min_x - 694510.0).abs() < 1e-6);
        assert!((scene.bounds.max_y - 5666790.0).abs() < 1e-6);
        assert!((scene.bounds.max_x - (694510.0 + 40.0)).abs() < 1e-6);
        assert!((scene.bounds.min_y - (5666790.0 - 30.0)).abs() < 1e-6);
    }

    #[test]
    fn test_from_bytes_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.tif");
        write_test_scene(&path, 2, 2);

        let bytes = std::fs::read(&path).unwrap();
        let scene = SceneReader::from_bytes(bytes).unwrap();
        assert_eq!(scene.dim(), (2, 2));
        assert_eq!(scene.bounds.epsg, 32631);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = SceneReader::from_bytes(b"this is not a tiff".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let result = SceneReader::from_bytes(Vec::new());
        assert!(matches!(result, Err(SarError::InvalidFormat(_))));
    }
}
