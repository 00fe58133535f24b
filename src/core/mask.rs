use crate::core::backscatter::NOISE_FLOOR_DB;
use crate::types::{GeoTransform, SarRealImage};
use geo::{Contains, MultiPolygon, Point};
use ndarray::{Array2, Zip};

/// Invalid-pixel masking for one polarization.
///
/// A pixel is invalid when the acquisition data mask flags it as nodata, or
/// when its backscatter falls below the noise floor. The two polarizations
/// get independent masks because their noise behavior differs.
pub struct PixelMask;

impl PixelMask {
    /// Per-pixel invalid predicate: `data_mask == 0 || db < NOISE_FLOOR_DB`.
    /// The comparison is strict, so a pixel at exactly the floor is data.
    #[inline]
    pub fn is_invalid(data_mask: f32, db: f32) -> bool {
        data_mask == 0.0 || db < NOISE_FLOOR_DB
    }

    /// Boolean invalid mask for one dB band
    pub fn invalid_mask(db_band: &SarRealImage, data_mask: &SarRealImage) -> Array2<bool> {
        let mut mask = Array2::from_elem(db_band.dim(), false);
        Zip::from(&mut mask)
            .and(db_band)
            .and(data_mask)
            .for_each(|m, &db, &valid| {
                *m = Self::is_invalid(valid, db);
            });

        let flagged = mask.iter().filter(|&&m| m).count();
        log::debug!(
            "Invalid mask: {} of {} pixels flagged",
            flagged,
            mask.len()
        );
        mask
    }

    /// Display copy of a dB band with invalid pixels replaced by NaN, the
    /// sentinel the renderer colors separately
    pub fn to_display(db_band: &SarRealImage, invalid: &Array2<bool>) -> SarRealImage {
        let mut display = db_band.clone();
        Zip::from(&mut display).and(invalid).for_each(|v, &bad| {
            if bad {
                *v = f32::NAN;
            }
        });
        display
    }
}

/// Boundary clipping mask: true where a pixel center falls outside the
/// field boundary. The renderer paints these pixels opaque white so only
/// the area of interest shows through.
pub fn outside_boundary_mask(
    geo_transform: &GeoTransform,
    dim: (usize, usize),
    boundary: &MultiPolygon<f64>,
) -> Array2<bool> {
    let (rows, cols) = dim;
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let x = geo_transform.top_left_x + (col as f64 + 0.5) * geo_transform.pixel_width;
        let y = geo_transform.top_left_y + (row as f64 + 0.5) * geo_transform.pixel_height;
        !boundary.contains(&Point::new(x, y))
    })
}
