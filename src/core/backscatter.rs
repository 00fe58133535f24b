use crate::types::SarRealImage;

/// Additive epsilon applied before the logarithm so that zero-power pixels
/// stay finite (dB(0) = -100)
pub const DB_EPSILON: f32 = 1e-10;

/// Pixels below this backscatter level are treated as noise
pub const NOISE_FLOOR_DB: f32 = -22.0;

/// Upper end of the display range
pub const DISPLAY_MAX_DB: f32 = 0.0;

/// Backscatter conversion between linear power and dB scale
pub struct BackscatterProcessor;

impl BackscatterProcessor {
    /// Convert a linear-power band to dB: `10 * log10(x + epsilon)`.
    ///
    /// Monotonic for x >= 0 and finite everywhere on that domain.
    pub fn to_db(linear_data: &SarRealImage) -> SarRealImage {
        log::debug!("Converting {} pixels to dB scale", linear_data.len());

        linear_data.mapv(db_value)
    }
}

/// Scalar linear-power to dB conversion
#[inline]
pub fn db_value(linear: f32) -> f32 {
    10.0 * (linear + DB_EPSILON).log10()
}
