use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Real-valued intensity or backscatter data
pub type SarReal = f32;

/// 2D real SAR data array (row x column)
pub type SarRealImage = Array2<SarReal>;

/// Polarization channels for Sentinel-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    VV,
    VH,
    HV,
    HH,
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarization::VV => write!(f, "VV"),
            Polarization::VH => write!(f, "VH"),
            Polarization::HV => write!(f, "HV"),
            Polarization::HH => write!(f, "HH"),
        }
    }
}

/// Projected bounding box (easting/northing in meters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// EPSG code of the projected CRS
    pub epsg: u32,
}

impl BoundingBox {
    /// Coordinates in [min_x, min_y, max_x, max_y] order, as the Process API expects
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Extent in meters (width, height)
    pub fn extent(&self) -> (f64, f64) {
        (self.max_x - self.min_x, self.max_y - self.min_y)
    }
}

/// Acquisition time window, serialized as an RFC3339 interval on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from.to_rfc3339(), self.to.to_rfc3339())
    }
}

/// Geospatial transformation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

/// Decoded Process API scene: linear-power bands plus the data mask,
/// with the georeferencing needed to draw it
#[derive(Debug, Clone)]
pub struct BackscatterScene {
    pub vv_linear: SarRealImage,
    pub vh_linear: SarRealImage,
    pub data_mask: SarRealImage,
    pub bounds: BoundingBox,
    pub geo_transform: GeoTransform,
}

impl BackscatterScene {
    /// Raster dimensions (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.vv_linear.dim()
    }
}

/// Error types for the fetch/decode/render pipeline
#[derive(Debug, thiserror::Error)]
pub enum SarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Process API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rendering error: {0}")]
    Render(String),
}

/// Result type for pipeline operations
pub type SarResult<T> = Result<T, SarError>;
