//! sarview: Sentinel-1 backscatter fetch and visualization
//!
//! Authenticates against the Copernicus Data Space Ecosystem, requests a
//! processed Sentinel-1 GRD scene through the Sentinel Hub Process API,
//! decodes the returned GeoTIFF, derives dB backscatter with invalid-pixel
//! masking, and renders a two-panel figure clipped to a field boundary.

pub mod config;
pub mod core;
pub mod io;
pub mod types;
pub mod viz;

// Re-export main types and functions for easier access
pub use types::{
    BackscatterScene, BoundingBox, GeoTransform, Polarization, SarError, SarResult, TimeRange,
};

pub use config::{load_evalscript, Credentials, JobConfig};
pub use core::{BackscatterProcessor, PixelMask};
pub use io::{AuthClient, BoundaryReader, ProcessClient, ProcessRequest, SceneReader};
pub use viz::{PlotConfig, ScenePlotter};
