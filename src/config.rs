//! Credential and job configuration
//!
//! Credentials come from the environment (with `.env` support); everything
//! else carries fixed defaults for the Kinrooi agricultural field scene.

use crate::types::{BoundingBox, SarError, SarResult, TimeRange};
use chrono::{TimeZone, Utc};
use std::path::{Path, PathBuf};

/// CDSE identity endpoint (OAuth2 client-credentials grant)
pub const DEFAULT_TOKEN_URL: &str =
    "https://identity.dataspace.copernicus.eu/auth/realms/CDSE/protocol/openid-connect/token";

/// Sentinel Hub Process API endpoint on the Copernicus Data Space
pub const DEFAULT_PROCESS_URL: &str = "https://sh.dataspace.copernicus.eu/api/v1/process";

/// OAuth2 client credentials for the Copernicus Data Space
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Load `CLIENT_ID` / `CLIENT_SECRET` from the environment, reading a
    /// `.env` file first if one is present. Missing either is fatal.
    pub fn from_env() -> SarResult<Self> {
        // Best effort: absence of a .env file is fine, the variables may be set directly
        if dotenvy::dotenv().is_ok() {
            log::debug!("Loaded credentials environment from .env file");
        }

        let client_id = std::env::var("CLIENT_ID")
            .map_err(|_| SarError::Config("CLIENT_ID not set".to_string()))?;
        let client_secret = std::env::var("CLIENT_SECRET")
            .map_err(|_| SarError::Config("CLIENT_SECRET not set".to_string()))?;

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(SarError::Config(
                "CLIENT_ID or CLIENT_SECRET is empty".to_string(),
            ));
        }

        log::info!("Credentials loaded from environment");
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

/// Parameters of one fetch-and-render job
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Area of interest in the projected output CRS
    pub bbox: BoundingBox,
    /// Acquisition time window
    pub time_range: TimeRange,
    /// Output resolution in meters per pixel (x, y)
    pub resolution: (f64, f64),
    /// Evalscript passed verbatim to the Process API
    pub evalscript_path: PathBuf,
    /// Field boundary shapefile
    pub shapefile_path: PathBuf,
    /// CRS the shapefile coordinates are expressed in
    pub shapefile_epsg: u32,
    /// Rendered figure destination
    pub output_path: PathBuf,
    /// Figure title
    pub title: String,
    pub token_url: String,
    pub process_url: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            // Kinrooi agricultural field, UTM zone 31N
            bbox: BoundingBox {
                min_x: 694512.806609,
                min_y: 5666404.740308,
                max_x: 694896.980069,
                max_y: 5666790.60716,
                epsg: 32631,
            },
            time_range: TimeRange {
                from: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
                to: Utc.with_ymd_and_hms(2023, 6, 30, 23, 59, 59).unwrap(),
            },
            resolution: (10.0, 10.0),
            evalscript_path: PathBuf::from("assets/evalscript.js"),
            shapefile_path: PathBuf::from("input/VL_kinrooi_2023.shp"),
            // BD72 / Belgian Lambert 72
            shapefile_epsg: 31370,
            output_path: PathBuf::from("plots/s1_backscatter_kinrooi.png"),
            title: "Sentinel-1 SAR Backscatter Analysis - Kinrooi Agricultural Field (June 2023)"
                .to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            process_url: DEFAULT_PROCESS_URL.to_string(),
        }
    }
}

/// Read the evalscript verbatim. Its content is opaque to this crate.
pub fn load_evalscript<P: AsRef<Path>>(path: P) -> SarResult<String> {
    let path = path.as_ref();
    log::debug!("Reading evalscript from: {}", path.display());

    let script = std::fs::read_to_string(path).map_err(|e| {
        SarError::Config(format!("Failed to read evalscript {}: {}", path.display(), e))
    })?;

    if script.trim().is_empty() {
        return Err(SarError::Config(format!(
            "Evalscript {} is empty",
            path.display()
        )));
    }

    Ok(script)
}
