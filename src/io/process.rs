use crate::config::JobConfig;
use crate::io::auth::AccessToken;
use crate::types::{SarError, SarResult};
use serde::Serialize;
use std::time::Duration;

/// Process API request document.
///
/// Field names mirror the Sentinel Hub schema exactly; the evalscript is an
/// opaque blob read from disk and embedded verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub input: Input,
    pub output: Output,
    pub evalscript: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Input {
    pub bounds: Bounds,
    pub data: Vec<DataSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bounds {
    pub bbox: [f64; 4],
    pub properties: BoundsProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundsProperties {
    pub crs: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSpec {
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(rename = "dataFilter")]
    pub data_filter: DataFilter,
    pub processing: Processing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFilter {
    pub time_range: ApiTimeRange,
    pub mosaicking_order: String,
    pub resolution: String,
    pub acquisition_mode: String,
    pub polarization: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiTimeRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Processing {
    // The API accepts the flag as a string, matching the upstream schema
    pub orthorectify: String,
    pub dem_instance: String,
    pub back_coeff: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Output {
    pub resx: f64,
    pub resy: f64,
    pub responses: Vec<ResponseSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSpec {
    pub identifier: String,
    pub format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ProcessRequest {
    /// Build the sentinel-1-grd request for one job: most-recent mosaicking,
    /// HIGH resolution, IW mode, dual polarization, orthorectified gamma0
    /// terrain backscatter, single single-band-stack TIFF response.
    pub fn for_job(config: &JobConfig, evalscript: String) -> Self {
        Self {
            input: Input {
                bounds: Bounds {
                    bbox: config.bbox.as_array(),
                    properties: BoundsProperties {
                        crs: format!(
                            "http://www.opengis.net/def/crs/EPSG/0/{}",
                            config.bbox.epsg
                        ),
                    },
                },
                data: vec![DataSpec {
                    data_type: "sentinel-1-grd".to_string(),
                    data_filter: DataFilter {
                        time_range: ApiTimeRange {
                            from: config.time_range.from.to_rfc3339(),
                            to: config.time_range.to.to_rfc3339(),
                        },
                        mosaicking_order: "mostRecent".to_string(),
                        resolution: "HIGH".to_string(),
                        acquisition_mode: "IW".to_string(),
                        polarization: "DV".to_string(),
                    },
                    processing: Processing {
                        orthorectify: "true".to_string(),
                        dem_instance: "COPERNICUS_30".to_string(),
                        back_coeff: "GAMMA0_TERRAIN".to_string(),
                    },
                }],
            },
            output: Output {
                resx: config.resolution.0,
                resy: config.resolution.1,
                responses: vec![ResponseSpec {
                    identifier: "default".to_string(),
                    format: ResponseFormat {
                        mime_type: "image/tiff".to_string(),
                    },
                }],
            },
            evalscript,
        }
    }
}

/// Client for the Process API endpoint. One request per job, no retries.
pub struct ProcessClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl ProcessClient {
    pub fn new(url: &str) -> SarResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(concat!("sarview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SarError::Http)?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Send the request and return the raw TIFF bytes.
    ///
    /// Success is exactly HTTP 200; anything else halts the pipeline with
    /// the status code and whatever body the server produced.
    pub fn fetch_scene(
        &self,
        token: &AccessToken,
        request: &ProcessRequest,
    ) -> SarResult<Vec<u8>> {
        log::info!("Requesting scene for bbox {:?}", request.input.bounds.bbox);
        if let Some(data) = request.input.data.first() {
            log::debug!(
                "Time range {} - {}",
                data.data_filter.time_range.from,
                data.data_filter.time_range.to
            );
        }

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token.bearer())
            .json(request)
            .send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            log::error!("Process API request failed: {}", status.as_u16());
            return Err(SarError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let bytes = response.bytes()?;
        log::info!("Received image data ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }
}
