use anyhow::Context;
use sarview::core::{BackscatterProcessor, PixelMask};
use sarview::io::{AuthClient, BoundaryReader, ProcessClient, ProcessRequest, SceneReader};
use sarview::viz::{PlotConfig, ScenePlotter};
use sarview::{load_evalscript, Credentials, JobConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = JobConfig::default();

    // Missing credentials are fatal: nothing downstream can succeed without them
    let credentials = Credentials::from_env()
        .context("CLIENT_ID / CLIENT_SECRET must be set (a .env file works too)")?;

    let auth = AuthClient::new(&config.token_url)?;
    let token = auth
        .fetch_token(&credentials)
        .context("Token exchange failed")?;

    let evalscript = load_evalscript(&config.evalscript_path)?;
    let request = ProcessRequest::for_job(&config, evalscript);

    let client = ProcessClient::new(&config.process_url)?;
    let image_bytes = client
        .fetch_scene(&token, &request)
        .context("Scene request failed")?;

    let scene = SceneReader::from_bytes(image_bytes).context("Could not decode returned raster")?;

    let vv_db = BackscatterProcessor::to_db(&scene.vv_linear);
    let vh_db = BackscatterProcessor::to_db(&scene.vh_linear);

    let vv_invalid = PixelMask::invalid_mask(&vv_db, &scene.data_mask);
    let vh_invalid = PixelMask::invalid_mask(&vh_db, &scene.data_mask);
    let vv_display = PixelMask::to_display(&vv_db, &vv_invalid);
    let vh_display = PixelMask::to_display(&vh_db, &vh_invalid);

    let boundary = BoundaryReader::read_boundary(
        &config.shapefile_path,
        config.shapefile_epsg,
        scene.bounds.epsg,
    )
    .context("Could not load field boundary")?;

    let plotter = ScenePlotter::new(PlotConfig {
        title: config.title.clone(),
        ..PlotConfig::default()
    });
    plotter.render(&scene, &vv_display, &vh_display, &boundary, &config.output_path)?;

    log::info!("Done: {}", config.output_path.display());
    Ok(())
}
