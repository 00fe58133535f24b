//! Two-panel backscatter visualization
//!
//! Renders the VV and VH dB bands side by side in projected map
//! coordinates, with invalid pixels in red, everything outside the field
//! boundary painted opaque white, a horizontal colorbar per panel and a
//! legend entry for the sentinel color.

use crate::core::backscatter::{DISPLAY_MAX_DB, NOISE_FLOOR_DB};
use crate::core::mask::outside_boundary_mask;
use crate::types::{BackscatterScene, Polarization, SarError, SarRealImage, SarResult};
use geo::MultiPolygon;
use ndarray::Array2;
use plotters::prelude::*;
use std::path::Path;

/// Figure layout parameters
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 760,
            title: "Sentinel-1 SAR Backscatter Analysis".to_string(),
        }
    }
}

/// Renderer for a decoded, masked scene
pub struct ScenePlotter {
    config: PlotConfig,
}

impl ScenePlotter {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    /// Draw both polarization panels and write the figure as PNG.
    ///
    /// `vv_display` / `vh_display` are dB bands with invalid pixels already
    /// substituted by NaN.
    pub fn render<P: AsRef<Path>>(
        &self,
        scene: &BackscatterScene,
        vv_display: &SarRealImage,
        vh_display: &SarRealImage,
        boundary: &MultiPolygon<f64>,
        output_path: P,
    ) -> SarResult<()> {
        let output_path = output_path.as_ref();
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let outside = outside_boundary_mask(&scene.geo_transform, scene.dim(), boundary);

        let root = BitMapBackend::new(output_path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let titled = root
            .titled(&self.config.title, ("sans-serif", 24))
            .map_err(render_err)?;

        let panels = titled.split_evenly((1, 2));
        self.draw_panel(&panels[0], Polarization::VV, scene, vv_display, &outside)?;
        self.draw_panel(&panels[1], Polarization::VH, scene, vh_display, &outside)?;

        root.present().map_err(render_err)?;
        log::info!("Figure written to {}", output_path.display());
        Ok(())
    }

    fn draw_panel(
        &self,
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
        polarization: Polarization,
        scene: &BackscatterScene,
        display: &SarRealImage,
        outside: &Array2<bool>,
    ) -> SarResult<()> {
        let (chart_area, bar_area) = area.split_vertically(self.config.height as i32 - 220);

        let bounds = &scene.bounds;
        let mut chart = ChartBuilder::on(&chart_area)
            .caption(format!("{} Polarization (dB)", polarization), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d(bounds.min_x..bounds.max_x, bounds.min_y..bounds.max_y)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(format!("Easting (m) - EPSG:{}", bounds.epsg))
            .y_desc(format!("Northing (m) - EPSG:{}", bounds.epsg))
            // Full coordinates, no scientific notation or offset
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(render_err)?;

        let gt = &scene.geo_transform;
        let (rows, cols) = display.dim();
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let x0 = gt.top_left_x + col as f64 * gt.pixel_width;
                let x1 = x0 + gt.pixel_width;
                let y0 = gt.top_left_y + row as f64 * gt.pixel_height;
                let y1 = y0 + gt.pixel_height;

                let color = if outside[[row, col]] {
                    // Screen-space boundary mask: opaque white outside the field
                    WHITE.to_rgba()
                } else {
                    let value = display[[row, col]];
                    if value.is_nan() {
                        RED.to_rgba()
                    } else {
                        backscatter_color(value).to_rgba()
                    }
                };

                cells.push(Rectangle::new([(x0, y0), (x1, y1)], color.filled()));
            }
        }
        chart.draw_series(cells).map_err(render_err)?;

        // Legend entry for the sentinel color
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(bounds.min_x, bounds.min_y), (bounds.min_x, bounds.min_y)],
                RED.filled(),
            )))
            .map_err(render_err)?
            .label("No Data / Noise")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        self.draw_colorbar(&bar_area)
    }

    /// Horizontal colorbar spanning the display range
    fn draw_colorbar(
        &self,
        area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    ) -> SarResult<()> {
        let mut bar = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(90)
            .build_cartesian_2d(
                NOISE_FLOOR_DB as f64..DISPLAY_MAX_DB as f64,
                0.0_f64..1.0_f64,
            )
            .map_err(render_err)?;

        bar.configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_desc("Backscatter (dB)")
            .x_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(render_err)?;

        const STEPS: usize = 200;
        let span = (DISPLAY_MAX_DB - NOISE_FLOOR_DB) as f64;
        let step = span / STEPS as f64;
        let swatches = (0..STEPS).map(|i| {
            let x0 = NOISE_FLOOR_DB as f64 + i as f64 * step;
            let color = backscatter_color((x0 + step / 2.0) as f32);
            Rectangle::new([(x0, 0.0), (x0 + step, 1.0)], color.filled())
        });
        bar.draw_series(swatches).map_err(render_err)?;

        Ok(())
    }
}

/// Cividis-style perceptual anchors (dark blue to yellow), evaluated in
/// reverse so the noise floor renders yellow and strong returns dark blue,
/// matching the reversed colormap of the reference figure
const COLORMAP_ANCHORS: [(u8, u8, u8); 6] = [
    (0, 32, 77),
    (49, 68, 107),
    (87, 96, 110),
    (135, 132, 120),
    (189, 171, 103),
    (255, 234, 70),
];

/// Map a dB value to its display color, clipped to the display range
pub fn backscatter_color(db: f32) -> RGBColor {
    let span = DISPLAY_MAX_DB - NOISE_FLOOR_DB;
    let t = ((db - NOISE_FLOOR_DB) / span).clamp(0.0, 1.0) as f64;
    colormap_lookup(1.0 - t)
}

fn colormap_lookup(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (COLORMAP_ANCHORS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(COLORMAP_ANCHORS.len() - 2);
    let frac = scaled - idx as f64;

    let (r0, g0, b0) = COLORMAP_ANCHORS[idx];
    let (r1, g1, b1) = COLORMAP_ANCHORS[idx + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

fn render_err<E: std::fmt::Display>(e: E) -> SarError {
    SarError::Render(e.to_string())
}
