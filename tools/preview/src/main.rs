//! Top-down PNG preview of a city model: terrain shading, zone outlines,
//! roads and POIs. Diagnostic only.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;
use urbansynth_core::geometry::{Bounds, Point2};
use urbansynth_core::rng::noise_seed;
use urbansynth_core::terrain::{cache, TerrainField};
use urbansynth_core::zones::ZoneType;
use urbansynth_core::CityModel;

#[derive(Parser, Debug)]
#[command(name = "preview", about = "Render a city model to a PNG")]
struct Args {
    /// City model JSON written by citygen
    #[arg(default_value = "city_model.json")]
    model: PathBuf,

    #[arg(short, long, default_value = "city_preview.png")]
    output: PathBuf,

    /// Image side in pixels
    #[arg(long, default_value = "512")]
    size: u32,
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn zone_color(zone_type: ZoneType) -> [u8; 3] {
    match zone_type {
        ZoneType::Residential => [ 80, 180,  80], // green
        ZoneType::Commercial  => [ 70, 110, 220], // blue
        ZoneType::Industrial  => [200, 140,  40], // amber
        ZoneType::Downtown    => [220,  50,  50], // red
        ZoneType::Park        => [ 30, 120,  30], // dark green
        ZoneType::Water       => [ 40,  90, 200],
    }
}

/// Height relative to sea level → shaded land or water.
fn terrain_color(height: f64, water_level: f64, relief: f64) -> [u8; 3] {
    if height < water_level {
        let t = ((water_level - height) / relief).clamp(0.0, 1.0);
        [30, (110.0 - 60.0 * t) as u8, (200.0 - 60.0 * t) as u8]
    } else {
        let t = ((height - water_level) / relief).clamp(0.0, 1.0);
        let c = (170.0 + 70.0 * t) as u8;
        [c, c, (150.0 + 60.0 * t) as u8]
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

struct Canvas {
    img: RgbImage,
    world: Bounds,
}

impl Canvas {
    fn new(size: u32, world: Bounds) -> Self {
        Self { img: RgbImage::new(size, size), world }
    }

    fn size(&self) -> u32 {
        self.img.width()
    }

    /// World point → pixel, y up.
    fn to_pixel(&self, p: Point2) -> (i64, i64) {
        let s = self.size() as f64;
        let px = (p.x - self.world.min_x) / self.world.width() * s;
        let py = (self.world.max_y - p.y) / self.world.height() * s;
        (px.floor() as i64, py.floor() as i64)
    }

    fn to_world(&self, px: u32, py: u32) -> Point2 {
        let s = self.size() as f64;
        Point2::new(
            self.world.min_x + (px as f64 + 0.5) / s * self.world.width(),
            self.world.max_y - (py as f64 + 0.5) / s * self.world.height(),
        )
    }

    fn put(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.size() && (y as u32) < self.size() {
            self.img.put_pixel(x as u32, y as u32, Rgb(rgb));
        }
    }

    fn line(&mut self, a: Point2, b: Point2, rgb: [u8; 3]) {
        let (x0, y0) = self.to_pixel(a);
        let (x1, y1) = self.to_pixel(b);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = x0 as f64 + (x1 - x0) as f64 * t;
            let y = y0 as f64 + (y1 - y0) as f64 * t;
            self.put(x.round() as i64, y.round() as i64, rgb);
        }
    }

    fn polyline(&mut self, points: &[Point2], closed: bool, rgb: [u8; 3]) {
        for w in points.windows(2) {
            self.line(w[0], w[1], rgb);
        }
        if let (true, Some(&first), Some(&last)) = (closed, points.first(), points.last()) {
            self.line(last, first, rgb);
        }
    }

    fn dot(&mut self, p: Point2, radius: i64, rgb: [u8; 3]) {
        let (cx, cy) = self.to_pixel(p);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put(cx + dx, cy + dy, rgb);
                }
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let text = fs::read_to_string(&args.model)
        .with_context(|| format!("Cannot read {}", args.model.display()))?;
    let model: CityModel = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", args.model.display()))?;

    let params = model.metadata.terrain_parameters;
    let mut terrain =
        TerrainField::new(params, noise_seed(&model.metadata.seed), cache::default_capacity());
    let relief = params.mountain_height.abs().max(1.0);
    let mut canvas = Canvas::new(args.size.max(1), model.bounds);

    // ── 1. Terrain ──────────────────────────────────────────────────────────
    info!(size = canvas.size(), "shading terrain");
    for py in 0..canvas.size() {
        for px in 0..canvas.size() {
            let p = canvas.to_world(px, py);
            let rgb = terrain_color(terrain.height(p.x, p.y), params.water_level, relief);
            canvas.put(px as i64, py as i64, rgb);
        }
    }

    // ── 2. Zones ────────────────────────────────────────────────────────────
    for zone in &model.zones {
        canvas.polyline(&zone.boundary, true, zone_color(zone.zone_type));
    }

    // ── 3. Roads ────────────────────────────────────────────────────────────
    for road in &model.roads {
        canvas.polyline(&road.path, false, [60, 60, 60]);
    }

    // ── 4. POIs (landmarks larger, magenta) ─────────────────────────────────
    for poi in &model.pois {
        if poi.is_landmark() {
            canvas.dot(poi.position, 4, [220, 0, 220]);
        } else {
            canvas.dot(poi.position, 1, [20, 20, 20]);
        }
    }

    canvas
        .img
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
