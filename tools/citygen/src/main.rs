//! City generator CLI: writes a city model as JSON and prints a summary.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use urbansynth_core::{
    CityGenerator, CityModel, CityRequest, CitySummary, GenerationConfig, TerrainProfile,
};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "citygen", about = "Generate a terrain-aware synthetic city model")]
struct Args {
    /// Terrain profile key (see --list-profiles). Unknown keys fall back to manhattan.
    #[arg(short, long, default_value = "manhattan")]
    profile: String,

    /// Seed string. Defaults to `geo-{profile}-{unix millis}`.
    #[arg(short, long)]
    seed: Option<String>,

    /// Partial terrain parameter override as JSON, e.g. '{"mountainHeight": 40}'
    #[arg(long)]
    custom: Option<String>,

    /// Generation config JSON (zone plan, cache capacity)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file; a directory when --batch is set
    #[arg(short, long, default_value = "city_model.json")]
    output: PathBuf,

    /// Generate N cities in parallel with seeds `{seed}-{i}`
    #[arg(long)]
    batch: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the profile catalog and exit
    #[arg(long)]
    list_profiles: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_seed(profile: &str) -> String {
    format!("geo-{profile}-{}", chrono::Utc::now().timestamp_millis())
}

fn batch_seeds(seed: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{seed}-{i}")).collect()
}

fn list_profiles() {
    println!("{:<14} {:<16} {:>9} {:>8} {:>6} {:>6} {:>10} {:>6}",
        "key", "name", "mountain", "water", "hills", "river", "coastal", "scale");
    for p in TerrainProfile::ALL {
        let t = p.parameters();
        println!("{:<14} {:<16} {:>9} {:>8} {:>6} {:>6} {:>10} {:>6}",
            p.key(), p.display_name(), t.mountain_height, t.water_level,
            t.hilliness, t.river_probability, t.coastal_distance, p.recommended_scale());
    }
}

fn write_model(model: &CityModel, path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(model)
    } else {
        serde_json::to_string(model)
    }
    .context("Failed to serialize city model")?;
    fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
}

/// Generate one city per seed in parallel. Results come back in seed order so
/// summaries can be printed without interleaving.
fn generate_batch(
    base: &CityRequest,
    seeds: &[String],
    config: &GenerationConfig,
    out_dir: &Path,
    pretty: bool,
) -> Vec<Result<(PathBuf, CitySummary)>> {
    seeds
        .par_iter()
        .map(|s| {
            let request = CityRequest { seed: s.clone(), ..base.clone() };
            let model = CityGenerator::new(&request, config)?.generate();
            let path = out_dir.join(format!("{}-{s}.json", model.metadata.terrain_profile));
            write_model(&model, &path, pretty)?;
            Ok((path, model.summary()))
        })
        .collect()
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    if args.list_profiles {
        list_profiles();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            GenerationConfig::from_json(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => GenerationConfig::default(),
    };
    config.validate().context("Invalid generation config")?;

    let seed = args.seed.clone().unwrap_or_else(|| default_seed(&args.profile));
    let base = CityRequest {
        profile: args.profile.clone(),
        seed: seed.clone(),
        custom_parameters: args.custom.clone(),
    };

    let Some(n) = args.batch else {
        let model = CityGenerator::new(&base, &config)?.generate();
        write_model(&model, &args.output, args.pretty)?;
        println!("{}", model.summary());
        println!("Wrote {}", args.output.display());
        return Ok(());
    };

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Cannot create {}", args.output.display()))?;
    info!(count = n, "batch generation");

    let results = generate_batch(&base, &batch_seeds(&seed, n), &config, &args.output, args.pretty);

    for result in results {
        let (path, summary) = result?;
        println!("{summary}");
        println!("Wrote {}\n", path.display());
    }
    Ok(())
}
