//! Overlap audit: checks a generated city model for intersecting building
//! footprints and zone boundaries.
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use urbansynth_core::audit::{audit_overlaps, OverlapKind, OverlapReport};
use urbansynth_core::CityModel;

/// Pairs listed per kind before truncating.
const SHOW_LIMIT: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "overlap_audit", about = "Detect overlapping buildings and zones in a city model")]
struct Args {
    /// City model JSON written by citygen
    #[arg(default_value = "city_model.json")]
    model: PathBuf,

    /// Exit with an error if any overlap is found
    #[arg(long)]
    strict: bool,

    /// Write the full report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

fn print_kind(report: &OverlapReport, kind: OverlapKind) {
    let label = match kind {
        OverlapKind::Building => "Buildings",
        OverlapKind::Zone     => "Zones",
    };
    let pairs: Vec<_> = report.overlaps.iter().filter(|o| o.kind == kind).collect();
    println!("{label}: {} overlapping pairs", pairs.len());
    for (i, o) in pairs.iter().take(SHOW_LIMIT).enumerate() {
        println!("  {}. {} <-> {}", i + 1, o.a, o.b);
        println!(
            "     zones: {} <-> {}",
            o.zone_a.as_deref().unwrap_or("unknown"),
            o.zone_b.as_deref().unwrap_or("unknown")
        );
        println!("     distance: {:.2}m", o.distance);
    }
    if pairs.len() > SHOW_LIMIT {
        println!("  ... and {} more", pairs.len() - SHOW_LIMIT);
    }
}

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

    info!(buildings = model.buildings.len(), zones = model.zones.len(), "auditing overlaps");
    let report = audit_overlaps(&model);

    print_kind(&report, OverlapKind::Building);
    print_kind(&report, OverlapKind::Zone);

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for b in &model.buildings {
        *by_type.entry(format!("{:?}", b.building_type)).or_default() += 1;
    }
    println!("Building types: {by_type:?}");

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    if args.strict && !report.is_clean() {
        bail!("{} overlapping pairs found", report.overlaps.len());
    }
    Ok(())
}
