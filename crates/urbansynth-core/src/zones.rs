//! Zone placement: biased random search for well-suited, separated sites.
//!
//! Each requested zone instance gets a fixed budget of uniformly drawn
//! candidates inside the placement square. Candidates too close to an already
//! placed zone are rejected; the best-scoring survivor is kept and committed
//! only when its score clears the acceptance threshold. Otherwise the instance
//! is skipped and the city simply has fewer zones of that type.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{polygon_center, rectangle, Bounds, Point2};
use crate::rng::CityRng;
use crate::suitability::zone_suitability;
use crate::terrain::TerrainField;

/// Candidates drawn per zone instance.
pub const ZONE_ATTEMPTS: usize = 50;
/// Half-extent of the square candidates are drawn from.
pub const PLACEMENT_HALF_EXTENT: f64 = 4000.0;
/// Minimum centre distance to an existing zone.
pub const MIN_ZONE_SEPARATION: f64 = 1000.0;
/// Best score must exceed this for the zone to be created.
pub const ZONE_ACCEPT_THRESHOLD: f64 = 0.2;

/// Land-use category of a zone. Discriminants match the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    Residential = 0,
    Commercial = 1,
    Industrial = 2,
    Downtown = 3,
    Park = 4,
    Water = 5,
}

impl ZoneType {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn key(self) -> &'static str {
        match self {
            ZoneType::Residential => "residential",
            ZoneType::Commercial  => "commercial",
            ZoneType::Industrial  => "industrial",
            ZoneType::Downtown    => "downtown",
            ZoneType::Park        => "park",
            ZoneType::Water       => "water",
        }
    }

    /// Fixed development density.
    pub fn density(self) -> f64 {
        match self {
            ZoneType::Downtown   => 0.95,
            ZoneType::Commercial => 0.8,
            ZoneType::Industrial => 0.7,
            _ => 0.6,
        }
    }
}

/// A placed zone. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub zone_type: ZoneType,
    /// Axis-aligned rectangle, four corners counter-clockwise.
    pub boundary: Vec<Point2>,
    pub density: f64,
    pub terrain_suitability: f64,
    pub terrain_height: f64,
    pub terrain_slope: f64,
}

impl Zone {
    pub fn center(&self) -> Point2 {
        polygon_center(&self.boundary)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::of_points(&self.boundary).unwrap_or(Bounds::square(0.0))
    }
}

/// `count` zones of `zone_type`, each `width` × `height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRequest {
    pub zone_type: ZoneType,
    pub count: u32,
    pub width: f64,
    pub height: f64,
}

impl ZoneRequest {
    pub fn new(zone_type: ZoneType, count: u32, width: f64, height: f64) -> Self {
        Self { zone_type, count, width, height }
    }
}

/// Default city layout, placed in this order.
pub fn default_zone_plan() -> Vec<ZoneRequest> {
    vec![
        ZoneRequest::new(ZoneType::Downtown,    1, 1500.0, 1000.0),
        ZoneRequest::new(ZoneType::Residential, 6, 1200.0,  800.0),
        ZoneRequest::new(ZoneType::Commercial,  3,  800.0,  600.0),
        ZoneRequest::new(ZoneType::Industrial,  2, 1000.0,  800.0),
        ZoneRequest::new(ZoneType::Park,        3,  600.0,  600.0),
    ]
}

/// Search for one zone of the requested type. `None` when no candidate clears
/// the acceptance threshold.
pub fn place_zone(
    terrain: &mut TerrainField,
    rng: &mut CityRng,
    placed: &[Zone],
    request: &ZoneRequest,
) -> Option<Zone> {
    let centers: Vec<Point2> = placed.iter().map(Zone::center).collect();
    let mut best: Option<Point2> = None;
    let mut best_score = 0.0;

    for _ in 0..ZONE_ATTEMPTS {
        let candidate = Point2::new(
            rng.symmetric(PLACEMENT_HALF_EXTENT),
            rng.symmetric(PLACEMENT_HALF_EXTENT),
        );
        if centers.iter().any(|c| c.distance(candidate) < MIN_ZONE_SEPARATION) {
            continue;
        }
        let score = zone_suitability(terrain, candidate.x, candidate.y, request.zone_type.into());
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }

    let Some(site) = best.filter(|_| best_score > ZONE_ACCEPT_THRESHOLD) else {
        debug!(
            zone_type = request.zone_type.key(),
            best_score, "no site cleared the zone threshold; skipping"
        );
        return None;
    };

    let zone = Zone {
        id: format!("{}_{}", request.zone_type.key(), placed.len()),
        zone_type: request.zone_type,
        boundary: rectangle(site, request.width, request.height),
        density: request.zone_type.density(),
        terrain_suitability: best_score,
        terrain_height: terrain.height(site.x, site.y),
        terrain_slope: terrain.slope(site.x, site.y),
    };
    debug!(
        id = %zone.id,
        x = site.x,
        y = site.y,
        suitability = best_score,
        "zone placed"
    );
    Some(zone)
}

/// Place every instance of every request, in plan order.
pub fn place_zones(terrain: &mut TerrainField, rng: &mut CityRng, plan: &[ZoneRequest]) -> Vec<Zone> {
    let mut zones = Vec::new();
    for request in plan {
        for _ in 0..request.count {
            if let Some(zone) = place_zone(terrain, rng, &zones, request) {
                zones.push(zone);
            }
        }
    }
    zones
}
