//! Terrain suitability scoring.
//!
//! Four normalised factors are derived from a terrain sample and combined by
//! per-use multiplicative rules into a single score in [0, 1].

use serde::{Deserialize, Serialize};

use crate::pois::PoiType;
use crate::terrain::TerrainField;
use crate::zones::ZoneType;

/// Normalised terrain factors at a point, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityFactors {
    /// 1 on flat ground, 0 at slope ≥ 0.1.
    pub flatness: f64,
    /// 1 at the shoreline, 0 at ≥ 3000 units from water.
    pub water_access: f64,
    /// 0 at height ≤ −50, 1 at height ≥ 150.
    pub elevation: f64,
    /// 1 at or above 0 m, 0 at ≤ −20 m.
    pub drainage: f64,
}

/// What a location is being scored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandUse {
    Residential,
    Commercial,
    Industrial,
    Downtown,
    Park,
    /// The only use allowed on water.
    Port,
    /// No terrain preference beyond staying on land.
    Unweighted,
}

impl LandUse {
    pub fn allows_water(self) -> bool {
        matches!(self, LandUse::Port)
    }
}

impl From<ZoneType> for LandUse {
    fn from(t: ZoneType) -> Self {
        match t {
            ZoneType::Residential => LandUse::Residential,
            ZoneType::Commercial  => LandUse::Commercial,
            ZoneType::Industrial  => LandUse::Industrial,
            ZoneType::Downtown    => LandUse::Downtown,
            ZoneType::Park        => LandUse::Park,
            ZoneType::Water       => LandUse::Port,
        }
    }
}

impl From<PoiType> for LandUse {
    fn from(t: PoiType) -> Self {
        match t {
            PoiType::Park => LandUse::Park,
            _ => LandUse::Unweighted,
        }
    }
}

/// Compute the four factors at `(x, y)`.
pub fn suitability_factors(terrain: &mut TerrainField, x: f64, y: f64) -> SuitabilityFactors {
    let height = terrain.height(x, y);
    let slope = terrain.slope(x, y);
    let water_distance = terrain.distance_to_water(x, y);
    factors_from_samples(height, slope, water_distance)
}

/// Factor formulas on raw samples.
pub fn factors_from_samples(height: f64, slope: f64, water_distance: f64) -> SuitabilityFactors {
    SuitabilityFactors {
        flatness: (1.0 - slope * 10.0).clamp(0.0, 1.0),
        water_access: (1.0 - water_distance / 3000.0).clamp(0.0, 1.0),
        elevation: ((height + 50.0) / 200.0).clamp(0.0, 1.0),
        drainage: (1.0 - (-height / 20.0).max(0.0)).clamp(0.0, 1.0),
    }
}

/// Score `(x, y)` for `land_use`, in [0, 1]. Water scores 0 unless the use allows it.
pub fn zone_suitability(terrain: &mut TerrainField, x: f64, y: f64, land_use: LandUse) -> f64 {
    if !land_use.allows_water() && terrain.is_water(x, y) {
        return 0.0;
    }
    let height = terrain.height(x, y);
    let factors = suitability_factors(terrain, x, y);
    score_use(land_use, &factors, height)
}

/// Per-use weighting rules. `height` is only consulted by the industrial rule.
pub fn score_use(land_use: LandUse, f: &SuitabilityFactors, height: f64) -> f64 {
    let mut s = 1.0;
    match land_use {
        LandUse::Downtown => {
            s *= f.flatness * 0.8 + 0.2;
            s *= f.water_access * 0.6 + 0.4;
            s *= f.drainage * 0.8 + 0.2;
        }
        LandUse::Residential => {
            s *= f.flatness * 0.4 + 0.6;
            s *= f.drainage * 0.9 + 0.1;
            if f.elevation > 0.3 {
                s *= 1.2;
            }
        }
        LandUse::Commercial => {
            s *= f.flatness * 0.6 + 0.4;
            s *= f.water_access * 0.5 + 0.5;
            s *= f.drainage * 0.8 + 0.2;
        }
        LandUse::Industrial => {
            s *= f.flatness * 0.9 + 0.1;
            s *= f.water_access * 0.7 + 0.3;
            // Low-lying ground near sea level.
            if height.abs() < 10.0 {
                s *= 1.3;
            }
        }
        LandUse::Park => {
            if f.elevation > 0.5 {
                s *= 1.5;
            }
            if f.flatness < 0.3 {
                s *= 1.3;
            }
        }
        LandUse::Port | LandUse::Unweighted => {}
    }
    s.clamp(0.0, 1.0)
}
