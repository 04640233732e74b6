//! Pipeline orchestrator: runs all generation stages in order.

use std::num::NonZeroUsize;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buildings::synthesize_buildings;
use crate::error::GenerationError;
use crate::model::CityModel;
use crate::pois::place_pois;
use crate::profiles::{resolve_parameters, TerrainParameters, TerrainProfile};
use crate::rng::{noise_seed, CityRng};
use crate::roads::build_road_network;
use crate::terrain::{cache, TerrainField};
use crate::zones::{default_zone_plan, place_zones, ZoneRequest};

/// Upper bound on zone instances per city. The road graph is complete, so road
/// count grows quadratically with this.
pub const MAX_ZONE_INSTANCES: u64 = 1000;

// ── Public structs ────────────────────────────────────────────────────────────

/// Tunables that are not part of the terrain profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Zone requests, placed in order.
    pub zone_plan: Vec<ZoneRequest>,
    /// Terrain height cache size in cells.
    pub terrain_cache_capacity: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            zone_plan: default_zone_plan(),
            terrain_cache_capacity: cache::DEFAULT_CAPACITY,
        }
    }
}

impl GenerationConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject mechanically invalid inputs. Returns the cache capacity.
    pub fn validate(&self) -> Result<NonZeroUsize, GenerationError> {
        for (index, r) in self.zone_plan.iter().enumerate() {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(r.width) || !valid(r.height) {
                return Err(GenerationError::InvalidZoneSize {
                    index,
                    zone_type: r.zone_type,
                    width: r.width,
                    height: r.height,
                });
            }
        }
        let requested: u64 = self.zone_plan.iter().map(|r| r.count as u64).sum();
        if requested > MAX_ZONE_INSTANCES {
            return Err(GenerationError::TooManyZones { requested, limit: MAX_ZONE_INSTANCES });
        }
        NonZeroUsize::new(self.terrain_cache_capacity).ok_or(GenerationError::ZeroCacheCapacity)
    }
}

/// What to generate: profile name, seed, optional custom override JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRequest {
    pub profile: String,
    pub seed: String,
    pub custom_parameters: Option<String>,
}

impl CityRequest {
    pub fn new(profile: impl Into<String>, seed: impl Into<String>) -> Self {
        Self { profile: profile.into(), seed: seed.into(), custom_parameters: None }
    }

    pub fn with_custom(mut self, json: impl Into<String>) -> Self {
        self.custom_parameters = Some(json.into());
        self
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// One generation run. Owns the noise source, PRNG and terrain cache; nothing
/// is shared between generators, so independent generators may run on
/// different threads without affecting each other's output.
pub struct CityGenerator {
    seed: String,
    profile: TerrainProfile,
    terrain: TerrainField,
    rng: CityRng,
    zone_plan: Vec<ZoneRequest>,
}

impl CityGenerator {
    /// Validate `config` and resolve the profile and parameters.
    ///
    /// Unknown profiles and malformed custom parameters are not errors; they
    /// are logged and replaced by defaults.
    pub fn new(request: &CityRequest, config: &GenerationConfig) -> Result<Self, GenerationError> {
        let capacity = config.validate()?;
        Ok(Self::build(request, config.zone_plan.clone(), capacity))
    }

    fn build(request: &CityRequest, zone_plan: Vec<ZoneRequest>, capacity: NonZeroUsize) -> Self {
        let profile = TerrainProfile::resolve(&request.profile);
        let params = resolve_parameters(profile, request.custom_parameters.as_deref());
        Self {
            seed: request.seed.clone(),
            profile,
            terrain: TerrainField::new(params, noise_seed(&request.seed), capacity),
            rng: CityRng::from_seed_str(&request.seed),
            zone_plan,
        }
    }

    pub fn profile(&self) -> TerrainProfile {
        self.profile
    }

    pub fn parameters(&self) -> TerrainParameters {
        *self.terrain.params()
    }

    /// Run the full pipeline.
    ///
    /// Pipeline order:
    ///   1. Zone placement
    ///   2. Road network
    ///   3. Zone POIs + landmarks
    ///   4. Buildings
    ///   5. Assembly
    pub fn generate(mut self) -> CityModel {
        let params = self.parameters();
        info!(
            profile = %self.profile,
            seed = %self.seed,
            mountain_height = params.mountain_height,
            water_level = params.water_level,
            "generating city"
        );

        // ── 1. Zones ────────────────────────────────────────────────────────
        let zones = place_zones(&mut self.terrain, &mut self.rng, &self.zone_plan);
        let requested: u32 = self.zone_plan.iter().map(|r| r.count).sum();
        info!(placed = zones.len(), requested, "zones placed");

        // ── 2. Roads ────────────────────────────────────────────────────────
        let roads = build_road_network(&mut self.terrain, &mut self.rng, &zones);
        info!(roads = roads.len(), "terrain-following roads built");

        // ── 3. POIs ─────────────────────────────────────────────────────────
        let pois = place_pois(&mut self.terrain, &mut self.rng, &zones);
        info!(
            pois = pois.len(),
            landmarks = pois.iter().filter(|p| p.is_landmark()).count(),
            "POIs placed"
        );

        // ── 4. Buildings ────────────────────────────────────────────────────
        let buildings = synthesize_buildings(&mut self.terrain, &pois);
        info!(buildings = buildings.len(), "buildings synthesized");

        let (hits, misses) = self.terrain.cache().stats();
        debug!(hits, misses, cached = self.terrain.cache().len(), "terrain cache");

        // ── 5. Assembly ─────────────────────────────────────────────────────
        CityModel::assemble(
            &self.seed,
            self.profile.key(),
            params,
            Utc::now(),
            zones,
            roads,
            pois,
            buildings,
        )
    }
}

/// Generate with the default config. Never fails: bad profile names and
/// custom parameters fall back to defaults.
pub fn generate_city(profile_name: &str, seed: &str, custom_json: Option<&str>) -> CityModel {
    let mut request = CityRequest::new(profile_name, seed);
    request.custom_parameters = custom_json.map(str::to_string);
    CityGenerator::build(&request, default_zone_plan(), cache::default_capacity()).generate()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
