//! Assembled city model and its summary metadata.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::buildings::Building;
use crate::geometry::Bounds;
use crate::pois::{Poi, PoiType};
use crate::profiles::TerrainParameters;
use crate::roads::Road;
use crate::zones::Zone;

/// World bounds stamped on every model, independent of placed content.
pub const WORLD_HALF_EXTENT: f64 = 5000.0;
/// Residents per home POI.
pub const RESIDENTS_PER_HOME: f64 = 2.5;
pub const CITY_AREA_KM2: f64 = 100.0;
pub const MODEL_VERSION: &str = "2.0-geographic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMetadata {
    pub seed: String,
    /// Resolved catalog key actually used.
    pub terrain_profile: String,
    pub terrain_parameters: TerrainParameters,
    pub generation_timestamp: DateTime<Utc>,
    pub population_estimate: f64,
    pub average_terrain_suitability: f64,
    pub geographic_feature_count: usize,
    pub city_area_km2: f64,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityModel {
    pub bounds: Bounds,
    pub metadata: CityMetadata,
    pub zones: Vec<Zone>,
    pub roads: Vec<Road>,
    pub pois: Vec<Poi>,
    pub buildings: Vec<Building>,
}

pub fn population_estimate(pois: &[Poi]) -> f64 {
    pois.iter().filter(|p| p.poi_type == PoiType::Home).count() as f64 * RESIDENTS_PER_HOME
}

/// Mean zone suitability; 0 with no zones.
pub fn average_terrain_suitability(zones: &[Zone]) -> f64 {
    if zones.is_empty() {
        return 0.0;
    }
    zones.iter().map(|z| z.terrain_suitability).sum::<f64>() / zones.len() as f64
}

impl CityModel {
    /// Compose the final model from the stage outputs.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        seed: &str,
        terrain_profile: &str,
        terrain_parameters: TerrainParameters,
        generation_timestamp: DateTime<Utc>,
        zones: Vec<Zone>,
        roads: Vec<Road>,
        pois: Vec<Poi>,
        buildings: Vec<Building>,
    ) -> Self {
        let metadata = CityMetadata {
            seed: seed.to_string(),
            terrain_profile: terrain_profile.to_string(),
            terrain_parameters,
            generation_timestamp,
            population_estimate: population_estimate(&pois),
            average_terrain_suitability: average_terrain_suitability(&zones),
            geographic_feature_count: pois.iter().filter(|p| p.is_landmark()).count(),
            city_area_km2: CITY_AREA_KM2,
            version: MODEL_VERSION.to_string(),
        };
        CityModel {
            bounds: Bounds::square(WORLD_HALF_EXTENT),
            metadata,
            zones,
            roads,
            pois,
            buildings,
        }
    }

    /// Everything except the timestamp matches.
    pub fn same_content(&self, other: &CityModel) -> bool {
        let mut a = self.metadata.clone();
        a.generation_timestamp = other.metadata.generation_timestamp;
        self.bounds == other.bounds
            && a == other.metadata
            && self.zones == other.zones
            && self.roads == other.roads
            && self.pois == other.pois
            && self.buildings == other.buildings
    }

    pub fn summary(&self) -> CitySummary {
        CitySummary {
            profile: self.metadata.terrain_profile.clone(),
            seed: self.metadata.seed.clone(),
            zones: self.zones.len(),
            roads: self.roads.len(),
            pois: self.pois.len(),
            buildings: self.buildings.len(),
            landmarks: self.metadata.geographic_feature_count,
            population_estimate: self.metadata.population_estimate,
            average_terrain_suitability: self.metadata.average_terrain_suitability,
            mean_road_difficulty: if self.roads.is_empty() {
                0.0
            } else {
                self.roads.iter().map(|r| r.terrain_difficulty).sum::<f64>() / self.roads.len() as f64
            },
        }
    }
}

/// Headline counts for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub profile: String,
    pub seed: String,
    pub zones: usize,
    pub roads: usize,
    pub pois: usize,
    pub buildings: usize,
    pub landmarks: usize,
    pub population_estimate: f64,
    pub average_terrain_suitability: f64,
    pub mean_road_difficulty: f64,
}

impl fmt::Display for CitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profile:            {} (seed {})", self.profile, self.seed)?;
        writeln!(f, "Zones:              {}", self.zones)?;
        writeln!(f, "Roads:              {} (terrain-following)", self.roads)?;
        writeln!(f, "POIs:               {}", self.pois)?;
        writeln!(f, "Buildings:          {}", self.buildings)?;
        writeln!(f, "Geographic features: {}", self.landmarks)?;
        writeln!(f, "Population estimate: {:.0}", self.population_estimate)?;
        writeln!(f, "Avg suitability:    {:.1}%", self.average_terrain_suitability * 100.0)?;
        write!(f, "Mean road slope:    {:.4}", self.mean_road_difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{rectangle, Point2};
    use crate::pois::PoiProperties;
    use crate::profiles::TerrainProfile;
    use crate::zones::ZoneType;

    fn zone(id: &str, suitability: f64) -> Zone {
        Zone {
            id: id.into(),
            zone_type: ZoneType::Residential,
            boundary: rectangle(Point2::ORIGIN, 10.0, 10.0),
            density: 0.6,
            terrain_suitability: suitability,
            terrain_height: 0.0,
            terrain_slope: 0.0,
        }
    }

    fn poi(poi_type: PoiType, landmark: bool) -> Poi {
        Poi {
            id: "p".into(),
            poi_type,
            position: Point2::ORIGIN,
            zone_id: None,
            capacity: 3,
            properties: PoiProperties {
                name: "x".into(),
                landmark,
                terrain_suitability: None,
                terrain_height: 0.0,
                terrain_feature: None,
            },
        }
    }

    #[test]
    fn metadata_aggregates() {
        let pois = vec![
            poi(PoiType::Home, false),
            poi(PoiType::Home, false),
            poi(PoiType::Shop, false),
            poi(PoiType::Park, true),
        ];
        let zones = vec![zone("a", 0.4), zone("b", 0.8)];
        let model = CityModel::assemble(
            "s",
            "manhattan",
            TerrainProfile::Manhattan.parameters(),
            Utc::now(),
            zones,
            vec![],
            pois,
            vec![],
        );
        assert_eq!(model.metadata.population_estimate, 5.0);
        assert!((model.metadata.average_terrain_suitability - 0.6).abs() < 1e-12);
        assert_eq!(model.metadata.geographic_feature_count, 1);
        assert_eq!(model.bounds, Bounds::square(5000.0));
        assert_eq!(model.summary().pois, 4);
    }

    #[test]
    fn empty_city_has_zero_averages() {
        assert_eq!(average_terrain_suitability(&[]), 0.0);
        assert_eq!(population_estimate(&[]), 0.0);
    }
}
