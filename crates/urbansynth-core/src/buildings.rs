//! Building synthesis for large POIs.
use serde::{Deserialize, Serialize};

use crate::geometry::{rectangle, Point2};
use crate::pois::{Poi, PoiType};
use crate::terrain::TerrainField;

/// POIs above this capacity get a building.
pub const BUILDING_CAPACITY_THRESHOLD: u32 = 50;

/// Discriminants match the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    House = 0,
    Apartment = 1,
    Office = 2,
    Store = 3,
    Warehouse = 4,
}

impl BuildingType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<PoiType> for BuildingType {
    fn from(t: PoiType) -> Self {
        match t {
            PoiType::Home                          => BuildingType::House,
            PoiType::Office | PoiType::School      => BuildingType::Office,
            PoiType::Shop | PoiType::Restaurant    => BuildingType::Store,
            PoiType::Factory                       => BuildingType::Warehouse,
            PoiType::Park | PoiType::Hospital      => BuildingType::Apartment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub building_type: BuildingType,
    /// Square, four corners counter-clockwise.
    pub footprint: Vec<Point2>,
    pub height: f64,
    pub zone_id: Option<String>,
    pub poi_id: String,
    pub address: String,
    pub foundation_depth: f64,
}

/// Side length of the square footprint.
pub fn footprint_side(capacity: u32) -> f64 {
    (capacity as f64).sqrt() * 8.0
}

/// Height above ground: grows with capacity, plus a small bonus on high ground.
pub fn building_height(capacity: u32, terrain_height: f64) -> f64 {
    30.0 + (capacity as f64).sqrt() * 2.0 + terrain_height.max(0.0) * 0.05
}

/// Deeper foundations on steeper ground, never below 2 m.
pub fn foundation_depth(slope: f64) -> f64 {
    (slope * 50.0).max(2.0)
}

/// One building per POI whose capacity exceeds the threshold, in POI order.
pub fn synthesize_buildings(terrain: &mut TerrainField, pois: &[Poi]) -> Vec<Building> {
    pois.iter()
        .filter(|poi| poi.capacity > BUILDING_CAPACITY_THRESHOLD)
        .enumerate()
        .map(|(k, poi)| Building {
            id: format!("building_{k}"),
            building_type: poi.poi_type.into(),
            footprint: rectangle(poi.position, footprint_side(poi.capacity), footprint_side(poi.capacity)),
            height: building_height(poi.capacity, poi.properties.terrain_height),
            zone_id: poi.zone_id.clone(),
            poi_id: poi.id.clone(),
            address: format!("{} {}", poi.properties.name, k + 1),
            foundation_depth: foundation_depth(terrain.slope(poi.position.x, poi.position.y)),
        })
        .collect()
}
