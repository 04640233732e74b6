//! Points of interest: zone fill plus terrain-conditioned landmarks.
//!
//! Zone POIs are drawn inside each zone's bounding box with a small candidate
//! budget. Landmarks are evaluated once per city, after the zone POIs, and only
//! when the terrain profile supports them.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point2;
use crate::profiles::TerrainParameters;
use crate::rng::CityRng;
use crate::suitability::{suitability_factors, zone_suitability, LandUse};
use crate::terrain::TerrainField;
use crate::zones::{Zone, ZoneType};

/// POIs per zone = floor(density × this).
pub const POIS_PER_UNIT_DENSITY: f64 = 40.0;
pub const POI_ATTEMPTS: usize = 10;
pub const POI_ACCEPT_THRESHOLD: f64 = 0.1;

pub const LANDMARK_ATTEMPTS: usize = 30;
pub const LANDMARK_MIN_SEPARATION: f64 = 300.0;
pub const LANDMARK_ACCEPT_THRESHOLD: f64 = 0.3;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Discriminants match the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    Home = 0,
    Office = 1,
    Shop = 2,
    Restaurant = 3,
    School = 4,
    Hospital = 5,
    Park = 6,
    Factory = 7,
}

impl PoiType {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Capacity range `[lo, hi)`.
    pub fn capacity_range(self) -> (u32, u32) {
        match self {
            PoiType::Home       => (2, 6),
            PoiType::Shop       => (20, 100),
            PoiType::Restaurant => (30, 150),
            PoiType::Factory    => (100, 500),
            PoiType::Office     => (50, 250),
            PoiType::Park       => (100, 600),
            PoiType::School | PoiType::Hospital => (50, 51),
        }
    }

    fn name_stem(self) -> &'static str {
        match self {
            PoiType::Home       => "Residence",
            PoiType::Office     => "Office Building",
            PoiType::Shop       => "Store",
            PoiType::Restaurant => "Restaurant",
            PoiType::School     => "School",
            PoiType::Hospital   => "Hospital",
            PoiType::Park       => "Park",
            PoiType::Factory    => "Factory",
        }
    }

    /// Display name for the `n`-th committed POI (1-based).
    pub fn display_name(self, n: usize) -> String {
        format!("{} {n}", self.name_stem())
    }
}

/// Why a landmark exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainFeature {
    Coastal,
    Elevated,
    RiverCrossing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiProperties {
    pub name: String,
    pub landmark: bool,
    /// Score the position was accepted with; None for fixed landmarks.
    pub terrain_suitability: Option<f64>,
    pub terrain_height: f64,
    pub terrain_feature: Option<TerrainFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub poi_type: PoiType,
    pub position: Point2,
    /// None for landmarks.
    pub zone_id: Option<String>,
    pub capacity: u32,
    pub properties: PoiProperties,
}

impl Poi {
    pub fn is_landmark(&self) -> bool {
        self.properties.landmark
    }
}

// ── Zone fill ─────────────────────────────────────────────────────────────────

/// Draw a POI type from the zone's mix.
pub fn choose_poi_type(rng: &mut CityRng, zone_type: ZoneType) -> PoiType {
    let roll = rng.unit();
    match zone_type {
        ZoneType::Residential => if roll < 0.8 { PoiType::Home } else { PoiType::Shop },
        ZoneType::Commercial  => if roll < 0.6 { PoiType::Shop } else { PoiType::Restaurant },
        ZoneType::Industrial  => PoiType::Factory,
        ZoneType::Downtown    => if roll < 0.5 { PoiType::Office } else { PoiType::Shop },
        ZoneType::Park        => PoiType::Park,
        ZoneType::Water       => PoiType::Shop,
    }
}

pub fn draw_capacity(rng: &mut CityRng, poi_type: PoiType) -> u32 {
    let (lo, hi) = poi_type.capacity_range();
    rng.int_range(lo, hi)
}

/// Fill one zone. `counter` numbers POI names across the whole city.
pub fn place_zone_pois(
    terrain: &mut TerrainField,
    rng: &mut CityRng,
    zone: &Zone,
    counter: &mut usize,
) -> Vec<Poi> {
    let target = (zone.density * POIS_PER_UNIT_DENSITY).floor() as usize;
    let bounds = zone.bounds();
    let mut pois = Vec::with_capacity(target);

    for i in 0..target {
        let mut best: Option<(Point2, PoiType)> = None;
        let mut best_score = 0.0;

        for _ in 0..POI_ATTEMPTS {
            let candidate = Point2::new(
                rng.range(bounds.min_x, bounds.max_x),
                rng.range(bounds.min_y, bounds.max_y),
            );
            let poi_type = choose_poi_type(rng, zone.zone_type);
            let score = zone_suitability(terrain, candidate.x, candidate.y, LandUse::from(poi_type));
            if score > best_score {
                best_score = score;
                best = Some((candidate, poi_type));
            }
        }

        let Some((position, poi_type)) = best.filter(|_| best_score > POI_ACCEPT_THRESHOLD) else {
            continue;
        };

        *counter += 1;
        pois.push(Poi {
            id: format!("poi_{}_{i}", zone.id),
            poi_type,
            position,
            zone_id: Some(zone.id.clone()),
            capacity: draw_capacity(rng, poi_type),
            properties: PoiProperties {
                name: poi_type.display_name(*counter),
                landmark: false,
                terrain_suitability: Some(best_score),
                terrain_height: terrain.height(position.x, position.y),
                terrain_feature: None,
            },
        });
    }

    debug!(zone = %zone.id, target, placed = pois.len(), "zone POIs placed");
    pois
}

// ── Landmarks ─────────────────────────────────────────────────────────────────

/// Terrain-conditioned landmark kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landmark {
    Lighthouse,
    ScenicOverlook,
    MainBridge,
}

impl Landmark {
    pub const ALL: [Landmark; 3] = [Landmark::Lighthouse, Landmark::ScenicOverlook, Landmark::MainBridge];

    pub fn id(self) -> &'static str {
        match self {
            Landmark::Lighthouse     => "lighthouse_main",
            Landmark::ScenicOverlook => "scenic_overlook",
            Landmark::MainBridge     => "river_crossing",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Landmark::Lighthouse     => "Harbor Lighthouse",
            Landmark::ScenicOverlook => "Scenic Overlook",
            Landmark::MainBridge     => "Main Bridge",
        }
    }

    pub fn poi_type(self) -> PoiType {
        match self {
            Landmark::Lighthouse | Landmark::ScenicOverlook => PoiType::Park,
            Landmark::MainBridge => PoiType::Shop,
        }
    }

    pub fn capacity(self) -> u32 {
        match self {
            Landmark::Lighthouse     => 50,
            Landmark::ScenicOverlook => 100,
            Landmark::MainBridge     => 1,
        }
    }

    pub fn feature(self) -> TerrainFeature {
        match self {
            Landmark::Lighthouse     => TerrainFeature::Coastal,
            Landmark::ScenicOverlook => TerrainFeature::Elevated,
            Landmark::MainBridge     => TerrainFeature::RiverCrossing,
        }
    }

    /// Whether the terrain profile supports this landmark at all.
    pub fn is_supported(self, params: &TerrainParameters) -> bool {
        match self {
            Landmark::Lighthouse     => params.coastal_distance < 5000.0,
            Landmark::ScenicOverlook => params.mountain_height > 100.0,
            Landmark::MainBridge     => params.river_probability > 0.5,
        }
    }

    /// Search anchor and radius; None for landmarks at a fixed position.
    pub fn search_area(self) -> Option<(Point2, f64)> {
        match self {
            Landmark::Lighthouse     => Some((Point2::new(-4000.0, 0.0), 3000.0)),
            Landmark::ScenicOverlook => Some((Point2::ORIGIN, 4000.0)),
            Landmark::MainBridge     => None,
        }
    }

    fn score(self, terrain: &mut TerrainField, p: Point2) -> f64 {
        let mut score = zone_suitability(terrain, p.x, p.y, LandUse::Unweighted);
        match self {
            Landmark::Lighthouse => {
                let water_distance = terrain.distance_to_water(p.x, p.y);
                score *= (1.0 - water_distance / 500.0).max(0.0);
                score *= suitability_factors(terrain, p.x, p.y).elevation;
            }
            Landmark::ScenicOverlook => {
                score *= suitability_factors(terrain, p.x, p.y).elevation.powi(2);
            }
            Landmark::MainBridge => {}
        }
        score
    }
}

/// Radial search: attempt `k` looks at angle `2πk/30` and a random distance
/// inside the radius. Returns the best position and its score when the score
/// clears the landmark threshold.
pub fn find_landmark_site(
    terrain: &mut TerrainField,
    rng: &mut CityRng,
    landmark: Landmark,
    anchor: Point2,
    radius: f64,
    existing: &[Point2],
) -> Option<(Point2, f64)> {
    let mut best: Option<Point2> = None;
    let mut best_score = 0.0;

    for attempt in 0..LANDMARK_ATTEMPTS {
        let angle = attempt as f64 / LANDMARK_ATTEMPTS as f64 * TAU;
        let distance = rng.unit() * radius;
        let p = Point2::new(anchor.x + angle.cos() * distance, anchor.y + angle.sin() * distance);

        if existing.iter().any(|e| e.distance(p) < LANDMARK_MIN_SEPARATION) {
            continue;
        }

        let score = landmark.score(terrain, p);
        if score > best_score {
            best_score = score;
            best = Some(p);
        }
    }

    best.filter(|_| best_score > LANDMARK_ACCEPT_THRESHOLD).map(|p| (p, best_score))
}

/// Add every landmark the profile supports. Separation is checked against the
/// POIs that existed before any landmark was added.
pub fn place_landmarks(terrain: &mut TerrainField, rng: &mut CityRng, existing: &[Poi]) -> Vec<Poi> {
    let params = *terrain.params();
    let occupied: Vec<Point2> = existing.iter().map(|p| p.position).collect();
    let mut landmarks = Vec::new();

    for landmark in Landmark::ALL {
        if !landmark.is_supported(&params) {
            continue;
        }
        let (position, score) = match landmark.search_area() {
            Some((anchor, radius)) => {
                match find_landmark_site(terrain, rng, landmark, anchor, radius, &occupied) {
                    Some((p, s)) => (p, Some(s)),
                    None => {
                        debug!(landmark = landmark.id(), "no landmark site cleared the threshold");
                        continue;
                    }
                }
            }
            None => (Point2::ORIGIN, None),
        };

        debug!(landmark = landmark.id(), x = position.x, y = position.y, "landmark placed");
        landmarks.push(Poi {
            id: landmark.id().to_string(),
            poi_type: landmark.poi_type(),
            position,
            zone_id: None,
            capacity: landmark.capacity(),
            properties: PoiProperties {
                name: landmark.name().to_string(),
                landmark: true,
                terrain_suitability: score,
                terrain_height: terrain.height(position.x, position.y),
                terrain_feature: Some(landmark.feature()),
            },
        });
    }

    landmarks
}

/// Fill every zone, then append landmarks.
pub fn place_pois(terrain: &mut TerrainField, rng: &mut CityRng, zones: &[Zone]) -> Vec<Poi> {
    let mut counter = 0usize;
    let mut pois = Vec::new();
    for zone in zones {
        pois.extend(place_zone_pois(terrain, rng, zone, &mut counter));
    }
    let landmarks = place_landmarks(terrain, rng, &pois);
    pois.extend(landmarks);
    pois
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle;
    use crate::profiles::TerrainProfile;
    use crate::rng::noise_seed;
    use crate::terrain::cache::DEFAULT_CAPACITY;
    use std::num::NonZeroUsize;

    fn setup(params: TerrainParameters, seed: &str) -> (TerrainField, CityRng) {
        let tf = TerrainField::new(params, noise_seed(seed), NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        (tf, CityRng::from_seed_str(seed))
    }

    fn zone(zone_type: ZoneType, center: Point2) -> Zone {
        Zone {
            id: format!("{}_0", zone_type.key()),
            zone_type,
            boundary: rectangle(center, 1200.0, 800.0),
            density: zone_type.density(),
            terrain_suitability: 0.8,
            terrain_height: 0.0,
            terrain_slope: 0.0,
        }
    }

    fn flat(params: TerrainParameters) -> TerrainParameters {
        TerrainParameters { mountain_height: 0.0, ..params }
    }

    #[test]
    fn flat_land_fills_every_slot_inside_the_zone() {
        let (mut tf, mut rng) = setup(flat(TerrainProfile::Custom.parameters()), "fill");
        let z = zone(ZoneType::Commercial, Point2::new(500.0, -200.0));
        let mut counter = 0;
        let pois = place_zone_pois(&mut tf, &mut rng, &z, &mut counter);

        assert_eq!(pois.len(), 32); // floor(0.8 × 40)
        assert_eq!(counter, 32);
        let b = z.bounds();
        for p in &pois {
            assert!(b.contains(p.position));
            assert!(matches!(p.poi_type, PoiType::Shop | PoiType::Restaurant));
            assert_eq!(p.zone_id.as_deref(), Some("commercial_0"));
            let (lo, hi) = p.poi_type.capacity_range();
            assert!((lo..hi).contains(&p.capacity));
        }
        assert_eq!(pois[0].properties.name, format!("{} 1", pois[0].poi_type.name_stem()));
    }

    #[test]
    fn zone_mixes_use_the_expected_types() {
        let mut rng = CityRng::from_seed_str("mix");
        for _ in 0..200 {
            assert!(matches!(choose_poi_type(&mut rng, ZoneType::Residential), PoiType::Home | PoiType::Shop));
            assert!(matches!(choose_poi_type(&mut rng, ZoneType::Downtown), PoiType::Office | PoiType::Shop));
            assert_eq!(choose_poi_type(&mut rng, ZoneType::Industrial), PoiType::Factory);
            assert_eq!(choose_poi_type(&mut rng, ZoneType::Park), PoiType::Park);
        }
        let homes = (0..2000)
            .filter(|_| choose_poi_type(&mut rng, ZoneType::Residential) == PoiType::Home)
            .count();
        assert!((1450..1750).contains(&homes), "homes={homes}");
    }

    #[test]
    fn bridge_sits_at_origin_when_rivers_are_likely() {
        let params = TerrainProfile::NewOrleans.parameters();
        let (mut tf, mut rng) = setup(params, "bridge");
        let landmarks = place_landmarks(&mut tf, &mut rng, &[]);
        let bridges: Vec<_> = landmarks.iter().filter(|p| p.id == "river_crossing").collect();
        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].position, Point2::ORIGIN);
        assert_eq!(bridges[0].properties.terrain_feature, Some(TerrainFeature::RiverCrossing));
        assert_eq!(bridges[0].capacity, 1);
        assert!(bridges[0].zone_id.is_none());
        assert_eq!(bridges[0].properties.terrain_height, tf.height(0.0, 0.0));
    }

    #[test]
    fn unsupported_landmarks_are_never_placed() {
        // Las Vegas: inland, rivers unlikely, but mountainous.
        let (mut tf, mut rng) = setup(TerrainProfile::LasVegas.parameters(), "desert");
        let landmarks = place_landmarks(&mut tf, &mut rng, &[]);
        assert!(landmarks.iter().all(|p| p.id == "scenic_overlook"));

        // Chicago: flat, so no overlook; coastal, so maybe a lighthouse.
        let (mut tf, mut rng) = setup(TerrainProfile::Chicago.parameters(), "lake");
        let landmarks = place_landmarks(&mut tf, &mut rng, &[]);
        assert!(landmarks.iter().all(|p| p.id == "lighthouse_main"));
    }

    #[test]
    fn denver_places_at_most_one_overlook() {
        for seed in ["peak-1", "peak-2", "peak-3", "peak-4"] {
            let (mut tf, mut rng) = setup(TerrainProfile::Denver.parameters(), seed);
            let landmarks = place_landmarks(&mut tf, &mut rng, &[]);
            assert!(landmarks.iter().filter(|p| p.id == "scenic_overlook").count() <= 1);
        }
    }

    #[test]
    fn hilly_coast_places_overlook_and_lighthouse_inside_their_areas() {
        let mut seen = (0, 0);
        for i in 0..10 {
            let seed = format!("coast-{i}");
            let (mut tf, mut rng) = setup(TerrainProfile::SanFrancisco.parameters(), &seed);
            for p in place_landmarks(&mut tf, &mut rng, &[]) {
                let landmark = match p.id.as_str() {
                    "lighthouse_main" => { seen.0 += 1; Landmark::Lighthouse }
                    "scenic_overlook" => { seen.1 += 1; Landmark::ScenicOverlook }
                    other => panic!("unexpected landmark {other}"),
                };
                let (anchor, radius) = landmark.search_area().unwrap();
                assert!(p.position.distance(anchor) <= radius);
                assert!(p.properties.terrain_suitability.unwrap() > LANDMARK_ACCEPT_THRESHOLD);
                assert_eq!(p.properties.terrain_feature, Some(landmark.feature()));
                assert_eq!(p.capacity, landmark.capacity());
                assert!(p.properties.landmark);
                assert!(p.zone_id.is_none());
            }
        }
        assert!(seen.0 > 0 && seen.1 > 0, "lighthouses/overlooks placed: {seen:?}");
    }

    #[test]
    fn landmark_search_respects_separation() {
        let (mut tf, mut rng) = setup(TerrainProfile::SanFrancisco.parameters(), "crowded");
        // Occupy the whole search disc on a 200-unit lattice.
        let occupied: Vec<Point2> = (-20..=20)
            .flat_map(|i| (-20..=20).map(move |j| Point2::new(i as f64 * 200.0, j as f64 * 200.0)))
            .collect();
        let site = find_landmark_site(
            &mut tf,
            &mut rng,
            Landmark::ScenicOverlook,
            Point2::ORIGIN,
            4000.0,
            &occupied,
        );
        assert!(site.is_none());
    }

    #[test]
    fn flat_terrain_rejects_lighthouse() {
        // No water anywhere: distance falls back to coastal_distance ≥ 500 → score 0.
        let params = flat(TerrainParameters { coastal_distance: 800.0, ..TerrainProfile::Custom.parameters() });
        let (mut tf, mut rng) = setup(params, "dry");
        assert!(find_landmark_site(&mut tf, &mut rng, Landmark::Lighthouse, Point2::new(-4000.0, 0.0), 3000.0, &[]).is_none());
    }
}
