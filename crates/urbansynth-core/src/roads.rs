//! Terrain-following road network over the placed zones.
//!
//! Every unordered pair of zones is joined by one road (complete graph).
//! Paths start as a straight line between zone centres; each interior vertex
//! is then nudged toward the flattest dry spot among a few random offsets.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point2;
use crate::rng::CityRng;
use crate::terrain::TerrainField;
use crate::zones::{Zone, ZoneType};

/// Minimum number of path segments per road.
pub const MIN_SEGMENTS: usize = 8;
/// Target segment length; longer roads get more segments.
pub const SEGMENT_LENGTH: f64 = 300.0;
/// Random offsets tried per interior vertex.
pub const OFFSET_ATTEMPTS: usize = 8;
/// Side of the square offset window around the straight-line vertex.
pub const OFFSET_WINDOW: f64 = 300.0;

/// Functional road class. Discriminants match the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Highway = 0,
    Arterial = 1,
    Collector = 2,
    Local = 3,
}

impl RoadType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Connection priority between two zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Normal,
}

impl Priority {
    /// High when either end is a downtown zone.
    pub fn between(a: &Zone, b: &Zone) -> Self {
        if a.zone_type == ZoneType::Downtown || b.zone_type == ZoneType::Downtown {
            Priority::High
        } else {
            Priority::Normal
        }
    }

    pub fn road_type(self) -> RoadType {
        match self {
            Priority::High => RoadType::Arterial,
            Priority::Normal => RoadType::Collector,
        }
    }

    pub fn width(self) -> f64 {
        match self {
            Priority::High => 12.0,
            Priority::Normal => 8.0,
        }
    }

    pub fn speed_limit(self) -> f64 {
        match self {
            Priority::High => 60.0,
            Priority::Normal => 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub id: String,
    pub road_type: RoadType,
    /// First point is the `from_zone` centre, last is the `to_zone` centre.
    pub path: Vec<Point2>,
    pub width: f64,
    pub speed_limit: f64,
    /// Mean slope over every path vertex.
    pub terrain_difficulty: f64,
    pub follows_contours: bool,
    pub from_zone: String,
    pub to_zone: String,
}

/// Straight-line path nudged off steep ground.
pub fn terrain_aware_path(
    terrain: &mut TerrainField,
    rng: &mut CityRng,
    from: Point2,
    to: Point2,
) -> Vec<Point2> {
    let segments = MIN_SEGMENTS.max((from.distance(to) / SEGMENT_LENGTH).floor() as usize);
    let mut path = Vec::with_capacity(segments + 1);
    path.push(from);

    let half = OFFSET_WINDOW / 2.0;
    for i in 1..segments {
        let direct = from.lerp(to, i as f64 / segments as f64);
        let mut best = direct;
        let mut best_slope = terrain.slope(direct.x, direct.y);

        for _ in 0..OFFSET_ATTEMPTS {
            let candidate = Point2::new(direct.x + rng.symmetric(half), direct.y + rng.symmetric(half));
            let slope = terrain.slope(candidate.x, candidate.y);
            if slope < best_slope && !terrain.is_water(candidate.x, candidate.y) {
                best_slope = slope;
                best = candidate;
            }
        }
        path.push(best);
    }

    path.push(to);
    path
}

/// Mean slope sampled at every vertex. Zero for an empty path.
pub fn path_difficulty(terrain: &mut TerrainField, path: &[Point2]) -> f64 {
    if path.is_empty() {
        return 0.0;
    }
    let total: f64 = path.iter().map(|p| terrain.slope(p.x, p.y)).sum();
    total / path.len() as f64
}

/// Join every pair of zones `(i, j)` with `i < j`, in placement order.
pub fn build_road_network(terrain: &mut TerrainField, rng: &mut CityRng, zones: &[Zone]) -> Vec<Road> {
    let mut roads = Vec::with_capacity(zones.len() * zones.len().saturating_sub(1) / 2);

    for (i, a) in zones.iter().enumerate() {
        for b in &zones[i + 1..] {
            let priority = Priority::between(a, b);
            let path = terrain_aware_path(terrain, rng, a.center(), b.center());
            let terrain_difficulty = path_difficulty(terrain, &path);

            roads.push(Road {
                id: format!("road_{}", roads.len()),
                road_type: priority.road_type(),
                path,
                width: priority.width(),
                speed_limit: priority.speed_limit(),
                terrain_difficulty,
                follows_contours: true,
                from_zone: a.id.clone(),
                to_zone: b.id.clone(),
            });
        }
    }

    debug!(roads = roads.len(), zones = zones.len(), "road network built");
    roads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle;
    use crate::profiles::{TerrainParameters, TerrainProfile};
    use crate::terrain::cache::DEFAULT_CAPACITY;
    use approx::assert_abs_diff_eq;
    use std::num::NonZeroUsize;

    fn field(params: TerrainParameters) -> TerrainField {
        TerrainField::new(params, 7, NonZeroUsize::new(DEFAULT_CAPACITY).unwrap())
    }

    fn zone(id: &str, zone_type: ZoneType, x: f64, y: f64) -> Zone {
        Zone {
            id: id.to_string(),
            zone_type,
            boundary: rectangle(Point2::new(x, y), 800.0, 600.0),
            density: zone_type.density(),
            terrain_suitability: 0.5,
            terrain_height: 0.0,
            terrain_slope: 0.0,
        }
    }

    fn sample_zones() -> Vec<Zone> {
        vec![
            zone("downtown_0", ZoneType::Downtown, 0.0, 0.0),
            zone("residential_1", ZoneType::Residential, 2500.0, 300.0),
            zone("residential_2", ZoneType::Residential, -1800.0, 2200.0),
            zone("park_3", ZoneType::Park, 900.0, -3100.0),
            zone("industrial_4", ZoneType::Industrial, -3000.0, -2500.0),
        ]
    }

    #[test]
    fn complete_graph_with_matching_endpoints() {
        let mut tf = field(TerrainProfile::SanFrancisco.parameters());
        let mut rng = CityRng::from_seed_str("roads");
        let zones = sample_zones();
        let roads = build_road_network(&mut tf, &mut rng, &zones);

        let n = zones.len();
        assert_eq!(roads.len(), n * (n - 1) / 2);
        for road in &roads {
            let a = zones.iter().find(|z| z.id == road.from_zone).unwrap();
            let b = zones.iter().find(|z| z.id == road.to_zone).unwrap();
            assert_ne!(a.id, b.id);
            assert_eq!(*road.path.first().unwrap(), a.center());
            assert_eq!(*road.path.last().unwrap(), b.center());
        }
    }

    #[test]
    fn downtown_connections_are_wide_arterials() {
        let mut tf = field(TerrainProfile::Manhattan.parameters());
        let mut rng = CityRng::from_seed_str("priority");
        let roads = build_road_network(&mut tf, &mut rng, &sample_zones());
        for road in &roads {
            if road.from_zone.starts_with("downtown") || road.to_zone.starts_with("downtown") {
                assert_eq!(road.road_type, RoadType::Arterial);
                assert_eq!((road.width, road.speed_limit), (12.0, 60.0));
            } else {
                assert_eq!(road.road_type, RoadType::Collector);
                assert_eq!((road.width, road.speed_limit), (8.0, 40.0));
            }
        }
    }

    #[test]
    fn segment_count_follows_length() {
        let mut tf = field(TerrainProfile::Chicago.parameters());
        let mut rng = CityRng::from_seed_str("segments");
        let short = terrain_aware_path(&mut tf, &mut rng, Point2::ORIGIN, Point2::new(1000.0, 0.0));
        assert_eq!(short.len(), MIN_SEGMENTS + 1);
        let long = terrain_aware_path(&mut tf, &mut rng, Point2::ORIGIN, Point2::new(6000.0, 0.0));
        assert_eq!(long.len(), 20 + 1);
    }

    #[test]
    fn interior_vertices_stay_in_offset_window() {
        let mut tf = field(TerrainProfile::Seattle.parameters());
        let mut rng = CityRng::from_seed_str("window");
        let (from, to) = (Point2::new(-2000.0, -1000.0), Point2::new(2600.0, 1800.0));
        let path = terrain_aware_path(&mut tf, &mut rng, from, to);
        let segments = path.len() - 1;
        for (i, p) in path.iter().enumerate().take(segments).skip(1) {
            let direct = from.lerp(to, i as f64 / segments as f64);
            assert!((p.x - direct.x).abs() <= OFFSET_WINDOW / 2.0);
            assert!((p.y - direct.y).abs() <= OFFSET_WINDOW / 2.0);
            assert!(tf.slope(p.x, p.y) <= tf.slope(direct.x, direct.y));
        }
    }

    #[test]
    fn flat_terrain_keeps_straight_line_and_zero_difficulty() {
        let flat = TerrainParameters { mountain_height: 0.0, ..TerrainProfile::Custom.parameters() };
        let mut tf = field(flat);
        let mut rng = CityRng::from_seed_str("flat");
        let (from, to) = (Point2::new(-1500.0, 0.0), Point2::new(1500.0, 0.0));
        let path = terrain_aware_path(&mut tf, &mut rng, from, to);
        for (i, p) in path.iter().enumerate() {
            let direct = from.lerp(to, i as f64 / (path.len() - 1) as f64);
            assert_abs_diff_eq!(p.x, direct.x, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y, direct.y, epsilon = 1e-9);
        }
        assert_eq!(path_difficulty(&mut tf, &path), 0.0);
    }

    #[test]
    fn fewer_than_two_zones_means_no_roads() {
        let mut tf = field(TerrainProfile::Manhattan.parameters());
        let mut rng = CityRng::from_seed_str("solo");
        assert!(build_road_network(&mut tf, &mut rng, &[]).is_empty());
        let one = vec![zone("park_0", ZoneType::Park, 0.0, 0.0)];
        assert!(build_road_network(&mut tf, &mut rng, &one).is_empty());
    }
}
