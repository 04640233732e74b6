//! Continuous terrain height field and its derived predicates.
//!
//! Height is a three-octave blend of one simplex noise source:
//!   base   = noise(x·0.001, y·0.001)
//!   ridge  = |noise(x·0.003, y·0.003)| · 0.7
//!   detail = noise(x·0.004, y·0.004) · 0.3
//!   height = (base + ridge + detail) · mountain_height + water_level
//!
//! The field is quantised to 10-unit cells: each cell is evaluated once at its
//! anchor corner and memoised in a bounded LRU cache. Eviction never changes a
//! result because the anchor value is a pure function of the cell.

pub mod cache;

use std::f64::consts::TAU;
use std::num::NonZeroUsize;

use noise::{NoiseFn, Simplex};

use crate::profiles::TerrainParameters;
use cache::{CellKey, HeightCache};

/// Edge length of a cache cell (world units).
pub const CELL_SIZE: f64 = 10.0;
/// Default half-spacing of the central-difference slope stencil.
pub const DEFAULT_SLOPE_DELTA: f64 = 50.0;

const BASE_SCALE: f64 = 0.001;
const RIDGE_SCALE: f64 = 0.003;
const RIDGE_WEIGHT: f64 = 0.7;
const DETAIL_SCALE: f64 = BASE_SCALE * 4.0;
const DETAIL_WEIGHT: f64 = 0.3;

const WATER_RING_STEP: u32 = 100;
const WATER_RING_MAX: u32 = 5000;
const WATER_RING_MIN_SAMPLES: u32 = 8;

/// Terrain height field owned by one generator.
pub struct TerrainField {
    params: TerrainParameters,
    noise: Simplex,
    cache: HeightCache,
}

impl TerrainField {
    pub fn new(params: TerrainParameters, noise_seed: u32, cache_capacity: NonZeroUsize) -> Self {
        Self {
            params,
            noise: Simplex::new(noise_seed),
            cache: HeightCache::new(cache_capacity),
        }
    }

    pub fn params(&self) -> &TerrainParameters {
        &self.params
    }

    pub fn cache(&self) -> &HeightCache {
        &self.cache
    }

    #[inline]
    fn cell_of(x: f64, y: f64) -> CellKey {
        ((x / CELL_SIZE).floor() as i64, (y / CELL_SIZE).floor() as i64)
    }

    fn evaluate(noise: &Simplex, params: &TerrainParameters, x: f64, y: f64) -> f64 {
        let base = noise.get([x * BASE_SCALE, y * BASE_SCALE]);
        let ridge = noise.get([x * RIDGE_SCALE, y * RIDGE_SCALE]).abs() * RIDGE_WEIGHT;
        let detail = noise.get([x * DETAIL_SCALE, y * DETAIL_SCALE]) * DETAIL_WEIGHT;
        (base + ridge + detail) * params.mountain_height + params.water_level
    }

    /// Terrain height at `(x, y)` in metres.
    pub fn height(&mut self, x: f64, y: f64) -> f64 {
        let key = Self::cell_of(x, y);
        let (noise, params) = (&self.noise, &self.params);
        self.cache.get_or_compute(key, || {
            Self::evaluate(noise, params, key.0 as f64 * CELL_SIZE, key.1 as f64 * CELL_SIZE)
        })
    }

    pub fn is_water(&mut self, x: f64, y: f64) -> bool {
        self.height(x, y) < self.params.water_level
    }

    /// Gradient magnitude with the default 50-unit stencil.
    pub fn slope(&mut self, x: f64, y: f64) -> f64 {
        self.slope_with_delta(x, y, DEFAULT_SLOPE_DELTA)
    }

    /// Central-difference gradient magnitude from four samples at `±delta`.
    pub fn slope_with_delta(&mut self, x: f64, y: f64, delta: f64) -> f64 {
        let west = self.height(x - delta, y);
        let east = self.height(x + delta, y);
        let south = self.height(x, y - delta);
        let north = self.height(x, y + delta);

        let slope_x = (east - west).abs() / (2.0 * delta);
        let slope_y = (north - south).abs() / (2.0 * delta);
        (slope_x * slope_x + slope_y * slope_y).sqrt()
    }

    /// Ring-search estimate of the distance to the nearest water cell.
    ///
    /// Rings of radius 100, 200, … 5000 are probed with `max(8, radius / 100)`
    /// evenly spaced samples; the first ring containing water wins. When no
    /// ring hits water the profile's `coastal_distance` is returned. The result
    /// is a lower bound at 100-unit resolution, not an exact distance: water
    /// between probes is missed.
    pub fn distance_to_water(&mut self, x: f64, y: f64) -> f64 {
        for radius in (WATER_RING_STEP..=WATER_RING_MAX).step_by(WATER_RING_STEP as usize) {
            let samples = WATER_RING_MIN_SAMPLES.max(radius / 100);
            let r = radius as f64;
            for i in 0..samples {
                let angle = i as f64 / samples as f64 * TAU;
                if self.is_water(x + angle.cos() * r, y + angle.sin() * r) {
                    return r;
                }
            }
        }
        self.params.coastal_distance
    }
}
