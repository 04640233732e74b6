//! Terrain-aware synthetic city generation.
//!
//! A seed string and a terrain profile go in; a [`CityModel`] of zones, roads,
//! points of interest and buildings comes out. Identical inputs always produce
//! identical content.

pub mod audit;
pub mod buildings;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod model;
pub mod pois;
pub mod profiles;
pub mod rng;
pub mod roads;
pub mod suitability;
pub mod terrain;
pub mod zones;

pub use error::{ConfigError, GenerationError};
pub use generator::{generate_city, CityGenerator, CityRequest, GenerationConfig};
pub use model::{CityModel, CitySummary};
pub use profiles::{TerrainParameters, TerrainProfile};
