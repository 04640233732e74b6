//! Terrain profile catalog and custom parameter overrides.
//!
//! Each profile is a fixed bundle of terrain knobs approximating a real city's
//! geography. A custom override may replace any subset of the knobs; a
//! malformed override is reported and ignored rather than failing the run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

// ── Parameters ────────────────────────────────────────────────────────────────

/// Plain numeric terrain knobs consumed by the terrain field and landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainParameters {
    /// Height multiplier applied to the combined noise (metres).
    pub mountain_height: f64,
    /// Sea level; cells below it are water.
    pub water_level: f64,
    /// 0-1 qualitative roughness, carried for downstream consumers.
    pub hilliness: f64,
    /// Bridge landmark appears above 0.5.
    pub river_probability: f64,
    /// Fallback water distance when the ring search finds nothing (metres).
    pub coastal_distance: f64,
}

impl Default for TerrainParameters {
    fn default() -> Self {
        TerrainProfile::Manhattan.parameters()
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Named terrain archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainProfile {
    Manhattan,
    SanFrancisco,
    Denver,
    Miami,
    Seattle,
    Chicago,
    LasVegas,
    NewOrleans,
    Custom,
}

impl TerrainProfile {
    pub const ALL: [TerrainProfile; 9] = [
        TerrainProfile::Manhattan,
        TerrainProfile::SanFrancisco,
        TerrainProfile::Denver,
        TerrainProfile::Miami,
        TerrainProfile::Seattle,
        TerrainProfile::Chicago,
        TerrainProfile::LasVegas,
        TerrainProfile::NewOrleans,
        TerrainProfile::Custom,
    ];

    /// Catalog key, e.g. `"san_francisco"`.
    pub fn key(self) -> &'static str {
        match self {
            TerrainProfile::Manhattan    => "manhattan",
            TerrainProfile::SanFrancisco => "san_francisco",
            TerrainProfile::Denver       => "denver",
            TerrainProfile::Miami        => "miami",
            TerrainProfile::Seattle      => "seattle",
            TerrainProfile::Chicago      => "chicago",
            TerrainProfile::LasVegas     => "las_vegas",
            TerrainProfile::NewOrleans   => "new_orleans",
            TerrainProfile::Custom       => "custom",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TerrainProfile::Manhattan    => "Manhattan",
            TerrainProfile::SanFrancisco => "San Francisco",
            TerrainProfile::Denver       => "Denver",
            TerrainProfile::Miami        => "Miami",
            TerrainProfile::Seattle      => "Seattle",
            TerrainProfile::Chicago      => "Chicago",
            TerrainProfile::LasVegas     => "Las Vegas",
            TerrainProfile::NewOrleans   => "New Orleans",
            TerrainProfile::Custom       => "Custom",
        }
    }

    pub fn parameters(self) -> TerrainParameters {
        let (mountain_height, water_level, hilliness, river_probability, coastal_distance) =
            match self {
                TerrainProfile::Manhattan    => (25.0,     0.0, 0.10, 0.9,       800.0),
                TerrainProfile::SanFrancisco => (180.0,    0.0, 0.80, 0.2,     1_500.0),
                TerrainProfile::Denver       => (200.0, -1600.0, 0.30, 0.4, 1_600_000.0),
                TerrainProfile::Miami        => (8.0,      2.0, 0.02, 0.6,       400.0),
                TerrainProfile::Seattle      => (160.0,    0.0, 0.60, 0.5,     1_200.0),
                TerrainProfile::Chicago      => (12.0,     0.0, 0.03, 0.3,       600.0),
                TerrainProfile::LasVegas     => (300.0, -600.0, 0.40, 0.1,   400_000.0),
                TerrainProfile::NewOrleans   => (6.0,      3.0, 0.05, 0.8,   160_000.0),
                TerrainProfile::Custom       => (100.0,    0.0, 0.50, 0.3,     5_000.0),
            };
        TerrainParameters {
            mountain_height,
            water_level,
            hilliness,
            river_probability,
            coastal_distance,
        }
    }

    /// Suggested world-scale multiplier for viewers.
    pub fn recommended_scale(self) -> f64 {
        match self {
            TerrainProfile::Denver | TerrainProfile::LasVegas => 10.0,
            TerrainProfile::Chicago => 5.0,
            _ => 1.0,
        }
    }

    /// Look up a profile by key, falling back to Manhattan with a warning.
    pub fn resolve(name: &str) -> TerrainProfile {
        match name.parse() {
            Ok(profile) => profile,
            Err(e) => {
                warn!("{e}; falling back to manhattan");
                TerrainProfile::Manhattan
            }
        }
    }
}

impl FromStr for TerrainProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        TerrainProfile::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
    }
}

impl fmt::Display for TerrainProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Custom overrides ──────────────────────────────────────────────────────────

/// Partial override of [`TerrainParameters`]; absent fields keep the profile value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomParameters {
    pub mountain_height: Option<f64>,
    pub water_level: Option<f64>,
    pub hilliness: Option<f64>,
    pub river_probability: Option<f64>,
    pub coastal_distance: Option<f64>,
}

impl CustomParameters {
    /// Parse and validate a JSON object such as `{"mountainHeight": 150}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let custom: CustomParameters = serde_json::from_str(json)?;
        custom.validate()?;
        Ok(custom)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("mountainHeight", self.mountain_height),
            ("waterLevel", self.water_level),
            ("hilliness", self.hilliness),
            ("riverProbability", self.river_probability),
            ("coastalDistance", self.coastal_distance),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ConfigError::NonFiniteParameter { field, value });
                }
            }
        }
        if self.coastal_distance.is_some_and(|d| d < 0.0) {
            return Err(ConfigError::InvalidCustomParameters(
                "coastalDistance must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn apply(&self, base: TerrainParameters) -> TerrainParameters {
        TerrainParameters {
            mountain_height: self.mountain_height.unwrap_or(base.mountain_height),
            water_level: self.water_level.unwrap_or(base.water_level),
            hilliness: self.hilliness.unwrap_or(base.hilliness),
            river_probability: self.river_probability.unwrap_or(base.river_probability),
            coastal_distance: self.coastal_distance.unwrap_or(base.coastal_distance),
        }
    }
}

/// Profile defaults with the custom JSON override applied when it is valid.
///
/// A malformed override is logged and the profile defaults are used unchanged.
pub fn resolve_parameters(profile: TerrainProfile, custom_json: Option<&str>) -> TerrainParameters {
    let base = profile.parameters();
    let Some(json) = custom_json else {
        return base;
    };
    match CustomParameters::from_json(json) {
        Ok(custom) => custom.apply(base),
        Err(e) => {
            warn!("{e}; using {profile} profile defaults");
            base
        }
    }
}
