//! Error types for the generator boundary.
//!
//! Nothing in here escapes a running pipeline: `ConfigError` values are turned
//! into warnings plus a fallback by the resolvers in `profiles`, and
//! `GenerationError` is only returned while a `CityGenerator` is being built.

use thiserror::Error;

use crate::zones::ZoneType;

/// Problems with the profile name or the custom parameter override.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown terrain profile `{0}`")]
    UnknownProfile(String),

    #[error("invalid custom parameters: {0}")]
    InvalidCustomParameters(String),

    #[error("custom parameter `{field}` must be finite, got {value}")]
    NonFiniteParameter { field: &'static str, value: f64 },
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::InvalidCustomParameters(e.to_string())
    }
}

/// Mechanical input errors rejected before the pipeline runs.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("zone request {index} ({zone_type:?}) has invalid size {width}x{height}")]
    InvalidZoneSize {
        index: usize,
        zone_type: ZoneType,
        width: f64,
        height: f64,
    },

    #[error("zone plan requests {requested} zones, limit is {limit}")]
    TooManyZones { requested: u64, limit: u64 },

    #[error("terrain cache capacity must be non-zero")]
    ZeroCacheCapacity,

    #[error("invalid generation config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_invalid_custom_parameters() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let cfg: ConfigError = err.into();
        assert!(matches!(cfg, ConfigError::InvalidCustomParameters(_)));
        assert!(cfg.to_string().starts_with("invalid custom parameters"));
    }
}
