//! Reading sharing parameters from a loosely-typed parameter object.
//!
//! Environment parameters arrive as a JSON object shared with the
//! simulator. Types are checked strictly: an integer where a float is
//! expected is an error rather than a conversion.

use serde_json::{Map, Value};

use super::{ConfigError, SharingConfig, SharingPolicy};

impl SharingConfig {
    /// Builds a validated config for `policy` from environment parameters.
    ///
    /// Keys consumed: `neighbor_weight` (float, neighbour sharing),
    /// `k_nearest_neighbor` (integer) and `temperature_factor` (float) for
    /// k-NN sharing, and optionally `num_local_edges` / `num_local_lights`.
    pub fn from_additional_params(
        policy: SharingPolicy,
        params: &Value,
    ) -> Result<Self, ConfigError> {
        let params = params.as_object().ok_or_else(|| ConfigError::WrongParamType {
            key: "additional_params".to_string(),
            expected: "an object",
        })?;

        let mut cfg = SharingConfig {
            policy,
            ..SharingConfig::default()
        };
        if let Some(edges) = optional_uint(params, "num_local_edges")? {
            cfg.num_local_edges = edges;
        }
        if let Some(lights) = optional_uint(params, "num_local_lights")? {
            cfg.num_local_lights = lights;
        }

        match policy {
            SharingPolicy::None => {}
            SharingPolicy::NeighborWeight => {
                cfg.neighbor_weight = required_float(params, "neighbor_weight")?;
            }
            SharingPolicy::KnnSoftmax => {
                cfg.k_nearest_neighbor = optional_uint(params, "k_nearest_neighbor")?
                    .ok_or_else(|| ConfigError::MissingParam("k_nearest_neighbor".to_string()))?;
                cfg.temperature_factor = required_float(params, "temperature_factor")?;
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn required_float(params: &Map<String, Value>, key: &str) -> Result<f64, ConfigError> {
    let value = params
        .get(key)
        .ok_or_else(|| ConfigError::MissingParam(key.to_string()))?;
    if !value.is_f64() {
        return Err(ConfigError::WrongParamType {
            key: key.to_string(),
            expected: "a float",
        });
    }
    value.as_f64().ok_or_else(|| ConfigError::WrongParamType {
        key: key.to_string(),
        expected: "a float",
    })
}

fn optional_uint(params: &Map<String, Value>, key: &str) -> Result<Option<usize>, ConfigError> {
    let Some(value) = params.get(key) else {
        return Ok(None);
    };
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| ConfigError::WrongParamType {
            key: key.to_string(),
            expected: "a non-negative integer",
        })
}
