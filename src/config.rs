use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Largest `n` the multiplication panel accepts; every unit is one addition.
pub const DEFAULT_MAX_SCALAR: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the front-end needs besides user input. Missing keys fall back to
/// the defaults, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub backend_url: String,
    pub plot: PlotConfig,
    pub addition: AdditionDefaults,
    pub multiplication: MultiplicationDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            plot: PlotConfig::default(),
            addition: AdditionDefaults::default(),
            multiplication: MultiplicationDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlotConfig {
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            x_domain: [-10.0, 10.0],
            y_domain: [-10.0, 10.0],
        }
    }
}

/// Values the addition panel starts with: y^2 = x^3 - 7x + 10, P = (1, 2), Q = (3, 4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionDefaults {
    pub a: f64,
    pub b: f64,
    pub p: [f64; 2],
    pub q: [f64; 2],
}

impl Default for AdditionDefaults {
    fn default() -> Self {
        Self {
            a: -7.0,
            b: 10.0,
            p: [1.0, 2.0],
            q: [3.0, 4.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplicationDefaults {
    pub a: f64,
    pub b: f64,
    pub p: [f64; 2],
    pub n: u32,
    #[serde(rename = "maxN")]
    pub max_n: u32,
}

impl Default for MultiplicationDefaults {
    fn default() -> Self {
        Self {
            a: -7.0,
            b: 10.0,
            p: [1.0, 2.0],
            n: 2,
            max_n: DEFAULT_MAX_SCALAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.addition.q, [3.0, 4.0]);
        assert_eq!(config.multiplication.n, 2);
        assert_eq!(config.multiplication.max_n, DEFAULT_MAX_SCALAR);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(
            r#"{
                "backendUrl": "https://demo.example.org/api",
                "plot": { "xDomain": [-5, 5] },
                "multiplication": { "n": 7, "maxN": 50 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "https://demo.example.org/api");
        assert_eq!(config.plot.x_domain, [-5.0, 5.0]);
        assert_eq!(config.plot.y_domain, [-10.0, 10.0]);
        assert_eq!(config.multiplication.n, 7);
        assert_eq!(config.multiplication.max_n, 50);
        assert_eq!(config.multiplication.p, [1.0, 2.0]);
    }

    #[test]
    fn test_invalid_json() {
        let err = Config::from_json(r#"{ "multiplication": { "n": -1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/crypto-demonstrator.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
