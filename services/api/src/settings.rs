//! Service settings loaded from `MRP__*` environment variables
//!
//! | Variable                               | Default   |
//! |----------------------------------------|-----------|
//! | `MRP__SERVER__HOST`                    | `0.0.0.0` |
//! | `MRP__SERVER__PORT`                    | `3001`    |
//! | `MRP__RECOMMENDATIONS__DEFAULT_LIMIT`  | `10`      |
//! | `MRP__RECOMMENDATIONS__MAX_LIMIT`      | `50`      |

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub recommendations: RecommendationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("recommendations.default_limit", 10)?
            .set_default("recommendations.max_limit", 50)?
            .add_source(
                Environment::with_prefix("MRP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if settings.recommendations.max_limit == 0 {
            return Err(ConfigError::Message(
                "recommendations.max_limit must be at least 1".to_string(),
            ));
        }

        Ok(settings)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve a requested recommendation count against the configured bounds
    pub fn recommendation_limit(&self, requested: Option<usize>) -> usize {
        let max = self.recommendations.max_limit;
        requested
            .unwrap_or(self.recommendations.default_limit)
            .clamp(1, max)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            recommendations: RecommendationSettings {
                default_limit: 10,
                max_limit: 50,
            },
        }
    }
}
