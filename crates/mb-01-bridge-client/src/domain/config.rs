//! Bridge client configuration with validation.

use serde::{Deserialize, Serialize};
use shared_types::{duration_serde, EndpointName};
use std::collections::HashMap;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-call deadlines
    pub timeouts: TimeoutConfig,
}

impl ClientConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.default.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "default timeout cannot be 0".into(),
            ));
        }

        if let Some((endpoint, _)) = self
            .timeouts
            .per_endpoint
            .iter()
            .find(|(_, timeout)| timeout.is_zero())
        {
            return Err(ConfigError::InvalidTimeout(format!(
                "timeout for {} cannot be 0",
                endpoint
            )));
        }

        Ok(())
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for endpoints without an override
    #[serde(with = "duration_serde")]
    pub default: Duration,
    /// Per-endpoint overrides
    #[serde(with = "duration_map_serde")]
    pub per_endpoint: HashMap<EndpointName, Duration>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        let mut per_endpoint = HashMap::new();
        // Header rules are local to the extension; no scraping involved
        per_endpoint.insert(EndpointName::UpdateRules, Duration::from_secs(5));

        Self {
            default: Duration::from_secs(30),
            per_endpoint,
        }
    }
}

impl TimeoutConfig {
    /// Deadline for a call to `endpoint`
    pub fn for_endpoint(&self, endpoint: EndpointName) -> Duration {
        self.per_endpoint
            .get(&endpoint)
            .copied()
            .unwrap_or(self.default)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

mod duration_map_serde {
    use shared_types::duration_serde::{format_duration, parse_duration};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use shared_types::EndpointName;
    use std::collections::{BTreeMap, HashMap};
    use std::time::Duration;

    pub fn serialize<S>(
        map: &HashMap<EndpointName, Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        map.iter()
            .map(|(endpoint, duration)| (*endpoint, format_duration(*duration)))
            .collect::<BTreeMap<_, _>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<EndpointName, Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<EndpointName, String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(endpoint, value)| {
                parse_duration(&value)
                    .map(|duration| (endpoint, duration))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
