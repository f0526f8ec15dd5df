//! Monitor configuration.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a subscription lives without renewal.
pub const DEFAULT_SUBSCRIPTION_TTL: Duration = Duration::from_secs(65 * 60);

/// How often the background sweep evicts expired subscriptions.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Monitor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Lifetime granted by each subscribe or renew request.
    /// Default: 65 minutes
    #[serde(rename = "subscription_ttl_ms", with = "millis")]
    pub subscription_ttl: Duration,

    /// Interval between expiry sweeps.
    /// Default: 5 minutes
    #[serde(rename = "sweep_interval_ms", with = "millis")]
    pub sweep_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            subscription_ttl: DEFAULT_SUBSCRIPTION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl MonitorConfig {
    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subscription_ttl.is_zero() {
            return Err(MonitorError::InvalidConfig(
                "subscription_ttl_ms must be positive".into(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(MonitorError::InvalidConfig(
                "sweep_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
