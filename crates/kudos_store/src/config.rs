use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use kudos_core::{RatingsError, RatingsResult};

const DEFAULT_CONFIG_NAME: &str = "ratings.json";

/// Per-manager configuration. `average_storage_hint` is only read by the
/// composition layer when it picks a coordinator implementation; the store
/// itself never consults it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatingsConfig {
    pub scale: i64,
    pub store_zero: bool,
    pub store_average: bool,
    pub dedicated_partition: bool,
    pub average_storage_hint: Option<String>,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            scale: 5,
            store_zero: false,
            store_average: true,
            dedicated_partition: false,
            average_storage_hint: None,
        }
    }
}

impl RatingsConfig {
    pub fn with_scale(mut self, scale: i64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_store_zero(mut self, store_zero: bool) -> Self {
        self.store_zero = store_zero;
        self
    }

    pub fn with_store_average(mut self, store_average: bool) -> Self {
        self.store_average = store_average;
        self
    }

    pub fn with_dedicated_partition(mut self, dedicated: bool) -> Self {
        self.dedicated_partition = dedicated;
        self
    }

    /// Reads `ratings.json` under `base_dir`, seeding it with defaults when
    /// the file does not exist yet.
    pub fn load_or_init(base_dir: &Path) -> RatingsResult<Self> {
        fs::create_dir_all(base_dir)
            .map_err(|err| RatingsError::storage(format!("create config dir: {err}")))?;
        let config_path = base_dir.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .map_err(|err| RatingsError::storage(format!("read config: {err}")))?;
            let config: RatingsConfig = serde_json::from_str(&raw)
                .map_err(|err| RatingsError::validation(err.to_string()))?;
            return Ok(config);
        }
        let default = RatingsConfig::default();
        let payload = serde_json::to_string_pretty(&default)
            .map_err(|err| RatingsError::storage(format!("serialize config: {err}")))?;
        fs::write(&config_path, payload)
            .map_err(|err| RatingsError::storage(format!("write config: {err}")))?;
        Ok(default)
    }
}
