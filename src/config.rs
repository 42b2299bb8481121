use serde::{Deserialize, Serialize};

use crate::errors::CanaryError;

const CONFIG_FILE_NAME: &str = "config.json";

// Shared community credentials baked in as defaults; a local config file
// overrides them.
const DEFAULT_GEONAMES_USERNAME: &str = "codap";
const DEFAULT_GEOAPIFY_API_KEY: &str = "cd1a1690ccd74ab1ba583af1dd732ec5";
const DEFAULT_PURPLE_AIR_API_KEY: &str = "CA299E4B-82DF-11EC-B9BF-42010A800003";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub geonames_username: String,
    pub geoapify_api_key: String,
    pub purple_air_api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geonames_username: DEFAULT_GEONAMES_USERNAME.to_string(),
            geoapify_api_key: DEFAULT_GEOAPIFY_API_KEY.to_string(),
            purple_air_api_key: DEFAULT_PURPLE_AIR_API_KEY.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("canary").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).expect("Could not open config file");
            Some(serde_json::from_reader(file).expect("Could not parse config file"))
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), CanaryError> {
        let config_path = dirs::config_dir()
            .ok_or(CanaryError::NoConfigDir)?
            .join("canary")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            std::fs::create_dir_all(config_path.parent().unwrap())
                .map_err(|e| CanaryError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| CanaryError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self).map_err(|e| CanaryError::ConfigSerializeError { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_carries_shared_credentials() {
        let config = ApiConfig::default();
        assert_eq!(config.geonames_username, DEFAULT_GEONAMES_USERNAME);
        assert!(!config.geoapify_api_key.is_empty());
        assert!(!config.purple_air_api_key.is_empty());
    }

    #[test]
    fn test_partial_config_file_fills_in_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"geonames_username": "demo"}"#).unwrap();
        assert_eq!(config.geonames_username, "demo");
        assert_eq!(config.purple_air_api_key, DEFAULT_PURPLE_AIR_API_KEY);
    }
}
