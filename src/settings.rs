use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:1338";
const DEFAULT_PAGE_SIZE: i64 = 25;
const DEFAULT_DATA_DIR: &str = "json_data";

/// Runtime settings, read from `STRAPI_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// CMS base URL (`STRAPI_URL`).
    pub url: String,
    /// Bearer token (`STRAPI_API_TOKEN`).
    #[serde(default)]
    pub api_token: Option<String>,
    pub page_size: u32,
    /// Where derived datasets are written (`STRAPI_DATA_DIR`).
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("STRAPI"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("page_size", DEFAULT_PAGE_SIZE)?
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("STRAPI").source(Some(map))
    }

    #[test]
    fn defaults() {
        let s = Settings::from_env(env(&[])).unwrap();
        assert_eq!(s.url, "http://localhost:1338");
        assert_eq!(s.page_size, 25);
        assert_eq!(s.token(), None);
        assert_eq!(s.data_file("brands.json"), PathBuf::from("json_data/brands.json"));
    }

    #[test]
    fn overrides() {
        let s = Settings::from_env(env(&[
            ("STRAPI_URL", "https://cms.example.com"),
            ("STRAPI_API_TOKEN", "secret"),
            ("STRAPI_PAGE_SIZE", "100"),
            ("STRAPI_DATA_DIR", "/tmp/out"),
        ]))
        .unwrap();
        assert_eq!(s.url, "https://cms.example.com");
        assert_eq!(s.token(), Some("secret"));
        assert_eq!(s.page_size, 100);
        assert_eq!(s.data_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn blank_token_is_none() {
        let s = Settings::from_env(env(&[("STRAPI_API_TOKEN", "")])).unwrap();
        assert_eq!(s.token(), None);
    }
}
