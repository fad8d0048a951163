use std::{
    env::{self, VarError},
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use infosphere_core::{
    error::Error,
    firestore::{self, FirestoreConfig},
};
use platform_dirs::AppDirs;
use serde::Deserialize;

const APP_NAME: &str = "InfoSphere";
const CONFIG_FILENAME: &str = "config.json";
const PROXY_ENV_VAR: &str = "HTTPS_PROXY";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    pub id_token: Option<String>,
    pub endpoint: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: firestore::DEFAULT_DATABASE.to_string(),
            api_key: None,
            id_token: None,
            endpoint: firestore::DEFAULT_ENDPOINT.to_string(),
            page_size: firestore::DEFAULT_PAGE_SIZE,
            timeout_secs: firestore::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    /// Load the config from `path`, or from the platform config dir when no
    /// path is given.  A missing default config is not an error.
    pub fn load(path: Option<&Path>) -> Result<Config, Error> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    log::info!("no config file found, using defaults");
                    Ok(Config::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, Error> {
        log::info!("loading config: {:?}", path);
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn proxy(&self) -> Option<String> {
        env::var(PROXY_ENV_VAR).map_or_else(
            |err| match err {
                VarError::NotPresent => None,
                VarError::NotUnicode(_) => {
                    log::error!("proxy URL is not a valid unicode");
                    None
                }
            },
            Some,
        )
    }

    pub fn firestore(&self) -> Result<FirestoreConfig, Error> {
        if self.project_id.is_empty() {
            return Err(Error::InvalidConfig(
                "project_id is not set, pass --project or add it to config.json".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(Error::InvalidConfig("page_size must be positive".into()));
        }
        Ok(FirestoreConfig {
            endpoint: self.endpoint.clone(),
            project_id: self.project_id.clone(),
            database: self.database.clone(),
            api_key: self.api_key.clone(),
            id_token: self.id_token.clone(),
            proxy_url: self.proxy(),
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"project_id": "fire-1", "api_key": "abc"}}"#).unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.project_id, "fire-1");
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.database, "(default)");
        assert_eq!(config.endpoint, firestore::DEFAULT_ENDPOINT);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(Config::load(Some(&path)), Err(Error::IoError(_))));
    }

    #[test]
    fn firestore_config_needs_a_project() {
        assert!(matches!(
            Config::default().firestore(),
            Err(Error::InvalidConfig(_))
        ));
        let config = Config {
            project_id: "fire-1".into(),
            timeout_secs: 0,
            ..Config::default()
        };
        let firestore = config.firestore().unwrap();
        assert_eq!(firestore.project_id, "fire-1");
        assert_eq!(firestore.timeout, Duration::from_secs(1));
    }
}
