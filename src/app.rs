use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::source::{FixtureSource, RecordSource, RemoteSource};

/// Persisted app credentials: where the messaging backend lives and how to
/// authenticate against it. app_id and region identify the tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppState {
    pub base_url: String,
    pub app_id: String,
    pub region: String,
    pub auth_key: String,
    pub token: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // TOML is preferred, but a JSON fallback is available. the program will attempt to convert legacy json to toml where possible
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let cfg_dir = base.config_dir();
        Some(cfg_dir.join("commhub.toml"))
    }

    fn legacy_json_path() -> Option<PathBuf> {
        let proj = directories::ProjectDirs::from("com", "example", "CommHub")?;
        Some(proj.config_dir().join("state.json"))
    }

    pub fn load() -> Self {
        if let Some(path) = Self::toml_path() {
            if let Ok(bytes) = fs::read(&path) {
                if let Ok(text) = String::from_utf8(bytes) {
                    if let Ok(state) = toml::from_str::<AppState>(&text) {
                        return state;
                    }
                }
            }
        }

        if let Some(legacy) = Self::legacy_json_path() {
            if let Ok(bytes) = fs::read(&legacy) {
                if let Ok(state) = serde_json::from_slice::<AppState>(&bytes) {
                    let _ = state.save();
                    return state;
                }
            }
        }

        Self::new()
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::toml_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let toml = toml::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            fs::write(path, toml)
        } else {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No config dir"))
        }
    }

    /// Whether the backend can be used at all; without credentials the app
    /// runs on the demo fixtures.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.auth_key.is_empty()
    }
}

/// Pick the record source for this run: the live backend when credentials
/// are present, the demo fixtures otherwise.
pub fn choose_source(state: &AppState) -> Box<dyn RecordSource> {
    if state.is_configured() {
        log::info!("using remote record source at {}", state.base_url);
        Box::new(RemoteSource::new(state.clone()))
    } else {
        log::info!("no credentials configured, using fixture records");
        Box::new(FixtureSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unconfigured() {
        let state = AppState::new();
        assert!(!state.is_configured());
        assert!(state.token.is_none());
    }

    #[test]
    fn toml_round_trip() {
        let state = AppState {
            base_url: "https://chat.example.com".into(),
            app_id: "2650020f03ff346".into(),
            region: "eu".into(),
            auth_key: "secret".into(),
            token: Some("tok".into()),
        };
        let text = toml::to_string_pretty(&state).unwrap();
        let back: AppState = toml::from_str(&text).unwrap();
        assert_eq!(back, state);
        assert!(back.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_state_serves_fixtures() {
        let source = choose_source(&AppState::new());
        let users = source.list_users().await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].name, "Alice Johnson");
    }
}
