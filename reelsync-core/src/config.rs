//! Engine configuration.
//!
//! Loaded the same way as the rest of our tooling: an explicit file path,
//! then inline JSON, then a default file next to the working directory, and
//! finally built-in defaults. API keys may always be overridden from the
//! environment.

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReconcileConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// How `num_seasons` is computed before a show is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonCountStrategy {
    /// Count distinct seasons of the in-memory episode list and write once.
    #[default]
    InMemory,
    /// Write, ask the store for the distinct `episodes.season` values of the
    /// saved document, then write again with the count.
    StoreQuery,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Season catalog requests in flight per show.
    pub season_concurrency: usize,
    pub season_count: SeasonCountStrategy,
    /// Preferred artwork/metadata language (ISO-639-1).
    pub language: String,
    pub providers: ProviderKeys,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            season_concurrency: 2,
            season_count: SeasonCountStrategy::default(),
            language: "en".to_string(),
            providers: ProviderKeys::default(),
        }
    }
}

/// Credentials and transport settings for the bundled provider adapters.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderKeys {
    pub trakt_client_id: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub fanart_api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ProviderKeys {
    fn default() -> Self {
        Self {
            trakt_client_id: None,
            tmdb_api_key: None,
            omdb_api_key: None,
            fanart_api_key: None,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("ProviderKeys")
            .field("trakt_client_id", &redact(&self.trakt_client_id))
            .field("tmdb_api_key", &redact(&self.tmdb_api_key))
            .field("omdb_api_key", &redact(&self.omdb_api_key))
            .field("fanart_api_key", &redact(&self.fanart_api_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ProviderKeys {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Override keys with `TRAKT_CLIENT_ID`, `TMDB_API_KEY`, `OMDB_API_KEY`
    /// and `FANART_API_KEY` when they are set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        fn from_env(name: &str) -> Option<String> {
            env::var(name).ok().filter(|value| !value.trim().is_empty())
        }

        if let Some(value) = from_env("TRAKT_CLIENT_ID") {
            self.trakt_client_id = Some(value);
        }
        if let Some(value) = from_env("TMDB_API_KEY") {
            self.tmdb_api_key = Some(value);
        }
        if let Some(value) = from_env("OMDB_API_KEY") {
            self.omdb_api_key = Some(value);
        }
        if let Some(value) = from_env("FANART_API_KEY") {
            self.fanart_api_key = Some(value);
        }
    }
}

impl ReconcileConfig {
    /// Season fan-out limit, never below one worker.
    pub fn season_workers(&self) -> usize {
        self.season_concurrency.max(1)
    }

    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$RECONCILE_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$RECONCILE_CONFIG_JSON` (inline JSON),
    /// 3) `reconcile.toml` / `reconcile.json` (also under `config/`),
    /// 4) defaults.
    ///
    /// Provider keys from the environment win over every source.
    pub fn load_from_env() -> anyhow::Result<(Self, ReconcileConfigSource)> {
        let (mut config, source) = Self::load_layers()?;
        config.providers.apply_env_overrides();
        Ok((config, source))
    }

    fn load_layers() -> anyhow::Result<(Self, ReconcileConfigSource)> {
        if let Ok(path_str) = env::var("RECONCILE_CONFIG_PATH")
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ReconcileConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var("RECONCILE_CONFIG_JSON")
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .context("failed to parse RECONCILE_CONFIG_JSON")?;
            return Ok((parsed, ReconcileConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ReconcileConfigSource::File(path)));
        }

        Ok((Self::default(), ReconcileConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read reconcile config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid reconcile config {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!(
                        "invalid reconcile config {}: {}",
                        path.display(),
                        err
                    )
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse reconcile config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid reconcile config json: {err}"))
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "reconcile.toml",
            "reconcile.json",
            "config/reconcile.toml",
            "config/reconcile.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}
