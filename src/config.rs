use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::license::overrides::{default_rules, OverrideRule};

/// Root configuration structure, deserialized from `.pom-licenses/config.toml`.
///
/// Every field is optional in the file; missing ones take the built-in defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dependency groups (Maven scopes, Gradle configurations) to analyze.
    pub groups: Vec<String>,
    /// Remote Maven repositories, tried in order after the local repository.
    pub repositories: Vec<String>,
    /// Maven local repository; defaults to `~/.m2/repository`.
    pub local_repository: Option<PathBuf>,
    /// Skip remote repositories entirely.
    pub offline: bool,
    pub resolver: ResolverConfig,
    /// Fixed license assignments by group id. Replaces the built-in table when set.
    pub overrides: Vec<OverrideRule>,
}

/// Limits and tuning for the parent-chain walk.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum number of parent hops per dependency.
    pub max_depth: usize,
    /// Memoize descriptors for the duration of the run.
    pub cache: bool,
    /// How many dependencies are resolved at once.
    pub concurrency: usize,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_depth: 32,
            cache: true,
            concurrency: 75,
            timeout_secs: 10,
        }
    }
}

impl Default for Config {
    /// Built-in configuration used when no config file is found.
    ///
    /// Covers the usual production scopes and configurations, Maven Central
    /// plus Google's repository, and the Android support override.
    fn default() -> Self {
        let groups = [
            "compile",
            "runtime",
            "api",
            "implementation",
            "runtimeOnly",
            "compileClasspath",
            "runtimeClasspath",
        ];

        Config {
            groups: groups.iter().map(|g| g.to_string()).collect(),
            repositories: vec![
                "https://repo1.maven.org/maven2".to_string(),
                "https://maven.google.com".to_string(),
            ],
            local_repository: None,
            offline: false,
            resolver: ResolverConfig::default(),
            overrides: default_rules(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.pom-licenses/config.toml`
/// 3. `~/.config/pom-licenses/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".pom-licenses").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("pom-licenses").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
