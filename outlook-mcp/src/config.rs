//! Server configuration
//!
//! Read from `$OUTLOOK_MCP_CONFIG` or `<config_dir>/outlook-mcp/config.toml`,
//! then overridden by `OUTLOOK_MCP_*` environment variables. A missing
//! default file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

const CONFIG_ENV: &str = "OUTLOOK_MCP_CONFIG";
const CONFIG_DIR_NAME: &str = "outlook-mcp";
const CONFIG_FILE_NAME: &str = "config.toml";

fn default_python() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

/// Which mail store backs the tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Spawn the Outlook automation scripts
    #[default]
    Script,
    /// Serve a JSON fixture from memory
    Fixture,
}

impl Backend {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "script" => Ok(Self::Script),
            "fixture" => Ok(Self::Fixture),
            other => bail!("unknown backend '{other}', expected 'script' or 'fixture'"),
        }
    }
}

/// Per-operation wait limits, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub list_secs: u64,
    pub filter_secs: u64,
    pub search_secs: u64,
    pub read_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            list_secs: 30,
            filter_secs: 60,
            search_secs: 60,
            read_secs: 30,
        }
    }
}

impl TimeoutConfig {
    fn uniform(secs: u64) -> Self {
        Self {
            list_secs: secs,
            filter_secs: secs,
            search_secs: secs,
            read_secs: secs,
        }
    }

    #[must_use]
    pub fn list(&self) -> Duration {
        Duration::from_secs(self.list_secs)
    }

    #[must_use]
    pub fn filter(&self) -> Duration {
        Duration::from_secs(self.filter_secs)
    }

    #[must_use]
    pub fn search(&self) -> Duration {
        Duration::from_secs(self.search_secs)
    }

    #[must_use]
    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }
}

/// MCP server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    pub backend: Backend,
    /// Interpreter used to run the scripts
    pub python: Option<String>,
    /// Directory holding `outlook_*.py`; defaults to `<exe dir>/scripts`
    pub scripts_dir: Option<PathBuf>,
    /// Fixture file for the `fixture` backend
    pub fixture: Option<PathBuf>,
    /// Where `read` saves attachments. Fixture backend only: the scripts
    /// always save into their own temp folder.
    pub attachment_dir: Option<PathBuf>,
    /// Hand the compiled filter to `outlook_search.py` as `--dasl`. Only for
    /// scripts that declare the flag.
    pub dasl_filter: bool,
    /// Use `ci_phrasematch` instead of `LIKE` in search filters
    pub instant_search: bool,
    pub timeouts: TimeoutConfig,
}

impl McpConfig {
    /// Loads the file (if any) and applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `OUTLOOK_MCP_*` overrides from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(value) = lookup("OUTLOOK_MCP_BACKEND") {
            self.backend = Backend::parse(&value)?;
        }
        if let Some(value) = lookup("OUTLOOK_MCP_PYTHON") {
            self.python = Some(value);
        }
        if let Some(value) = lookup("OUTLOOK_MCP_SCRIPTS_DIR") {
            self.scripts_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("OUTLOOK_MCP_FIXTURE") {
            self.fixture = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("OUTLOOK_MCP_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse()
                .with_context(|| format!("OUTLOOK_MCP_TIMEOUT_SECS must be a number, got '{value}'"))?;
            self.timeouts = TimeoutConfig::uniform(secs);
        }
        if let Some(value) = lookup("OUTLOOK_MCP_INSTANT_SEARCH") {
            self.instant_search = is_truthy(&value);
        }
        if let Some(value) = lookup("OUTLOOK_MCP_DASL_FILTER") {
            self.dasl_filter = is_truthy(&value);
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.backend == Backend::Fixture && self.fixture.is_none() {
            bail!("the fixture backend requires 'fixture' (or OUTLOOK_MCP_FIXTURE)");
        }
        let t = &self.timeouts;
        if [t.list_secs, t.filter_secs, t.search_secs, t.read_secs].contains(&0) {
            bail!("timeouts must be at least one second");
        }
        Ok(())
    }

    /// Settings that the selected backend does not use.
    #[must_use]
    pub fn ignored_settings(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        match self.backend {
            Backend::Script => {
                if self.attachment_dir.is_some() {
                    ignored.push("attachment_dir");
                }
                if self.instant_search && !self.dasl_filter {
                    ignored.push("instant_search");
                }
            }
            Backend::Fixture => {
                if self.dasl_filter {
                    ignored.push("dasl_filter");
                }
                if self.instant_search {
                    ignored.push("instant_search");
                }
            }
        }
        ignored
    }

    #[must_use]
    pub fn interpreter(&self) -> String {
        self.python.clone().unwrap_or_else(default_python)
    }

    /// Configured scripts directory, else `scripts/` next to the executable.
    #[must_use]
    pub fn resolved_scripts_dir(&self) -> PathBuf {
        if let Some(dir) = &self.scripts_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("scripts")))
            .unwrap_or_else(|| PathBuf::from("scripts"))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
