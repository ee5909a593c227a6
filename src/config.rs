//! Server configuration.
//!
//! A [`Config`] is built once at startup from defaults, an optional YAML
//! file, the environment and command line flags, then shared read-only
//! between every connection task.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_ROOT: &str = "/srv/gopher";
pub const DEFAULT_PORT: u16 = 70;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory served as the selector root.
    pub root: PathBuf,
    /// Hostname presented in self-referential menu lines.
    pub hostname: String,
    /// Port presented in self-referential menu lines.
    pub port: u16,
    /// Address to bind. Defaults to `hostname:port`.
    pub bind: Option<String>,
    /// Seconds to wait for the request line before dropping the client.
    pub read_timeout: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            hostname: default_hostname(),
            port: DEFAULT_PORT,
            bind: None,
            read_timeout: None,
        }
    }
}

/// The machine's hostname, or `localhost` if it is unset or not UTF-8.
pub fn default_hostname() -> String {
    gethostname::gethostname()
        .into_string()
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

impl Config {
    /// Loads configuration from the process environment on top of defaults.
    pub fn load() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Reads a YAML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Builds a configuration from defaults plus whatever `lookup` returns
    /// for the `GOPHER_*` variables.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_env(lookup)
    }

    /// Overrides fields from `GOPHER_ROOT`, `GOPHER_HOSTNAME`, `GOPHER_PORT`
    /// and `GOPHER_BIND`. Unparseable ports are ignored with a warning.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("GOPHER_ROOT") {
            self.root = PathBuf::from(root);
        }
        if let Some(hostname) = lookup("GOPHER_HOSTNAME") {
            self.hostname = hostname;
        }
        if let Some(port) = lookup("GOPHER_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid GOPHER_PORT"),
            }
        }
        if let Some(bind) = lookup("GOPHER_BIND") {
            self.bind = Some(bind);
        }
        self
    }

    /// Applies command line flags, which take precedence over every other source.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(root) = &cli.root {
            self.root = root.clone();
        }
        if let Some(hostname) = &cli.hostname {
            self.hostname = hostname.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(bind) = &cli.bind {
            self.bind = Some(bind.clone());
        }
        if let Some(secs) = cli.read_timeout {
            self.read_timeout = Some(secs);
        }
        self
    }

    /// The socket address the listener binds to.
    pub fn listen_addr(&self) -> String {
        match &self.bind {
            Some(bind) => bind.clone(),
            None if self.hostname.contains(':') => format!("[{}]:{}", self.hostname, self.port),
            None => format!("{}:{}", self.hostname, self.port),
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout.map(Duration::from_secs)
    }

    /// Checks that the root directory exists. Called once before binding.
    pub fn validate(&self) -> anyhow::Result<()> {
        let meta = std::fs::metadata(&self.root)
            .with_context(|| format!("Root directory '{}' not found", self.root.display()))?;
        if !meta.is_dir() {
            bail!("Root '{}' is not a directory", self.root.display());
        }
        Ok(())
    }
}

/// Command line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "gopherd", version, about = "Serve a directory tree over Gopher")]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root directory of the server
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Hostname to present in menus
    #[arg(long)]
    pub hostname: Option<String>,

    /// Port to present in menus (and bind, unless --bind is given)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind instead of hostname:port
    #[arg(long)]
    pub bind: Option<String>,

    /// Seconds to wait for a request line
    #[arg(long)]
    pub read_timeout: Option<u64>,
}

impl Cli {
    /// Resolves the final configuration: file (or defaults), then
    /// environment, then flags.
    pub fn into_config(self) -> anyhow::Result<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?.with_env(|key| std::env::var(key).ok()),
            None => Config::load(),
        };
        Ok(base.with_cli(&self))
    }
}
