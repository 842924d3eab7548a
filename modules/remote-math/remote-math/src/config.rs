//! Server configuration
//!
//! Layered loading, lowest to highest precedence:
//! 1. built-in defaults (local registry on the default port, name `"Compute"`)
//! 2. YAML file given with `--config`
//! 3. environment variables prefixed with `MATH_SERVER__` (`__` separates nesting)
//! 4. command-line overrides

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use naming_sdk::DEFAULT_REGISTRY_URI;
use remote_math_sdk::DEFAULT_BINDING_NAME;
use rmath_transport_grpc::GrpcClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::StartupError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "MATH_SERVER__";

/// What to do when the binding name is already taken in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindPolicy {
    /// Plain bind: a taken name fails startup.
    #[default]
    Reject,
    /// Rebind: overwrite the existing binding.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name the object is published under.
    pub binding_name: String,
    /// Location of the name registry.
    pub registry_uri: String,
    /// Address the exported object listens on; port 0 picks an ephemeral port.
    pub listen_addr: String,
    /// Host written into the published endpoint instead of the bound address.
    pub advertise_host: Option<String>,
    pub bind_policy: BindPolicy,
    /// Remove the binding when the server shuts down gracefully.
    pub unbind_on_shutdown: bool,
    /// Connect timeout for the registry, in milliseconds.
    pub connect_timeout_ms: u64,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            binding_name: DEFAULT_BINDING_NAME.to_owned(),
            registry_uri: DEFAULT_REGISTRY_URI.to_owned(),
            listen_addr: "127.0.0.1:0".to_owned(),
            advertise_host: None,
            bind_policy: BindPolicy::Reject,
            unbind_on_shutdown: true,
            connect_timeout_ms: 5000,
            logging: LoggingConfig::default(),
        }
    }
}

/// Command-line values that override loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub registry_uri: Option<String>,
    pub binding_name: Option<String>,
    pub listen_addr: Option<String>,
    pub rebind: bool,
    pub verbose: u8,
}

/// Filter directive for `-v` repetitions, if any were given.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

impl ServerConfig {
    /// Build the layered provider without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load defaults, the optional YAML file and environment overrides.
    ///
    /// # Errors
    /// Returns [`StartupError::InvalidConfig`] if `path` does not exist or any
    /// layer holds a value of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, StartupError> {
        if let Some(path) = path
            && !path.is_file()
        {
            return Err(StartupError::InvalidConfig(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }

        Self::figment(path)
            .extract()
            .map_err(|e| StartupError::InvalidConfig(e.to_string()))
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(uri) = &cli.registry_uri {
            self.registry_uri.clone_from(uri);
        }
        if let Some(name) = &cli.binding_name {
            self.binding_name.clone_from(name);
        }
        if let Some(addr) = &cli.listen_addr {
            self.listen_addr.clone_from(addr);
        }
        if cli.rebind {
            self.bind_policy = BindPolicy::Replace;
        }
        if let Some(level) = level_for_verbosity(cli.verbose) {
            level.clone_into(&mut self.logging.level);
        }
    }

    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`StartupError::InvalidConfig`] if `listen_addr` is not `host:port`.
    pub fn listen_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        self.listen_addr.parse().map_err(|e| {
            StartupError::InvalidConfig(format!("listen_addr '{}': {e}", self.listen_addr))
        })
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Transport settings for the registry connection. Startup makes one attempt.
    #[must_use]
    pub fn registry_client_config(&self) -> GrpcClientConfig {
        GrpcClientConfig::new("naming")
            .with_connect_timeout(self.connect_timeout())
            .with_max_retries(0)
    }
}
