use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 5000;

/// Origins allowed in development: the local Vite dev server.
const DEV_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 5000).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,taskd=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// Bind address for the HTTP server (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Deployment environment: "development" (default) | "production".
    /// Selects which CORS allow-list applies.
    environment: Option<String>,
    /// CORS allow-list used when `environment = "production"`.
    allowed_origins: Option<Vec<String>>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── DaemonConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Bind address for the HTTP server (TASKD_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Deployment environment: "development" (default) or "production".
    pub environment: String,
    /// Production CORS allow-list (TASKD_ALLOWED_ORIGINS env var, comma-separated,
    /// or `allowed_origins` in config.toml).
    pub allowed_origins: Vec<String>,
}

impl DaemonConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        // Plain PORT is honored for parity with common PaaS environments.
        let port = port
            .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
            .or(toml.port)
            .unwrap_or(DEFAULT_PORT);

        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("TASKD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let environment = std::env::var("TASKD_ENV")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.environment)
            .unwrap_or_else(|| "development".to_string());

        let allowed_origins = std::env::var("TASKD_ALLOWED_ORIGINS")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .or(toml.allowed_origins)
            .unwrap_or_default();

        Self {
            port,
            data_dir,
            log,
            log_format,
            bind_address,
            environment,
            allowed_origins,
        }
    }

    /// Path of the JSON task file.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join("data.json")
    }

    /// The CORS allow-list in effect: the configured production list when
    /// `environment = "production"`, the local dev-server list otherwise.
    pub fn cors_origins(&self) -> Vec<String> {
        if self.environment == "production" {
            self.allowed_origins.clone()
        } else {
            DEV_ORIGINS.iter().map(|o| o.to_string()).collect()
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/taskd
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("taskd");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/taskd or ~/.local/share/taskd
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("taskd");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("taskd");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\taskd
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("taskd");
        }
    }
    // Fallback
    PathBuf::from(".taskd")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_format, "pretty");
        assert_eq!(config.data_file(), dir.path().join("data.json"));
    }

    #[test]
    fn cli_args_override_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "port = 6000\nlog = \"debug\"\nbind_address = \"0.0.0.0\"\n",
        )
        .unwrap();
        let config = DaemonConfig::new(
            Some(7000),
            Some(dir.path().to_path_buf()),
            None,
            None,
        );
        // CLI wins for port; TOML fills in the rest.
        assert_eq!(config.port, 7000);
        assert_eq!(config.log, "debug");
        assert_eq!(config.bind_address, "0.0.0.0");
    }

    #[test]
    fn dev_environment_uses_local_origins() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.cors_origins(), DEV_ORIGINS.to_vec());
    }

    #[test]
    fn production_environment_uses_configured_origins() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "environment = \"production\"\nallowed_origins = [\"https://tasks.example.com\"]\n",
        )
        .unwrap();
        let config = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(config.cors_origins(), vec!["https://tasks.example.com"]);
    }
}
