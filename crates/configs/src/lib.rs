use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub mobile: MobileConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            log_format: default_log_format(),
        }
    }
}

/// Where the record store keeps its JSON snapshot. `None` keeps everything in memory.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AuthConfig {
    /// Static bearer token; when unset the data endpoints are open.
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MobileConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_uisp_base_url")]
    pub uisp_base_url: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_banner")]
    pub banner: String,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            uisp_base_url: default_uisp_base_url(),
            environment: default_environment(),
            banner: default_banner(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_format() -> String {
    "compact".into()
}

fn default_api_base_url() -> String {
    "http://localhost:8080".into()
}

fn default_uisp_base_url() -> String {
    "http://localhost".into()
}

fn default_environment() -> String {
    "dev".into()
}

fn default_banner() -> String {
    "Demo backend".into()
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (if present), apply environment overrides and validate.
    ///
    /// A missing file is not an error; a file that exists but does not parse is.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("invalid config file {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment values on top of the file configuration.
    /// `lookup` is injected so tests do not have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("API_ADDR") {
            let (host, port) = parse_listen_addr(&addr)?;
            if let Some(host) = host {
                self.server.host = host;
            }
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS") {
            let w = w
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("TOKIO_WORKER_THREADS is not a number: {e}"))?;
            self.server.worker_threads = Some(w);
        }
        if let Some(fmt) = lookup("LOG_FORMAT") {
            self.server.log_format = fmt;
        }
        if let Some(path) = lookup("STORE_PATH") {
            self.store.path = Some(path);
        }
        if let Some(token) = lookup("API_TOKEN") {
            self.auth.api_token = Some(token);
        }
        if let Some(url) = lookup("API_BASE_URL") {
            self.mobile.api_base_url = url;
        }
        if let Some(url) = lookup("UISP_BASE_URL") {
            self.mobile.uisp_base_url = url;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.mobile.environment = env;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.path = non_empty(self.store.path.take());
        self.auth.api_token = non_empty(self.auth.api_token.take());
        self.mobile.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.log_format.trim().is_empty() {
            self.log_format = default_log_format();
        }
        Ok(())
    }

    /// `host:port` string suitable for `SocketAddr` parsing.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MobileConfig {
    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("mobile.api_base_url", &self.api_base_url),
            ("mobile.uisp_base_url", &self.uisp_base_url),
        ] {
            let lower = url.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("{name} must start with http:// or https://"));
            }
        }
        Ok(())
    }

    /// Push registration endpoint advertised to the mobile client.
    pub fn push_register_url(&self) -> String {
        format!("{}/push/register", self.api_base_url.trim_end_matches('/'))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let t = v.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

// 支持 ":8080" 与 "127.0.0.1:8080" 两种写法
fn parse_listen_addr(addr: &str) -> Result<(Option<String>, u16)> {
    let (host, port) = addr
        .trim()
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("API_ADDR must look like host:port or :port, got {addr}"))?;
    let port = port
        .parse::<u16>()
        .map_err(|e| anyhow!("API_ADDR has an invalid port: {e}"))?;
    let host = if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    };
    Ok((host, port))
}
