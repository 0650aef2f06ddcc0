//! Service configuration
//!
//! Loaded from a TOML file when one is given; every field has a
//! default so a bare `farecast-service` run works out of the box.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Directory holding the trained model bundle.
    pub model_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().unwrap_or_else(|_| {
                SocketAddr::from(([127, 0, 0, 1], 8080))
            }),
            model_dir: PathBuf::from("models/farecast"),
        }
    }
}

impl ServiceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.as_ref().display()))
    }
}
