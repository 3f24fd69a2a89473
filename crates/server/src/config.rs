//! Runtime configuration for the HTTP service.
//!
//! The binary fills this from command-line flags and environment variables;
//! tests build it directly.

use std::path::PathBuf;

use catalog::{seed, MovieStore};

use crate::origin::{OriginGate, DEFAULT_ALLOWED_ORIGINS};

/// Port used when neither `--port` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 1234;

/// Bind every interface unless `--host` or `HOST` narrows it
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seed file to load; `None` uses the seed embedded in the binary
    pub seed: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn origin_gate(&self) -> OriginGate {
        OriginGate::new(self.allowed_origins.iter().cloned())
    }

    pub fn load_store(&self) -> catalog::Result<MovieStore> {
        match &self.seed {
            Some(path) => seed::load_from_file(path),
            None => seed::load_default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed: None,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}
