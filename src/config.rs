//! Server configuration read from the environment.

use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding tournament snapshots.
    pub data_dir: PathBuf,
    /// Fixed seed for seeding and colour resolution; random when unset.
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `DATA_DIR` and `RNG_SEED`; unset or invalid values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Invalid PORT {:?}, using {}", p, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        let rng_seed = lookup("RNG_SEED").and_then(|s| match s.parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                log::warn!("Invalid RNG_SEED {:?}, seeding from entropy", s);
                None
            }
        });
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            rng_seed,
        }
    }
}
