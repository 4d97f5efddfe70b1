use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use missive_directory::HashConfig;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub hash: HashConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("MISSIVE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("MISSIVE_JWT_SECRET is unset or still a placeholder");
        }

        let defaults = HashConfig::default();
        let parse = |key: &str, default: u32| -> Result<u32> {
            match lookup(key) {
                Some(v) => v.parse().with_context(|| format!("{key} must be an integer, got '{v}'")),
                None => Ok(default),
            }
        };

        Ok(Self {
            db_path: lookup("MISSIVE_DB_PATH").unwrap_or_else(|| "missive.db".into()).into(),
            host: lookup("MISSIVE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("MISSIVE_PORT")
                .unwrap_or_else(|| "3000".into())
                .parse()
                .context("MISSIVE_PORT must be a port number")?,
            jwt_secret,
            hash: HashConfig {
                memory_kib: parse("MISSIVE_HASH_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse("MISSIVE_HASH_ITERATIONS", defaults.iterations)?,
                parallelism: parse("MISSIVE_HASH_PARALLELISM", defaults.parallelism)?,
            },
        })
    }
}
