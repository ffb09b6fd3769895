use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub hasura_url: String,
    pub hasura_admin_secret: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "4040"),
            hasura_url: try_load("HASURA_URL", "http://localhost:8080/v1/graphql"),
            hasura_admin_secret: read_secret("HASURA_ADMIN_SECRET"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Docker secret file first, plain env var as the local-dev fallback.
fn read_secret(secret_name: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    if let Ok(contents) = read_to_string(&path) {
        return contents.trim().to_string();
    }

    var(secret_name)
        .map_err(|_| {
            warn!("Secret {secret_name} found neither in {path} nor in the environment");
        })
        .expect("Secrets misconfigured!")
}
