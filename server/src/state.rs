use std::sync::Arc;

use orders::ChargePolicy;
use reqwest::Client;

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub charge_policy: ChargePolicy,
    pub http: Client,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        Arc::new(Self {
            config,
            charge_policy: ChargePolicy::default(),
            http: Client::new(),
        })
    }
}
