pub mod render;
pub mod server;

use crate::modules::{config::AppConfig, user_page::UserPageService};
use anyhow::{Context, Result};
use atcoder_stats_libs::{CachedApiClient, KenkooooClient};
use std::sync::Arc;

/// Builds the page service backed by the AtCoder Problems API named in `config`.
pub fn create_service(config: &AppConfig) -> Result<Arc<UserPageService>> {
    tracing::info!("Connect to AtCoder Problems at {}", config.atcoder_problems_url);
    let api = KenkooooClient::new(&config.atcoder_problems_url).with_context(|| {
        let message = "couldn't create AtCoder Problems client. check the value of ATCODER_PROBLEMS_URL environment variable.";
        tracing::error!(message);
        message
    })?;

    let client = Arc::new(CachedApiClient::new(Arc::new(api), config.cache_ttl));
    Ok(Arc::new(UserPageService::new(client, config.deadlines)))
}
