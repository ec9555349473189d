use crate::modules::user_page::reconcile::Deadlines;
use anyhow::{Context, Result};
use atcoder_stats_libs::client::DEFAULT_BASE_URL;
use std::{env, fmt::Display, str::FromStr, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub atcoder_problems_url: String,
    pub cache_ttl: Duration,
    pub deadlines: Deadlines,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Deadlines::default();

        let atcoder_problems_url = env_or("ATCODER_PROBLEMS_URL", DEFAULT_BASE_URL.to_string())?;
        let cache_ttl: u64 = env_or("CACHE_TTL_SECS", 300)?;
        let sources: u64 = env_or("SOURCE_DEADLINE_MS", defaults.sources.as_millis() as u64)?;
        let submissions: u64 = env_or(
            "SUBMISSIONS_DEADLINE_MS",
            defaults.submissions.as_millis() as u64,
        )?;

        Ok(Self {
            atcoder_problems_url,
            cache_ttl: Duration::from_secs(cache_ttl),
            deadlines: Deadlines {
                submissions: Duration::from_millis(submissions),
                sources: Duration::from_millis(sources),
            },
        })
    }
}

/// Reads `key` from the environment, falling back to `default` when it is unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value.parse::<T>().with_context(|| {
            let message = format!("couldn't parse {} environment variable: `{}`", key, value);
            tracing::error!(message);
            message
        }),
        Err(_) => {
            tracing::warn!(
                "{} environment variable is not set. Default value `{}` will be used.",
                key,
                default
            );
            Ok(default)
        }
    }
}
