use crate::application::ApprovalPolicy;
use crate::infrastructure::security::RateLimits;
use recipe_errors::AppError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub site_addr: SocketAddr,
    pub seed_path: Option<PathBuf>,
    pub approval: ApprovalPolicy,
    pub rate_limits: RateLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = ApprovalPolicy::default();
        let limits = RateLimits::default();

        Ok(Self {
            site_addr: try_load(&lookup, "SITE_ADDR", "127.0.0.1:3000")?,
            seed_path: lookup("RECIPE_SEED_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            approval: ApprovalPolicy {
                min_votes: try_load(&lookup, "APPROVAL_MIN_VOTES", defaults.min_votes)?,
                min_upvote_percent: try_load(&lookup, "APPROVAL_MIN_PERCENT", defaults.min_upvote_percent)?,
            },
            rate_limits: RateLimits {
                per_minute: try_load(&lookup, "RATE_LIMIT_PER_MINUTE", limits.per_minute)?,
                per_hour: try_load(&lookup, "RATE_LIMIT_PER_HOUR", limits.per_hour)?,
            },
        })
    }
}

fn try_load<T, D>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: D) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
    D: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid {key} value {raw:?}: {e}")))
}
