use crate::application::{PromotionEngine, RecipeStore};
use crate::config::Config;
use crate::domain::{User, UserProfile};
use crate::infrastructure::identity::UserDirectory;
use crate::infrastructure::security::{RateLimiter, RateLimits};
use crate::infrastructure::seed::SeedData;
use recipe_errors::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<RecipeStore>,
    pub users: Arc<UserDirectory>,
    pub rate_limiter: RateLimiter,
}

impl AppContext {
    pub fn new(store: RecipeStore, rate_limits: RateLimits) -> Self {
        Self {
            store: Arc::new(store),
            users: Arc::new(UserDirectory::new()),
            rate_limiter: RateLimiter::new(rate_limits),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let promotion = PromotionEngine::new(config.approval);

        let store = match &config.seed_path {
            Some(path) => {
                tracing::info!("Loading seed recipes from {}", path.display());
                SeedData::load(path)?.into_store(promotion)?
            }
            None => RecipeStore::new(promotion),
        };

        tracing::info!(
            "Approval policy: {} votes, {}% upvotes",
            config.approval.min_votes,
            config.approval.min_upvote_percent
        );
        Ok(Self::new(store, config.rate_limits))
    }

    pub fn profile(&self, user: User) -> UserProfile {
        UserProfile {
            voted_recipes: self.store.votes_by(&user.id),
            user,
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(RecipeStore::default(), RateLimits::default())
    }
}
