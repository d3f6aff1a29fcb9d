use crate::application::{PromotionEngine, RecipeStore};
use crate::domain::Recipe;
use recipe_errors::AppError;
use serde::Deserialize;
use std::path::Path;

/// Recipes to preload at start-up, split by pool.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub approved: Vec<Recipe>,
    #[serde(default)]
    pub pending: Vec<Recipe>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|e| AppError::Config(format!("malformed seed file: {e}")))
    }

    pub fn into_store(self, promotion: PromotionEngine) -> Result<RecipeStore, AppError> {
        RecipeStore::from_seed(self.approved, self.pending, promotion)
    }
}
