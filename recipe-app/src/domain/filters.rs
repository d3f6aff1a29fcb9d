use super::Difficulty;
use serde::{Deserialize, Serialize};

/// Optional narrowing of a recipe search. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilters {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_prep_time: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl RecipeFilters {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_max_prep_time(mut self, minutes: u32) -> Self {
        self.max_prep_time = Some(minutes);
        self
    }

    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }
}
