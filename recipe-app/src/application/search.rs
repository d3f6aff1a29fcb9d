use crate::domain::{Recipe, RecipeFilters};

/// Text query and filters, lowercased once up front.
pub struct SearchEngine {
    query: String,
    filters: RecipeFilters,
    ingredients: Vec<String>,
}

impl SearchEngine {
    pub fn new(query: &str, filters: &RecipeFilters) -> Self {
        Self {
            query: query.to_lowercase(),
            filters: filters.clone(),
            ingredients: filters.ingredients.iter().map(|i| i.to_lowercase()).collect(),
        }
    }

    /// Matching recipes in input order.
    pub fn search<I>(&self, recipes: I) -> Vec<Recipe>
    where
        I: IntoIterator<Item = Recipe>,
    {
        recipes
            .into_iter()
            .filter(|recipe| self.matches(recipe))
            .collect()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_query(recipe)
            && self.matches_category(recipe)
            && self.matches_difficulty(recipe)
            && self.matches_prep_time(recipe)
            && self.matches_ingredients(recipe)
    }

    fn matches_query(&self, recipe: &Recipe) -> bool {
        self.query.is_empty()
            || recipe.name.to_lowercase().contains(&self.query)
            || has_ingredient(recipe, &self.query)
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        match self.filters.category.as_deref() {
            None | Some("") => true,
            Some(category) => recipe.category == category,
        }
    }

    fn matches_difficulty(&self, recipe: &Recipe) -> bool {
        self.filters
            .difficulty
            .map_or(true, |difficulty| recipe.difficulty == difficulty)
    }

    fn matches_prep_time(&self, recipe: &Recipe) -> bool {
        match self.filters.max_prep_time {
            None | Some(0) => true,
            Some(max) => recipe.prep_time <= max,
        }
    }

    // Every filter ingredient must appear in at least one recipe ingredient.
    fn matches_ingredients(&self, recipe: &Recipe) -> bool {
        self.ingredients
            .iter()
            .all(|wanted| has_ingredient(recipe, wanted))
    }
}

fn has_ingredient(recipe: &Recipe, needle: &str) -> bool {
    recipe
        .ingredients
        .iter()
        .any(|ingredient| ingredient.to_lowercase().contains(needle))
}
