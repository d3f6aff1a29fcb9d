use super::{Comment, Direction, TallyDelta};
use chrono::NaiveDate;
use recipe_errors::AppError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id handed out to the `seq`-th submission.
    pub fn pending(seq: u64) -> Self {
        Self(format!("p{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Hard" => Ok(Self::Hard),
            other => Err(AppError::Validation(format!("unknown difficulty {other:?}"))),
        }
    }
}

/// Approval votes on a pending recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl Tally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn total(&self) -> u32 {
        self.upvotes + self.downvotes
    }

    pub fn count(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Up => self.upvotes,
            Direction::Down => self.downvotes,
        }
    }

    /// Counts saturate at zero so a malformed delta can never drive them negative.
    pub fn apply(self, delta: TallyDelta) -> Self {
        Self {
            upvotes: self.upvotes.saturating_add_signed(delta.upvotes),
            downvotes: self.downvotes.saturating_add_signed(delta.downvotes),
        }
    }

    /// Share of upvotes for display, one decimal place; 0 with no votes.
    pub fn approval_percentage(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => round_one_decimal(f64::from(self.upvotes) * 100.0 / f64::from(total)),
        }
    }
}

/// Running mean of all star ratings. `average` keeps full precision and is
/// only rounded when serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(serialize_with = "serialize_rounded")]
    pub average: f64,
    pub count: u32,
}

impl Ratings {
    pub fn display_average(&self) -> f64 {
        round_one_decimal(self.average)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_one_decimal(*value))
}

/// Descriptive fields supplied by a contributor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub submitted_by: String,
}

impl RecipeDraft {
    /// Rejects drafts missing a name, category, ingredient or instruction step.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("recipe name is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::Validation("category is required".to_string()));
        }
        if self.ingredients.is_empty() {
            return Err(AppError::Validation("at least one ingredient is required".to_string()));
        }
        if self.ingredients.iter().any(|i| i.trim().is_empty()) {
            return Err(AppError::Validation("ingredients cannot be blank".to_string()));
        }
        if self.instructions.is_empty() {
            return Err(AppError::Validation("at least one instruction step is required".to_string()));
        }
        if self.instructions.iter().any(|i| i.trim().is_empty()) {
            return Err(AppError::Validation("instruction steps cannot be blank".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub category: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub image_url: String,
    pub submitted_by: String,
    pub date_submitted: NaiveDate,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub approval_votes: Tally,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Recipe {
    /// A freshly submitted recipe: pending, with every aggregate zeroed.
    pub fn from_draft(id: RecipeId, draft: RecipeDraft, date_submitted: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            servings: draft.servings,
            difficulty: draft.difficulty,
            image_url: draft.image_url,
            submitted_by: draft.submitted_by,
            date_submitted,
            approved: false,
            approval_votes: Tally::default(),
            ratings: Ratings::default(),
            comments: Vec::new(),
        }
    }
}

/// Pending recipe plus the requesting user's own vote, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWithVote {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub approval_percentage: f64,
    pub user_vote: Option<Direction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Groundnut Soup".to_string(),
            category: "Soup".to_string(),
            ingredients: vec!["1 cup groundnut paste".to_string()],
            instructions: vec!["Simmer everything.".to_string()],
            difficulty: Difficulty::Easy,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));

        let mut d = draft();
        d.category.clear();
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));

        let mut d = draft();
        d.ingredients.clear();
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));

        let mut d = draft();
        d.instructions = vec!["".to_string()];
        assert!(matches!(d.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_from_draft_zeroes_aggregates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let recipe = Recipe::from_draft(RecipeId::pending(1), draft(), date);
        assert_eq!(recipe.id.as_str(), "p1");
        assert!(!recipe.approved);
        assert_eq!(recipe.approval_votes, Tally::default());
        assert_eq!(recipe.ratings.count, 0);
        assert_eq!(recipe.ratings.average, 0.0);
        assert!(recipe.comments.is_empty());
    }

    #[test]
    fn test_tally_apply_never_goes_negative() {
        let tally = Tally::new(0, 1).apply(TallyDelta::switch(Direction::Up, Direction::Down));
        assert_eq!(tally, Tally::new(0, 2));
    }

    #[test]
    fn test_approval_percentage() {
        assert_eq!(Tally::default().approval_percentage(), 0.0);
        assert_eq!(Tally::new(34, 15).approval_percentage(), 69.4);
        assert_eq!(Tally::new(35, 15).approval_percentage(), 70.0);
    }

    #[test]
    fn test_ratings_serialize_rounded() {
        let ratings = Ratings {
            average: 13.0 / 3.0,
            count: 3,
        };
        let json = serde_json::to_value(ratings).unwrap();
        assert_eq!(json["average"], 4.3);
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn test_recipe_json_uses_camel_case() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let recipe = Recipe::from_draft(RecipeId::pending(7), draft(), date);
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["id"], "p7");
        assert_eq!(json["approvalVotes"]["upvotes"], 0);
        assert_eq!(json["dateSubmitted"], "2024-03-01");
        assert_eq!(json["difficulty"], "Easy");
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("hard".parse::<Difficulty>().is_err());
    }
}
