mod comment;
mod filters;
mod recipe;
mod user;
mod vote;

pub use comment::{Comment, NewComment};
pub use filters::RecipeFilters;
pub use recipe::{Difficulty, Ratings, Recipe, RecipeDraft, RecipeId, RecipeWithVote, Tally};
pub use user::{User, UserId, UserProfile, VotedRecipe};
pub use vote::{Direction, TallyDelta, Vote, VoteResult};
