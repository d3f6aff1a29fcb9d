mod promotion;
mod rating;
mod recipe_store;
mod search;
mod vote_ledger;

pub use promotion::{ApprovalPolicy, PromotionEngine};
pub use rating::{RatingAggregator, MAX_RATING, MIN_RATING};
pub use recipe_store::RecipeStore;
pub use search::SearchEngine;
pub use vote_ledger::VoteLedger;
