use super::{PromotionEngine, RatingAggregator, SearchEngine, VoteLedger};
use crate::domain::{
    Comment, Direction, NewComment, Ratings, Recipe, RecipeDraft, RecipeFilters, RecipeId,
    RecipeWithVote, UserId, Vote, VoteResult, VotedRecipe,
};
use recipe_errors::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Entry = Arc<Mutex<Recipe>>;

/// Insertion-ordered set of recipes.
#[derive(Default)]
struct Pool {
    order: Vec<RecipeId>,
    entries: HashMap<RecipeId, Entry>,
}

impl Pool {
    fn get(&self, id: &RecipeId) -> Option<Entry> {
        self.entries.get(id).cloned()
    }

    fn contains(&self, id: &RecipeId) -> bool {
        self.entries.contains_key(id)
    }

    fn insert(&mut self, id: RecipeId, entry: Entry) {
        if self.entries.insert(id.clone(), entry).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: &RecipeId) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(entry)
    }

    fn snapshot(&self) -> Vec<Entry> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect()
    }
}

#[derive(Default)]
struct Pools {
    pending: Pool,
    approved: Pool,
}

impl Pools {
    fn contains(&self, id: &RecipeId) -> bool {
        self.pending.contains(id) || self.approved.contains(id)
    }
}

/// Owner of the pending and approved pools.
///
/// Pool membership sits behind one `RwLock`; each recipe has its own
/// `Mutex` that serialises every mutation of that recipe. A mutation takes
/// the recipe lock first and only then, when it must move the recipe, the
/// pool write lock. Readers never hold the pool lock while waiting on a
/// recipe, so the two can't deadlock.
pub struct RecipeStore {
    pools: RwLock<Pools>,
    ledger: VoteLedger,
    promotion: PromotionEngine,
    next_seq: AtomicU64,
}

impl RecipeStore {
    pub fn new(promotion: PromotionEngine) -> Self {
        Self {
            pools: RwLock::new(Pools::default()),
            ledger: VoteLedger::new(),
            promotion,
            next_seq: AtomicU64::new(1),
        }
    }

    /// Builds a store around existing recipes.
    pub fn from_seed(
        approved: Vec<Recipe>,
        pending: Vec<Recipe>,
        promotion: PromotionEngine,
    ) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let mut pools = Pools::default();

        for (mut recipe, is_approved) in approved
            .into_iter()
            .map(|r| (r, true))
            .chain(pending.into_iter().map(|r| (r, false)))
        {
            if !seen.insert(recipe.id.clone()) {
                return Err(AppError::Validation(format!("duplicate recipe id {}", recipe.id)));
            }
            check_ratings(&recipe)?;
            recipe.approved = is_approved;

            let id = recipe.id.clone();
            let entry = Arc::new(Mutex::new(recipe));
            if is_approved {
                pools.approved.insert(id, entry);
            } else {
                pools.pending.insert(id, entry);
            }
        }

        let next_seq = pools.pending.order.len() as u64 + 1;
        tracing::info!(
            "Seeded {} approved and {} pending recipes",
            pools.approved.order.len(),
            pools.pending.order.len()
        );

        Ok(Self {
            pools: RwLock::new(pools),
            ledger: VoteLedger::new(),
            promotion,
            next_seq: AtomicU64::new(next_seq),
        })
    }

    pub fn submit(&self, draft: RecipeDraft) -> Result<RecipeId, AppError> {
        draft.validate()?;

        let mut pools = self.write_pools();
        let id = loop {
            let candidate = RecipeId::pending(self.next_seq.fetch_add(1, Ordering::Relaxed));
            if !pools.contains(&candidate) {
                break candidate;
            }
        };

        let recipe = Recipe::from_draft(id.clone(), draft, chrono::Utc::now().date_naive());
        tracing::info!("Recipe submitted: {} ({})", id, recipe.name);
        pools.pending.insert(id.clone(), Arc::new(Mutex::new(recipe)));

        Ok(id)
    }

    /// Records a vote and, if the updated tally clears the approval policy,
    /// publishes the recipe before releasing it.
    pub fn vote(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
        direction: Direction,
    ) -> Result<VoteResult, AppError> {
        let entry = self
            .read_pools()
            .pending
            .get(recipe_id)
            .ok_or_else(|| not_pending(recipe_id))?;

        let mut recipe = lock(&entry);
        // Promoted by another voter between lookup and lock.
        if recipe.approved {
            return Err(not_pending(recipe_id));
        }

        let delta = self
            .ledger
            .cast(&Vote::new(user_id.clone(), recipe_id.clone(), direction));
        let tally = recipe.approval_votes.apply(delta);
        recipe.approval_votes = tally;

        let promoted = self.promotion.evaluate(tally);
        if promoted {
            recipe.approved = true;
            let mut pools = self.write_pools();
            pools.pending.remove(recipe_id);
            pools.approved.insert(recipe_id.clone(), Arc::clone(&entry));
            drop(pools);
            self.ledger.retire(recipe_id);
            tracing::info!(
                "Recipe {} approved with {} up / {} down",
                recipe_id,
                tally.upvotes,
                tally.downvotes
            );
        } else {
            tracing::debug!(
                "Vote by {} on {}: {} up / {} down",
                user_id,
                recipe_id,
                tally.upvotes,
                tally.downvotes
            );
        }

        Ok(VoteResult {
            recipe_id: recipe_id.clone(),
            direction,
            approval_votes: tally,
            promoted,
        })
    }

    pub fn comment(&self, recipe_id: &RecipeId, comment: NewComment) -> Result<Comment, AppError> {
        let entry = self.approved_entry(recipe_id)?;
        if comment.text.trim().is_empty() {
            return Err(AppError::Validation("comment text is required".to_string()));
        }

        let comment = Comment::new(comment);
        lock(&entry).comments.push(comment.clone());
        tracing::debug!("Comment {} added to {}", comment.id, recipe_id);

        Ok(comment)
    }

    pub fn rate(&self, recipe_id: &RecipeId, rating: f64) -> Result<Ratings, AppError> {
        let entry = self.approved_entry(recipe_id)?;
        let mut recipe = lock(&entry);
        let ratings = RatingAggregator::rate(recipe.ratings, rating)?;
        recipe.ratings = ratings;
        tracing::debug!("Recipe {} rated {}, {} ratings", recipe_id, rating, ratings.count);

        Ok(ratings)
    }

    pub fn get_by_id(&self, id: &RecipeId) -> Option<Recipe> {
        let entry = self.read_pools().approved.get(id)?;
        let recipe = lock(&entry).clone();
        Some(recipe)
    }

    pub fn get_pending_by_id(&self, id: &RecipeId) -> Option<Recipe> {
        let entry = self.read_pools().pending.get(id)?;
        let recipe = lock(&entry);
        (!recipe.approved).then(|| recipe.clone())
    }

    /// Pending recipe together with the given user's vote on it.
    pub fn get_pending_with_vote(
        &self,
        id: &RecipeId,
        user_id: Option<&UserId>,
    ) -> Option<RecipeWithVote> {
        let recipe = self.get_pending_by_id(id)?;
        Some(RecipeWithVote {
            approval_percentage: recipe.approval_votes.approval_percentage(),
            user_vote: user_id.and_then(|user| self.ledger.has_voted(user, id)),
            recipe,
        })
    }

    pub fn list_approved(&self) -> Vec<Recipe> {
        let entries = self.read_pools().approved.snapshot();
        entries.iter().map(|entry| lock(entry).clone()).collect()
    }

    pub fn list_pending(&self) -> Vec<Recipe> {
        let entries = self.read_pools().pending.snapshot();
        entries
            .iter()
            .filter_map(|entry| {
                let recipe = lock(entry);
                (!recipe.approved).then(|| recipe.clone())
            })
            .collect()
    }

    pub fn search(&self, query: &str, filters: &RecipeFilters) -> Vec<Recipe> {
        let found = SearchEngine::new(query, filters).search(self.list_approved());
        tracing::debug!("Search {:?} matched {} recipes", query, found.len());
        found
    }

    /// Highest rated approved recipes. Ties keep approval order.
    pub fn top_rated(&self, limit: usize) -> Vec<Recipe> {
        let mut recipes = self.list_approved();
        recipes.sort_by(|a, b| b.ratings.average.total_cmp(&a.ratings.average));
        recipes.truncate(limit);
        recipes
    }

    /// Distinct categories of approved recipes, first seen first.
    pub fn categories(&self) -> Vec<String> {
        let entries = self.read_pools().approved.snapshot();
        let mut seen = HashSet::new();
        entries
            .iter()
            .map(|entry| lock(entry).category.clone())
            .filter(|category| seen.insert(category.clone()))
            .collect()
    }

    pub fn user_vote(&self, user_id: &UserId, recipe_id: &RecipeId) -> Option<Direction> {
        self.ledger.has_voted(user_id, recipe_id)
    }

    pub fn votes_by(&self, user_id: &UserId) -> Vec<VotedRecipe> {
        self.ledger.votes_by(user_id)
    }

    pub fn is_approved(&self, id: &RecipeId) -> bool {
        self.read_pools().approved.contains(id)
    }

    pub fn exists(&self, id: &RecipeId) -> bool {
        self.read_pools().contains(id)
    }

    fn approved_entry(&self, id: &RecipeId) -> Result<Entry, AppError> {
        self.read_pools()
            .approved
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("approved recipe {id}")))
    }

    fn read_pools(&self) -> RwLockReadGuard<'_, Pools> {
        self.pools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pools(&self) -> RwLockWriteGuard<'_, Pools> {
        self.pools.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new(PromotionEngine::default())
    }
}

// Mutations validate before writing, so a poisoned recipe is still consistent.
fn lock(entry: &Entry) -> MutexGuard<'_, Recipe> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_pending(id: &RecipeId) -> AppError {
    AppError::NotFound(format!("pending recipe {id}"))
}

fn check_ratings(recipe: &Recipe) -> Result<(), AppError> {
    let Ratings { average, count } = recipe.ratings;
    let in_range = (0.0..=5.0).contains(&average);
    let consistent = (average == 0.0) == (count == 0);
    if in_range && consistent {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "recipe {} has invalid ratings {average}/{count}",
            recipe.id
        )))
    }
}
