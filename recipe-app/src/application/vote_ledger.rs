use crate::domain::{Direction, RecipeId, TallyDelta, UserId, Vote, VotedRecipe};
use dashmap::DashMap;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// One vote per (user, recipe). Re-voting overwrites the earlier direction.
///
/// Only votes on pending recipes are live. When a recipe is promoted its
/// votes are retired into each voter's history, which profiles still read.
/// The ledger never touches a recipe; it hands back the tally change the
/// caller must apply.
#[derive(Default)]
pub struct VoteLedger {
    active: DashMap<RecipeId, BTreeMap<UserId, Direction>>,
    history: DashMap<UserId, BTreeMap<RecipeId, Direction>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(&self, vote: &Vote) -> TallyDelta {
        let mut voters = self.active.entry(vote.recipe_id.clone()).or_default();
        let delta = match voters.value_mut().entry(vote.user_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(vote.direction);
                TallyDelta::cast(vote.direction)
            }
            Entry::Occupied(mut slot) => {
                let previous = slot.insert(vote.direction);
                TallyDelta::switch(previous, vote.direction)
            }
        };
        delta
    }

    /// The user's live vote on a pending recipe.
    pub fn has_voted(&self, user_id: &UserId, recipe_id: &RecipeId) -> Option<Direction> {
        self.active
            .get(recipe_id)
            .and_then(|voters| voters.value().get(user_id).copied())
    }

    /// Moves a promoted recipe's votes out of the live ledger.
    pub fn retire(&self, recipe_id: &RecipeId) {
        let Some(voters) = self.active.get(recipe_id).map(|v| v.value().clone()) else {
            return;
        };
        // History first, so a concurrent reader sees the vote at least once.
        for (user_id, direction) in voters {
            self.history
                .entry(user_id)
                .or_default()
                .insert(recipe_id.clone(), direction);
        }
        self.active.remove(recipe_id);
    }

    /// Every vote the user has cast, live or retired, ordered by recipe id.
    pub fn votes_by(&self, user_id: &UserId) -> Vec<VotedRecipe> {
        let mut voted: BTreeMap<RecipeId, Direction> = self
            .history
            .get(user_id)
            .map(|past| past.value().clone())
            .unwrap_or_default();

        for entry in self.active.iter() {
            if let Some(direction) = entry.value().get(user_id) {
                voted.insert(entry.key().clone(), *direction);
            }
        }

        voted
            .into_iter()
            .map(|(recipe_id, vote)| VotedRecipe { recipe_id, vote })
            .collect()
    }

    pub fn voter_count(&self, recipe_id: &RecipeId) -> usize {
        self.active.get(recipe_id).map_or(0, |voters| voters.value().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(user: &str, direction: Direction) -> Vote {
        Vote::new(UserId::from(user), RecipeId::from("p1"), direction)
    }

    #[test]
    fn test_first_vote_counts_once() {
        let ledger = VoteLedger::new();
        assert_eq!(
            ledger.cast(&vote("u1", Direction::Up)),
            TallyDelta { upvotes: 1, downvotes: 0 }
        );
        assert_eq!(
            ledger.has_voted(&UserId::from("u1"), &RecipeId::from("p1")),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_changed_vote_moves_between_directions() {
        let ledger = VoteLedger::new();
        ledger.cast(&vote("u1", Direction::Up));
        assert_eq!(
            ledger.cast(&vote("u1", Direction::Down)),
            TallyDelta { upvotes: -1, downvotes: 1 }
        );
        assert_eq!(
            ledger.has_voted(&UserId::from("u1"), &RecipeId::from("p1")),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_repeated_vote_is_noop() {
        let ledger = VoteLedger::new();
        ledger.cast(&vote("u1", Direction::Down));
        assert!(ledger.cast(&vote("u1", Direction::Down)).is_zero());
        assert_eq!(ledger.voter_count(&RecipeId::from("p1")), 1);
    }

    #[test]
    fn test_votes_by_user() {
        let ledger = VoteLedger::new();
        let user = UserId::from("u1");
        ledger.cast(&Vote::new(user.clone(), RecipeId::from("p2"), Direction::Down));
        ledger.cast(&Vote::new(user.clone(), RecipeId::from("p1"), Direction::Up));
        ledger.cast(&Vote::new(UserId::from("u2"), RecipeId::from("p1"), Direction::Up));

        let voted = ledger.votes_by(&user);
        assert_eq!(voted.len(), 2);
        assert_eq!(voted[0].recipe_id, RecipeId::from("p1"));
        assert_eq!(voted[1].vote, Direction::Down);
        assert!(ledger.has_voted(&UserId::from("u3"), &RecipeId::from("p1")).is_none());
    }

    #[test]
    fn test_retired_votes_stay_in_history() {
        let ledger = VoteLedger::new();
        let user = UserId::from("u1");
        ledger.cast(&vote("u1", Direction::Up));
        ledger.cast(&vote("u2", Direction::Down));
        ledger.cast(&Vote::new(user.clone(), RecipeId::from("p2"), Direction::Down));

        ledger.retire(&RecipeId::from("p1"));

        assert_eq!(ledger.voter_count(&RecipeId::from("p1")), 0);
        assert!(ledger.has_voted(&user, &RecipeId::from("p1")).is_none());
        assert_eq!(ledger.voter_count(&RecipeId::from("p2")), 1);

        let voted = ledger.votes_by(&user);
        assert_eq!(voted.len(), 2);
        assert_eq!(voted[0], VotedRecipe { recipe_id: RecipeId::from("p1"), vote: Direction::Up });
        assert_eq!(voted[1].vote, Direction::Down);
        assert_eq!(ledger.votes_by(&UserId::from("u2")).len(), 1);
    }
}
