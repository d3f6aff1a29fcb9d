use super::{RecipeId, Tally, UserId};
use recipe_errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(AppError::InvalidVote(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub direction: Direction,
}

impl Vote {
    pub fn new(user_id: UserId, recipe_id: RecipeId, direction: Direction) -> Self {
        Self {
            user_id,
            recipe_id,
            direction,
        }
    }
}

/// Change to apply to a recipe's tally after a vote was recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyDelta {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl TallyDelta {
    pub const ZERO: Self = Self {
        upvotes: 0,
        downvotes: 0,
    };

    pub fn cast(direction: Direction) -> Self {
        Self::ZERO.with(direction, 1)
    }

    pub fn switch(from: Direction, to: Direction) -> Self {
        if from == to {
            return Self::ZERO;
        }
        Self::ZERO.with(from, -1).with(to, 1)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn with(mut self, direction: Direction, amount: i32) -> Self {
        match direction {
            Direction::Up => self.upvotes += amount,
            Direction::Down => self.downvotes += amount,
        }
        self
    }
}

/// Result of a vote on a pending recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    pub recipe_id: RecipeId,
    pub direction: Direction,
    pub approval_votes: Tally,
    pub promoted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(AppError::InvalidVote("sideways".to_string()))
        );
    }

    #[test]
    fn test_switch_moves_one_vote() {
        let delta = TallyDelta::switch(Direction::Up, Direction::Down);
        assert_eq!(delta, TallyDelta { upvotes: -1, downvotes: 1 });
        assert!(TallyDelta::switch(Direction::Down, Direction::Down).is_zero());
    }
}
