use crate::domain::Tally;

const DEFAULT_MIN_VOTES: u32 = 5;
const DEFAULT_MIN_UPVOTE_PERCENT: u32 = 70;

/// Thresholds a pending recipe must reach to be published. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalPolicy {
    pub min_votes: u32,
    pub min_upvote_percent: u32,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            min_votes: DEFAULT_MIN_VOTES,
            min_upvote_percent: DEFAULT_MIN_UPVOTE_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromotionEngine {
    policy: ApprovalPolicy,
}

impl PromotionEngine {
    pub fn new(policy: ApprovalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ApprovalPolicy {
        self.policy
    }

    pub fn evaluate(&self, tally: Tally) -> bool {
        let upvotes = u64::from(tally.upvotes);
        let total = upvotes + u64::from(tally.downvotes);

        total >= u64::from(self.policy.min_votes)
            && upvotes * 100 >= total * u64::from(self.policy.min_upvote_percent)
    }
}
