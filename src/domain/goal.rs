use serde::{Deserialize, Serialize};

use super::Amount;

/// A savings target. Like budgets, goals are index-addressed within an
/// account and mutated in place, with `current <= target` guaranteed by the
/// service gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub name: String,
    pub current: Amount,
    pub target: Amount,
}

impl SavingsGoal {
    pub fn new(name: String, current: Amount, target: Amount) -> Self {
        Self {
            name,
            current,
            target,
        }
    }

    pub fn remaining(&self) -> Amount {
        self.target - self.current
    }

    /// Progress toward the target as a truncated percentage. A zero-target
    /// goal reports 100 (there is nothing left to save). Widened to i128 so
    /// large amounts cannot overflow the intermediate product.
    pub fn percent_complete(&self) -> Amount {
        if self.target == 0 {
            100
        } else {
            (self.current as i128 * 100 / self.target as i128) as Amount
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let goal = SavingsGoal::new("Vacation".into(), 1000, 5000);
        assert_eq!(goal.remaining(), 4000);
        assert_eq!(goal.percent_complete(), 20);
    }

    #[test]
    fn test_zero_target_is_complete() {
        let goal = SavingsGoal::new("Done".into(), 0, 0);
        assert_eq!(goal.percent_complete(), 100);
    }
}
