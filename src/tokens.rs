// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite - Token Ledger

use serde::{Deserialize, Serialize};

/// Bronze-equivalent value of one silver token.
const SILVER_VALUE: u32 = 10;
/// Bronze-equivalent value of one gold token.
const GOLD_VALUE: u32 = 100;

/// Fixed-denomination company treasury.
///
/// Values are always stored in canonical form: `bronze` and `silver` stay
/// in `[0, 9]` after every mutation, gold is unbounded. All amounts passed
/// to [`add`](Self::add) and [`subtract`](Self::subtract) are expressed in
/// bronze equivalent (`1 silver = 10 bronze`, `1 gold = 100 bronze`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub bronze: u32,
    pub silver: u32,
    pub gold: u32,
}

impl Tokens {
    /// Treasury holding `bronze` bronze tokens only.
    pub fn from_bronze(bronze: u32) -> Self {
        let mut tokens = Tokens::default();
        tokens.add(bronze);
        tokens
    }

    /// Total value in bronze equivalent.
    pub fn total(&self) -> u32 {
        self.bronze + self.silver * SILVER_VALUE + self.gold * GOLD_VALUE
    }

    /// Add `amount` (bronze equivalent) and re-collapse to canonical form.
    pub fn add(&mut self, amount: u32) {
        self.set_from_total(self.total() + amount);
    }

    /// Remove `amount` (bronze equivalent).
    ///
    /// Returns `false` and leaves every denomination untouched when the
    /// treasury cannot cover the amount.
    pub fn subtract(&mut self, amount: u32) -> bool {
        let total = self.total();
        if total < amount {
            return false;
        }
        self.set_from_total(total - amount);
        true
    }

    /// Whether the treasury covers `amount` (bronze equivalent).
    pub fn can_afford(&self, amount: u32) -> bool {
        self.total() >= amount
    }

    /// Rewrite the three denominations as the unique canonical
    /// decomposition of `total`.
    fn set_from_total(&mut self, total: u32) {
        self.gold = total / GOLD_VALUE;
        let rest = total % GOLD_VALUE;
        self.silver = rest / SILVER_VALUE;
        self.bronze = rest % SILVER_VALUE;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_normalizes() {
        let mut tokens = Tokens::from_bronze(10);
        assert_eq!((tokens.bronze, tokens.silver, tokens.gold), (0, 1, 0));
        tokens.add(95);
        assert_eq!((tokens.bronze, tokens.silver, tokens.gold), (5, 0, 1));
        assert_eq!(tokens.total(), 105);
    }

    #[test]
    fn test_subtract_success_normalizes() {
        let mut tokens = Tokens::from_bronze(105);
        assert!(tokens.subtract(6));
        assert_eq!(tokens.total(), 99);
        assert_eq!((tokens.bronze, tokens.silver, tokens.gold), (9, 9, 0));
    }

    #[test]
    fn test_subtract_insufficient_leaves_state() {
        let mut tokens = Tokens::from_bronze(37);
        let before = tokens;
        assert!(!tokens.subtract(38));
        assert_eq!(tokens, before, "failed subtract must not mutate");
    }

    #[test]
    fn test_can_afford_is_pure() {
        let tokens = Tokens::from_bronze(20);
        assert!(tokens.can_afford(20));
        assert!(!tokens.can_afford(21));
        assert_eq!(tokens.total(), 20);
    }

    proptest! {
        #[test]
        fn canonical_form_after_every_call(
            ops in proptest::collection::vec((any::<bool>(), 0u32..400), 0..50)
        ) {
            let mut tokens = Tokens::from_bronze(10);
            for (is_add, amount) in ops {
                if is_add {
                    tokens.add(amount);
                } else {
                    let _ = tokens.subtract(amount);
                }
                prop_assert!(tokens.bronze <= 9, "bronze out of canonical range");
                prop_assert!(tokens.silver <= 9, "silver out of canonical range");
                prop_assert_eq!(
                    tokens.total(),
                    tokens.bronze + 10 * tokens.silver + 100 * tokens.gold
                );
            }
        }

        #[test]
        fn oversized_subtract_never_mutates(start in 0u32..500, over in 1u32..500) {
            let mut tokens = Tokens::from_bronze(start);
            let before = tokens;
            prop_assert!(!tokens.subtract(start + over));
            prop_assert_eq!(tokens, before);
        }
    }
}
