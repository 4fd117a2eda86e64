// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite - Player Model

use serde::{Deserialize, Serialize};

use crate::tokens::Tokens;

/// Reputation ceiling shared by every reputation-raising effect.
pub const MAX_REPUTATION: u32 = 5;
/// Lifetime cap on R&D investments per company.
pub const MAX_RD_INVESTMENT: u32 = 5;

// ─── Level ───────────────────────────────────────────────────────────────────

/// Company tier derived from total token value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Bronze,
    Silver,
    Gold,
}

impl Level {
    /// Revenue multiplier applied to each unit sold.
    pub fn coefficient(&self) -> u32 {
        match self {
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
        }
    }

    /// Flat structural tax charged every turn.
    pub fn tax(&self) -> u32 {
        match self {
            Self::Bronze => 0,
            Self::Silver => 1,
            Self::Gold => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// Phase-1 action vocabulary.
///
/// Policies submit actions as string identifiers; identifiers that do not
/// parse are dropped silently during phase 1 (tolerant-ignore, by contract
/// with the decision-policy interface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    HireEmployee,
    BuyMachine,
    FireEmployee,
    SellMachine,
    InvestRd,
    InvestMarketing,
    IncreaseSalaries,
}

impl Action {
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "hire_employee" => Some(Self::HireEmployee),
            "buy_machine" => Some(Self::BuyMachine),
            "fire_employee" => Some(Self::FireEmployee),
            "sell_machine" => Some(Self::SellMachine),
            "invest_rd" => Some(Self::InvestRd),
            "invest_marketing" => Some(Self::InvestMarketing),
            "increase_salaries" => Some(Self::IncreaseSalaries),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::HireEmployee => "hire_employee",
            Self::BuyMachine => "buy_machine",
            Self::FireEmployee => "fire_employee",
            Self::SellMachine => "sell_machine",
            Self::InvestRd => "invest_rd",
            Self::InvestMarketing => "invest_marketing",
            Self::IncreaseSalaries => "increase_salaries",
        }
    }
}

// ─── Player ──────────────────────────────────────────────────────────────────

/// One company's mutable economic state.
///
/// Mutation happens only through the action methods and the game's phase
/// transitions. A bankrupt player is frozen: phases skip it and only
/// [`reset_temp_bonuses`](Self::reset_temp_bonuses) still touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub is_ai: bool,
    pub tokens: Tokens,
    pub employees: u32,
    pub machines: u32,
    pub reputation: u32,
    pub temp_reputation: u32,
    pub production: u32,
    pub sales: u32,
    pub revenue: u32,
    pub bankrupt: bool,
    pub employees_active: bool,
    pub delocalisation: bool,
    pub temp_production: u32,
    pub rd_investment: u32,
}

impl Player {
    /// Fresh company at game start: 10 bronze, 1 employee, reputation 2.
    pub fn new(name: impl Into<String>, is_ai: bool) -> Self {
        Self {
            name: name.into(),
            is_ai,
            tokens: Tokens::from_bronze(10),
            employees: 1,
            machines: 0,
            reputation: 2,
            temp_reputation: 0,
            production: 0,
            sales: 0,
            revenue: 0,
            bankrupt: false,
            employees_active: true,
            delocalisation: false,
            temp_production: 0,
            rd_investment: 0,
        }
    }

    // ─── Derived values (pure, never cached) ────────────────────────────────

    pub fn level(&self) -> Level {
        let total = self.tokens.total();
        if total >= 100 {
            Level::Gold
        } else if total >= 10 {
            Level::Silver
        } else {
            Level::Bronze
        }
    }

    pub fn coefficient(&self) -> u32 {
        self.level().coefficient()
    }

    pub fn tax_level(&self) -> u32 {
        self.level().tax()
    }

    pub fn total_reputation(&self) -> u32 {
        self.reputation + self.temp_reputation
    }

    /// Operating costs for one turn: wages (halved under delocalisation),
    /// machine upkeep, and one fixed cost.
    pub fn costs(&self) -> u32 {
        let mut employee_cost = self.employees;
        if self.delocalisation {
            employee_cost /= 2;
        }
        employee_cost + self.machines + 1
    }

    /// Recompute and store this turn's production.
    pub fn compute_production(&mut self) -> u32 {
        let mut production = if self.employees_active { self.employees * 2 } else { 0 };
        production += self.machines * 10;
        production += self.temp_production;
        self.production = production;
        production
    }

    // ─── Actions (atomic: full effect or no mutation) ───────────────────────

    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::HireEmployee => self.hire_employee(),
            Action::BuyMachine => self.buy_machine(),
            Action::FireEmployee => self.fire_employee(),
            Action::SellMachine => self.sell_machine(),
            Action::InvestRd => self.invest_rd(),
            Action::InvestMarketing => self.invest_marketing(),
            Action::IncreaseSalaries => self.increase_salaries(),
        }
    }

    pub fn hire_employee(&mut self) -> bool {
        if self.tokens.subtract(2) {
            self.employees += 1;
            self.reputation = (self.reputation + 1).min(MAX_REPUTATION);
            return true;
        }
        false
    }

    pub fn buy_machine(&mut self) -> bool {
        if self.tokens.subtract(20) {
            self.machines += 1;
            self.reputation = self.reputation.saturating_sub(1);
            return true;
        }
        false
    }

    pub fn fire_employee(&mut self) -> bool {
        if self.employees > 0 {
            self.employees -= 1;
            self.reputation = self.reputation.saturating_sub(1);
            self.tokens.add(1);
            return true;
        }
        false
    }

    pub fn sell_machine(&mut self) -> bool {
        if self.machines > 0 {
            self.machines -= 1;
            self.tokens.add(10);
            return true;
        }
        false
    }

    pub fn invest_rd(&mut self) -> bool {
        // Cap check comes first: the 6th investment must charge nothing.
        if self.rd_investment >= MAX_RD_INVESTMENT {
            return false;
        }
        if self.tokens.subtract(5) {
            self.rd_investment += 1;
            self.reputation = (self.reputation + 1).min(MAX_REPUTATION);
            return true;
        }
        false
    }

    pub fn invest_marketing(&mut self) -> bool {
        if self.tokens.subtract(3) {
            self.temp_reputation += 1;
            return true;
        }
        false
    }

    pub fn increase_salaries(&mut self) -> bool {
        let cost = self.employees;
        if self.tokens.subtract(cost) {
            self.temp_reputation += 1;
            return true;
        }
        false
    }

    /// End-of-turn reset, invoked for every player, bankrupt included.
    pub fn reset_temp_bonuses(&mut self) {
        self.temp_reputation = 0;
        self.temp_production = 0;
        self.employees_active = true;
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
    fn test_seed_state() {
        let player = Player::new("IA 1", true);
        assert_eq!(player.tokens.total(), 10);
        assert_eq!(player.employees, 1);
        assert_eq!(player.reputation, 2);
        assert_eq!(player.level(), Level::Silver);
    }

    #[test]
    fn test_level_thresholds() {
        let mut player = Player::new("T", true);
        player.tokens = Tokens::from_bronze(9);
        assert_eq!(player.level(), Level::Bronze);
        player.tokens = Tokens::from_bronze(10);
        assert_eq!(player.level(), Level::Silver);
        player.tokens = Tokens::from_bronze(99);
        assert_eq!(player.level(), Level::Silver);
        player.tokens = Tokens::from_bronze(100);
        assert_eq!(player.level(), Level::Gold);
    }

    #[test]
    fn test_production_sources() {
        let mut player = Player::new("T", true);
        player.employees = 3;
        player.machines = 2;
        player.temp_production = 5;
        assert_eq!(player.compute_production(), 3 * 2 + 2 * 10 + 5);
        player.employees_active = false;
        assert_eq!(player.compute_production(), 2 * 10 + 5);
    }

    #[test]
    fn test_costs_with_delocalisation() {
        let mut player = Player::new("T", true);
        player.employees = 5;
        player.machines = 2;
        assert_eq!(player.costs(), 5 + 2 + 1);
        player.delocalisation = true;
        // Wages halve with integer floor.
        assert_eq!(player.costs(), 2 + 2 + 1);
    }

    #[test]
    fn test_hire_failure_charges_nothing() {
        let mut player = Player::new("T", true);
        player.tokens = Tokens::from_bronze(1);
        assert!(!player.hire_employee());
        assert_eq!(player.tokens.total(), 1);
        assert_eq!(player.employees, 1);
        assert_eq!(player.reputation, 2);
    }

    #[test]
    fn test_rd_cap_sixth_call_charges_nothing() {
        let mut player = Player::new("T", true);
        player.tokens.add(100);
        for _ in 0..5 {
            assert!(player.invest_rd());
        }
        let before = player.tokens.total();
        assert!(!player.invest_rd(), "6th R&D investment must fail");
        assert_eq!(player.tokens.total(), before, "6th R&D call must not charge");
        assert_eq!(player.rd_investment, 5);
    }

    #[test]
    fn test_fire_employee_refunds() {
        let mut player = Player::new("T", true);
        assert!(player.fire_employee());
        assert_eq!(player.employees, 0);
        assert_eq!(player.reputation, 1);
        assert_eq!(player.tokens.total(), 11);
        assert!(!player.fire_employee(), "no employees left to fire");
    }

    #[test]
    fn test_sell_machine_refunds() {
        let mut player = Player::new("T", true);
        assert!(!player.sell_machine());
        player.machines = 1;
        assert!(player.sell_machine());
        assert_eq!(player.machines, 0);
        assert_eq!(player.tokens.total(), 20);
    }

    #[test]
    fn test_increase_salaries_costs_headcount() {
        let mut player = Player::new("T", true);
        player.employees = 4;
        player.tokens = Tokens::from_bronze(4);
        assert!(player.increase_salaries());
        assert_eq!(player.tokens.total(), 0);
        assert_eq!(player.temp_reputation, 1);
    }

    #[test]
    fn test_action_parse_round_trip() {
        for id in [
            "hire_employee",
            "buy_machine",
            "fire_employee",
            "sell_machine",
            "invest_rd",
            "invest_marketing",
            "increase_salaries",
        ] {
            let action = Action::parse(id).expect("known identifier");
            assert_eq!(action.id(), id);
        }
        assert_eq!(Action::parse("dance"), None);
    }

    proptest! {
        #[test]
        fn reputation_and_rd_stay_clamped(
            seq in proptest::collection::vec(0u8..7, 0..80)
        ) {
            let mut player = Player::new("T", true);
            player.tokens.add(1000);
            for code in seq {
                let action = match code {
                    0 => Action::HireEmployee,
                    1 => Action::BuyMachine,
                    2 => Action::FireEmployee,
                    3 => Action::SellMachine,
                    4 => Action::InvestRd,
                    5 => Action::InvestMarketing,
                    _ => Action::IncreaseSalaries,
                };
                let _ = player.apply(action);
                prop_assert!(player.reputation <= MAX_REPUTATION);
                prop_assert!(player.rd_investment <= MAX_RD_INVESTMENT);
            }
        }
    }
}
