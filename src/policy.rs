// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite - Decision Policies

use serde::{Deserialize, Serialize};

use crate::draws::DrawSource;
use crate::game::Game;
use crate::player::{Action, Player, MAX_RD_INVESTMENT, MAX_REPUTATION};

/// Per-player strategy proposing phase-1 actions.
///
/// Implementations see a read-only view of the player and game and return
/// an ordered list of action identifiers; every effect flows through the
/// phase-1 application step. Proposing an unaffordable or unknown action
/// is harmless (the state machine ignores it), so policies only keep a
/// local affordability estimate while building the list.
pub trait DecisionPolicy: Send + Sync {
    fn decide(&self, player: &Player, game: &Game, draws: &mut dyn DrawSource) -> Vec<String>;
}

// ─── Policy selection ────────────────────────────────────────────────────────

/// Closed set of shipped policies, selected by identifier in the batch
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Balanced,
    Aggressive,
    Conservative,
    Reputation,
    Passive,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        Self::Balanced,
        Self::Aggressive,
        Self::Conservative,
        Self::Reputation,
        Self::Passive,
    ];

    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "balanced" => Some(Self::Balanced),
            "aggressive" => Some(Self::Aggressive),
            "conservative" => Some(Self::Conservative),
            "reputation" => Some(Self::Reputation),
            "passive" => Some(Self::Passive),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Conservative => "conservative",
            Self::Reputation => "reputation",
            Self::Passive => "passive",
        }
    }

    pub fn build(&self) -> Box<dyn DecisionPolicy> {
        match self {
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::Conservative => Box::new(ConservativePolicy),
            Self::Reputation => Box::new(ReputationPolicy),
            Self::Passive => Box::new(PassivePolicy),
        }
    }
}

// ─── Implementations ─────────────────────────────────────────────────────────

/// Steady growth: R&D, measured hiring, machines on solid capital.
pub struct BalancedPolicy;

impl DecisionPolicy for BalancedPolicy {
    fn decide(&self, player: &Player, _game: &Game, draws: &mut dyn DrawSource) -> Vec<String> {
        let mut actions = Vec::new();
        let mut tokens = player.tokens.total();

        if tokens >= 5 && player.rd_investment < MAX_RD_INVESTMENT {
            actions.push(Action::InvestRd.id().to_string());
            tokens -= 5;
        }
        if tokens >= 2 && player.reputation >= 2 {
            actions.push(Action::HireEmployee.id().to_string());
            tokens -= 2;
        }
        if tokens >= 25 && player.employees >= 2 {
            actions.push(Action::BuyMachine.id().to_string());
            tokens -= 20;
        }
        if tokens >= 5 && draws.chance(0.3) {
            actions.push(Action::InvestMarketing.id().to_string());
        }
        actions
    }
}

/// Rapid expansion: machines first, then headcount, marketing with the rest.
pub struct AggressivePolicy;

impl DecisionPolicy for AggressivePolicy {
    fn decide(&self, player: &Player, _game: &Game, _draws: &mut dyn DrawSource) -> Vec<String> {
        let mut actions = Vec::new();
        let mut tokens = player.tokens.total();

        while tokens >= 25 && player.machines < 5 {
            actions.push(Action::BuyMachine.id().to_string());
            tokens -= 20;
        }
        while tokens >= 4 && actions.len() < 3 {
            actions.push(Action::HireEmployee.id().to_string());
            tokens -= 2;
        }
        if tokens >= 3 {
            actions.push(Action::InvestMarketing.id().to_string());
        }
        actions
    }
}

/// Sustainability first: keeps a cost buffer, downsizes under pressure.
pub struct ConservativePolicy;

impl DecisionPolicy for ConservativePolicy {
    fn decide(&self, player: &Player, _game: &Game, draws: &mut dyn DrawSource) -> Vec<String> {
        let mut actions = Vec::new();
        let tokens = player.tokens.total();
        let buffer_needed = 10 + player.costs() * 2;

        if tokens < buffer_needed {
            if player.machines > 0 && draws.chance(0.3) {
                actions.push(Action::SellMachine.id().to_string());
            }
            return actions;
        }
        let mut available = tokens - buffer_needed;

        if available >= 5 && player.rd_investment < MAX_RD_INVESTMENT {
            actions.push(Action::InvestRd.id().to_string());
            available -= 5;
        }
        if available >= 5 {
            actions.push(Action::HireEmployee.id().to_string());
            available -= 2;
        }
        if available >= player.employees && player.employees > 0 {
            actions.push(Action::IncreaseSalaries.id().to_string());
        }
        actions
    }
}

/// Brand building: R&D and temporary-reputation boosts above all else.
pub struct ReputationPolicy;

impl DecisionPolicy for ReputationPolicy {
    fn decide(&self, player: &Player, _game: &Game, _draws: &mut dyn DrawSource) -> Vec<String> {
        let mut actions = Vec::new();
        let mut tokens = player.tokens.total();

        if tokens >= 5 && player.rd_investment < MAX_RD_INVESTMENT {
            actions.push(Action::InvestRd.id().to_string());
            tokens -= 5;
        }
        if tokens >= 4 && player.reputation < MAX_REPUTATION {
            actions.push(Action::HireEmployee.id().to_string());
            tokens -= 2;
        }
        if tokens >= player.employees + 3 {
            actions.push(Action::IncreaseSalaries.id().to_string());
            tokens -= player.employees;
        }
        if tokens >= 5 {
            actions.push(Action::InvestMarketing.id().to_string());
        }
        actions
    }
}

/// The "no preference" variant: never proposes anything.
pub struct PassivePolicy;

impl DecisionPolicy for PassivePolicy {
    fn decide(&self, _player: &Player, _game: &Game, _draws: &mut dyn DrawSource) -> Vec<String> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
