// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite - Game State Machine

use serde::{Deserialize, Serialize};

use crate::draws::{Bonus, Choice, DrawSource, GameEvent, Malus};
use crate::player::{Action, Player, MAX_REPUTATION};

/// One match's shared state and the four-phase turn transition logic.
///
/// The game owns its roster exclusively; nothing else adds or removes
/// players. A turn runs phases 1-4 in order, resets transient bonuses,
/// then checks victory. Once a winner is set the game is over for good
/// and further [`play_turn`](Self::play_turn) calls do nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    players: Vec<Player>,
    turn: u32,
    phase: u8,
    market_size: u32,
    market_penalty: f64,
    game_over: bool,
    winner: Option<usize>,
}

impl Game {
    /// Fresh match with `player_count` automated companies named
    /// `IA 1..IA n`, each in seed state.
    pub fn new(player_count: usize) -> Self {
        let players = (0..player_count)
            .map(|i| Player::new(format!("IA {}", i + 1), true))
            .collect();
        Self {
            players,
            turn: 0,
            phase: 0,
            market_size: 0,
            market_penalty: 1.0,
            game_over: false,
            winner: None,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Scenario/test hook for direct state setup, mirroring the roster's
    /// exclusive ownership: callers may mutate a player but never add or
    /// remove one.
    pub fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn market_size(&self) -> u32 {
        self.market_size
    }

    pub fn market_penalty(&self) -> f64 {
        self.market_penalty
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Winning player's roster index, once set.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.bankrupt).count()
    }

    // ─── Turn driver ────────────────────────────────────────────────────────

    /// Execute one full turn: phases 1-4, transient reset, victory check.
    ///
    /// `action_ids[i]` is player i's submitted action list for phase 1;
    /// missing or surplus entries are tolerated. Returns `false` once the
    /// game is over (including a turn that just produced the winner).
    pub fn play_turn(&mut self, action_ids: &[Vec<String>], draws: &mut dyn DrawSource) -> bool {
        if self.game_over {
            return false;
        }
        self.turn += 1;
        self.market_penalty = 1.0;

        self.phase = 1;
        for i in 0..self.players.len() {
            if self.players[i].bankrupt {
                continue;
            }
            let ids = action_ids.get(i).map(Vec::as_slice).unwrap_or(&[]);
            self.play_phase_1(i, ids);
        }

        self.phase = 2;
        self.play_phase_2(draws);

        self.phase = 3;
        self.play_phase_3();

        self.phase = 4;
        self.play_phase_4(draws);

        for player in &mut self.players {
            player.reset_temp_bonuses();
        }

        if let Some(winner) = self.check_victory() {
            self.winner = Some(winner);
            self.game_over = true;
            log::debug!(
                "turn {}: {} wins",
                self.turn,
                self.players[winner].name
            );
            return false;
        }
        true
    }

    // ─── Phase 1: production & expenses ─────────────────────────────────────

    /// Apply one player's action list in order, then charge running costs.
    ///
    /// Identifiers that don't parse are dropped without comment, and a
    /// failed action never aborts the rest of the list. Failing to cover
    /// costs bankrupts the player for the remainder of the match.
    fn play_phase_1(&mut self, index: usize, action_ids: &[String]) {
        let player = &mut self.players[index];
        for id in action_ids {
            if let Some(action) = Action::parse(id) {
                let _ = player.apply(action);
            }
        }
        let costs = player.costs();
        if !player.tokens.subtract(costs) {
            player.bankrupt = true;
            log::debug!("turn {}: {} cannot cover costs, bankrupt", self.turn, player.name);
        }
    }

    // ─── Phase 2: market ────────────────────────────────────────────────────

    fn play_phase_2(&mut self, draws: &mut dyn DrawSource) {
        if self.active_count() == 0 {
            self.market_size = 0;
            return;
        }
        self.market_size = self.compute_market_size(draws.dice_roll());

        for player in self.players.iter_mut().filter(|p| !p.bankrupt) {
            player.compute_production();
        }
        self.distribute_market();
    }

    /// `floor(dice · active_count · penalty)` plus every active player's
    /// level coefficient.
    fn compute_market_size(&self, dice: u32) -> u32 {
        let active = self.active_count() as u32;
        let base = ((dice * active) as f64 * self.market_penalty).floor() as u32;
        let coefficients: u32 = self
            .players
            .iter()
            .filter(|p| !p.bankrupt)
            .map(Player::coefficient)
            .sum();
        base + coefficients
    }

    /// Split the market across active players proportionally to total
    /// reputation, cap each share at own production, credit revenue.
    fn distribute_market(&mut self) {
        let active = self.active_count();
        let reputation_sum: u32 = self
            .players
            .iter()
            .filter(|p| !p.bankrupt)
            .map(Player::total_reputation)
            .sum();

        let market_size = self.market_size;
        for player in self.players.iter_mut().filter(|p| !p.bankrupt) {
            let ratio = if reputation_sum == 0 {
                1.0 / active as f64
            } else {
                player.total_reputation() as f64 / reputation_sum as f64
            };
            let share = (market_size as f64 * ratio).floor() as u32;
            player.sales = share.min(player.production);
            player.revenue = player.sales * player.coefficient();
            player.tokens.add(player.revenue);
        }
    }

    // ─── Phase 3: taxes ─────────────────────────────────────────────────────

    /// 20% revenue tax (truncating), per-employee and per-machine levies,
    /// plus the level's structural tax. An uncovered bill is bankruptcy.
    fn play_phase_3(&mut self) {
        for player in self.players.iter_mut().filter(|p| !p.bankrupt) {
            let total_tax =
                player.revenue / 5 + player.employees + player.machines * 2 + player.tax_level();
            if !player.tokens.subtract(total_tax) {
                player.bankrupt = true;
                log::debug!("turn {}: {} cannot pay taxes, bankrupt", self.turn, player.name);
            }
        }
    }

    // ─── Phase 4: events ────────────────────────────────────────────────────

    fn play_phase_4(&mut self, draws: &mut dyn DrawSource) {
        for i in 0..self.players.len() {
            if self.players[i].bankrupt {
                continue;
            }
            let event = draws.draw_event();
            self.apply_event(i, event);
        }
    }

    /// Apply one drawn event immediately, in encounter order.
    pub fn apply_event(&mut self, index: usize, event: GameEvent) {
        if let GameEvent::Malus(Malus::CriseMarche) = event {
            self.market_penalty = 0.7;
            return;
        }
        let player = &mut self.players[index];
        match event {
            GameEvent::Bonus(Bonus::Subvention) => player.tokens.add(5),
            GameEvent::Bonus(Bonus::NouveauClient) => player.temp_reputation += 1,
            GameEvent::Bonus(Bonus::BonusProduction) => player.temp_production += 5,
            GameEvent::Malus(Malus::Greve) => player.employees_active = false,
            GameEvent::Malus(Malus::PanneMachine) => {
                if player.machines > 0 {
                    player.machines -= 1;
                }
            }
            GameEvent::Choice(Choice::Delocalisation) => {
                player.delocalisation = true;
                player.reputation = player.reputation.saturating_sub(1);
            }
            GameEvent::Choice(Choice::Automatisation) => {
                // Consumes the draw but changes nothing below two employees.
                if player.employees >= 2 {
                    player.employees -= 2;
                    player.machines += 1;
                    player.reputation = player.reputation.saturating_sub(1);
                }
            }
            GameEvent::Choice(Choice::CampagneEthique) => {
                if player.tokens.subtract(10) {
                    player.reputation = (player.reputation + 2).min(MAX_REPUTATION);
                }
            }
            // Handled before the player borrow.
            GameEvent::Malus(Malus::CriseMarche) => {}
        }
    }

    // ─── Victory ────────────────────────────────────────────────────────────

    /// Capitalist victory first (100 gold tokens, first in roster order),
    /// then survivor victory (exactly one company left standing).
    fn check_victory(&self) -> Option<usize> {
        for (i, player) in self.players.iter().enumerate() {
            if !player.bankrupt && player.tokens.gold >= 100 {
                return Some(i);
            }
        }
        let mut active = self.players.iter().enumerate().filter(|(_, p)| !p.bankrupt);
        if let (Some((index, _)), None) = (active.next(), active.next()) {
            return Some(index);
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
