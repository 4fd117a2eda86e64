// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite - Match Runner

use crate::draws::SeededDraws;
use crate::game::Game;
use crate::player::Player;
use crate::policy::PolicyKind;
use crate::report::MatchData;

/// Drives one game from creation to a winner or the turn cap.
///
/// The cap is inclusive and hitting it with no winner is a normal end of
/// match, not an error. State before turn 1 is recorded as turn 0, and
/// every completed turn is recorded after its victory check.
#[derive(Debug, Clone, Copy)]
pub struct MatchRunner {
    pub max_turns: u32,
}

impl MatchRunner {
    pub fn new(max_turns: u32) -> Self {
        Self { max_turns }
    }

    /// Run one match with a fresh roster: one player per entry of
    /// `policies`, all draws fed from a `ChaCha8Rng` seeded with `seed`.
    pub fn run_match(&self, match_number: u32, policies: &[PolicyKind], seed: u64) -> MatchData {
        let mut game = Game::new(policies.len());
        let policies: Vec<_> = policies.iter().map(PolicyKind::build).collect();
        let mut draws = SeededDraws::from_seed(seed);

        let mut data = MatchData::new(match_number);
        data.record_turn(0, game.players());

        for turn in 1..=self.max_turns {
            // Bankrupt players contribute no actions; the rest decide from
            // the live read-only state.
            let action_ids: Vec<Vec<String>> = game
                .players()
                .iter()
                .enumerate()
                .map(|(i, player)| {
                    if player.bankrupt {
                        Vec::new()
                    } else {
                        policies[i].decide(player, &game, &mut draws)
                    }
                })
                .collect();

            let game_continues = game.play_turn(&action_ids, &mut draws);
            data.record_turn(turn, game.players());
            if !game_continues {
                break;
            }
        }

        data.winner = match game.winner() {
            Some(index) => Some(game.players()[index].name.clone()),
            None => richest_active(game.players()).map(|p| p.name.clone()),
        };
        data
    }
}

/// Highest token total among non-bankrupt players; ties keep the first
/// player in roster order.
fn richest_active(players: &[Player]) -> Option<&Player> {
    let mut best: Option<&Player> = None;
    for player in players.iter().filter(|p| !p.bankrupt) {
        if best.map_or(true, |b| player.tokens.total() > b.tokens.total()) {
            best = Some(player);
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
