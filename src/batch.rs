// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite - Batch Orchestrator

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::policy::PolicyKind;
use crate::report::{MatchData, SimulationResult, SimulationSummary, Stats};
use crate::runner::MatchRunner;

/// Hard ceiling on matches per batch.
pub const MAX_MATCHES: u32 = 1000;

/// Fire-and-forget progress hook: `(completed, total)` after each match.
pub type ProgressFn = dyn Fn(u32, u32) + Send + Sync;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Batch parameters, validated in full before any match starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub matches: u32,
    pub max_turns: u32,
    /// Policy identifiers cycled across player slots.
    pub policies: Vec<String>,
    pub players_per_match: u32,
    /// Match `i` (0-based) draws from `base_seed + i`.
    pub base_seed: u64,
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            matches: 10,
            max_turns: 50,
            policies: vec![
                "balanced".to_string(),
                "aggressive".to_string(),
                "conservative".to_string(),
                "reputation".to_string(),
            ],
            players_per_match: 4,
            base_seed: 0,
            parallel: true,
        }
    }
}

/// Invalid batch parameters. Raised before any match executes, so a
/// failed call leaves no partial batch state behind.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("match count must be at least 1")]
    NoMatches,

    #[error("match count {0} exceeds the maximum of {MAX_MATCHES}")]
    TooManyMatches(u32),

    #[error("max turns per match must be at least 1")]
    NoTurns,

    #[error("a match needs at least 2 players, got {0}")]
    TooFewPlayers(u32),

    #[error("policy list must not be empty")]
    NoPolicies,

    #[error("unknown policy identifier: {0}")]
    UnknownPolicy(String),
}

impl BatchConfig {
    /// Validate every parameter and resolve the per-slot policy
    /// assignment (identifiers cycle across player slots).
    pub fn resolve(&self) -> Result<Vec<PolicyKind>, ConfigError> {
        if self.matches == 0 {
            return Err(ConfigError::NoMatches);
        }
        if self.matches > MAX_MATCHES {
            return Err(ConfigError::TooManyMatches(self.matches));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::NoTurns);
        }
        if self.players_per_match < 2 {
            return Err(ConfigError::TooFewPlayers(self.players_per_match));
        }
        if self.policies.is_empty() {
            return Err(ConfigError::NoPolicies);
        }
        let kinds = self
            .policies
            .iter()
            .map(|id| PolicyKind::parse(id).ok_or_else(|| ConfigError::UnknownPolicy(id.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((0..self.players_per_match as usize)
            .map(|slot| kinds[slot % kinds.len()])
            .collect())
    }
}

// ─── Batch execution ─────────────────────────────────────────────────────────

/// Run `config.matches` independent matches and aggregate the output table.
pub fn run_batch(config: &BatchConfig) -> Result<SimulationResult, ConfigError> {
    run_batch_with_progress(config, None)
}

/// Like [`run_batch`], reporting completions through `progress`.
///
/// Each match owns its game, roster, policies, and draw stream
/// exclusively, so matches parallelize without locks. Output rows are
/// grouped by match number, then turn, then player insertion order,
/// regardless of completion order.
pub fn run_batch_with_progress(
    config: &BatchConfig,
    progress: Option<&(dyn Fn(u32, u32) + Send + Sync)>,
) -> Result<SimulationResult, ConfigError> {
    let assignment = config.resolve()?;
    let runner = MatchRunner::new(config.max_turns);
    log::info!(
        "starting batch: {} matches, {} players, cap {} turns, seed {}",
        config.matches,
        config.players_per_match,
        config.max_turns,
        config.base_seed
    );

    let completed = AtomicU32::new(0);
    let run_one = |i: u32| -> MatchData {
        let data = runner.run_match(i + 1, &assignment, config.base_seed + u64::from(i));
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(callback) = progress {
            callback(done, config.matches);
        }
        log::debug!(
            "match {} ended at turn {} (winner: {})",
            data.match_number,
            data.terminal_turn,
            data.winner.as_deref().unwrap_or("none")
        );
        data
    };

    let mut matches: Vec<MatchData> = if config.parallel {
        (0..config.matches).into_par_iter().map(run_one).collect()
    } else {
        (0..config.matches).map(run_one).collect()
    };
    matches.sort_by_key(|m| m.match_number);

    let result = aggregate(config.matches, matches);
    log::info!(
        "batch complete: {} rows, average terminal turn {:.1}",
        result.records.len(),
        result.summary.average_terminal_turn
    );
    Ok(result)
}

/// Fold per-match logs into the ordered output table and summary.
fn aggregate(total_matches: u32, matches: Vec<MatchData>) -> SimulationResult {
    let terminal_turns: Vec<f64> = matches.iter().map(|m| f64::from(m.terminal_turn)).collect();
    let mut wins_by_player = BTreeMap::new();
    for m in &matches {
        if let Some(name) = &m.winner {
            *wins_by_player.entry(name.clone()).or_insert(0) += 1;
        }
    }
    let terminal_turns = Stats::from_samples(&terminal_turns);
    let summary = SimulationSummary {
        total_matches,
        average_terminal_turn: terminal_turns.mean,
        terminal_turns,
        wins_by_player,
    };
    let records = matches.into_iter().flat_map(|m| m.records).collect();
    SimulationResult { records, summary }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let assignment = BatchConfig::default().resolve().expect("default config");
        assert_eq!(assignment.len(), 4);
        assert_eq!(assignment[0], PolicyKind::Balanced);
    }

    #[test]
    fn test_policy_cycling_across_slots() {
        let config = BatchConfig {
            policies: vec!["balanced".to_string(), "passive".to_string()],
            players_per_match: 5,
            ..BatchConfig::default()
        };
        let assignment = config.resolve().expect("valid config");
        assert_eq!(
            assignment,
            vec![
                PolicyKind::Balanced,
                PolicyKind::Passive,
                PolicyKind::Balanced,
                PolicyKind::Passive,
                PolicyKind::Balanced,
            ]
        );
    }

    #[test]
    fn test_validation_rejects_bad_counts() {
        let zero = BatchConfig { matches: 0, ..BatchConfig::default() };
        assert!(matches!(zero.resolve(), Err(ConfigError::NoMatches)));

        let too_many = BatchConfig { matches: MAX_MATCHES + 1, ..BatchConfig::default() };
        assert!(matches!(too_many.resolve(), Err(ConfigError::TooManyMatches(_))));

        let no_turns = BatchConfig { max_turns: 0, ..BatchConfig::default() };
        assert!(matches!(no_turns.resolve(), Err(ConfigError::NoTurns)));

        let solo = BatchConfig { players_per_match: 1, ..BatchConfig::default() };
        assert!(matches!(solo.resolve(), Err(ConfigError::TooFewPlayers(1))));
    }

    #[test]
    fn test_unknown_policy_fails_before_any_match() {
        let config = BatchConfig {
            policies: vec!["balanced".to_string(), "chaotic".to_string()],
            ..BatchConfig::default()
        };
        match config.resolve() {
            Err(ConfigError::UnknownPolicy(id)) => assert_eq!(id, "chaotic"),
            other => panic!("expected UnknownPolicy, got {:?}", other.map(|_| ())),
        }
    }
}
