// Copyright 2026 Patron Games. All rights reserved.
// "Qui est le Patron?" Simulation Suite

//! Batch simulation engine for the economic board game "Qui est le
//! Patron?". Automated companies play four-phase turns (production and
//! expenses, market, taxes, random events) until a winner emerges or the
//! turn cap lands, across many independent matches; every per-turn player
//! state becomes one row of tabular output.

pub mod batch;
pub mod draws;
pub mod game;
pub mod player;
pub mod policy;
pub mod report;
pub mod runner;
pub mod tokens;

pub use batch::{run_batch, run_batch_with_progress, BatchConfig, ConfigError, MAX_MATCHES};
pub use draws::{Bonus, Choice, DrawSource, GameEvent, Malus, SeededDraws};
pub use game::Game;
pub use player::{Action, Level, Player};
pub use policy::{DecisionPolicy, PolicyKind};
pub use report::{MatchData, SimulationResult, SimulationSummary, Stats, TurnRecord};
pub use runner::MatchRunner;
pub use tokens::Tokens;
