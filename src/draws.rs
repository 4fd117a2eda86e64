// Random draw plumbing — seedable, stubbable
// Every source of randomness in a match flows through one DrawSource so
// replays with the same seed are bit-identical.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ─── Event vocabulary ────────────────────────────────────────────────────────

/// Category CDF for phase-4 draws: bonus 40%, malus 40%, choice 20%.
const EVENT_CDF: [f64; 2] = [0.40, 0.80];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bonus {
    /// +5 tokens.
    Subvention,
    /// +1 temporary reputation.
    NouveauClient,
    /// +5 temporary production.
    BonusProduction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Malus {
    /// Market penalty drops to 0.7 for the current turn.
    CriseMarche,
    /// Employees produce nothing this turn.
    Greve,
    /// One machine is lost, when there is one to lose.
    PanneMachine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// Sticky cost reduction, -1 reputation.
    Delocalisation,
    /// Trade two employees for a machine, -1 reputation.
    /// No-op with fewer than two employees; the draw is still consumed.
    Automatisation,
    /// Pay 10 tokens for +2 reputation.
    CampagneEthique,
}

/// One phase-4 event, drawn independently per active player per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Bonus(Bonus),
    Malus(Malus),
    Choice(Choice),
}

// ─── DrawSource ──────────────────────────────────────────────────────────────

/// The single seam for randomness in a match.
///
/// The engine and the decision policies never touch a PRNG directly; they
/// ask the match's `DrawSource`. Tests substitute fixed implementations to
/// pin dice and event outcomes.
pub trait DrawSource {
    /// Sum of two independent d6 (one aggregate roll per market phase).
    fn dice_roll(&mut self) -> u32;

    /// Weighted category draw followed by a uniform sub-event draw.
    fn draw_event(&mut self) -> GameEvent;

    /// Uniform draw against `probability` (used by decision policies).
    fn chance(&mut self, probability: f64) -> bool;
}

// ─── SeededDraws ─────────────────────────────────────────────────────────────

/// Production draw source backed by a seeded `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct SeededDraws {
    rng: ChaCha8Rng,
}

impl SeededDraws {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl DrawSource for SeededDraws {
    fn dice_roll(&mut self) -> u32 {
        self.rng.gen_range(1..=6) + self.rng.gen_range(1..=6)
    }

    fn draw_event(&mut self) -> GameEvent {
        let category: f64 = self.rng.gen();
        let sub = self.rng.gen_range(0..3usize);
        if category < EVENT_CDF[0] {
            GameEvent::Bonus(
                [Bonus::Subvention, Bonus::NouveauClient, Bonus::BonusProduction][sub],
            )
        } else if category < EVENT_CDF[1] {
            GameEvent::Malus([Malus::CriseMarche, Malus::Greve, Malus::PanneMachine][sub])
        } else {
            GameEvent::Choice(
                [Choice::Delocalisation, Choice::Automatisation, Choice::CampagneEthique][sub],
            )
        }
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }
}
