// Simulation output records and aggregation
// One TurnRecord per player per recorded turn; summaries follow the
// mean/std/CI aggregation used across the bench tooling.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::player::Player;

/// CSV column order, kept in lockstep with [`TurnRecord`].
const CSV_COLUMNS: [&str; 15] = [
    "match_number",
    "turn",
    "player_name",
    "total_tokens",
    "tokens_bronze",
    "tokens_silver",
    "tokens_gold",
    "reputation",
    "employees",
    "machines",
    "production",
    "sales",
    "revenue",
    "bankrupt",
    "level",
];

// ─── TurnRecord ──────────────────────────────────────────────────────────────

/// One player's observable state at one turn boundary (turn 0 = initial).
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub match_number: u32,
    pub turn: u32,
    pub player_name: String,
    pub total_tokens: u32,
    pub tokens_bronze: u32,
    pub tokens_silver: u32,
    pub tokens_gold: u32,
    pub reputation: u32,
    pub employees: u32,
    pub machines: u32,
    pub production: u32,
    pub sales: u32,
    pub revenue: u32,
    pub bankrupt: bool,
    pub level: &'static str,
}

impl TurnRecord {
    pub fn capture(match_number: u32, turn: u32, player: &Player) -> Self {
        Self {
            match_number,
            turn,
            player_name: player.name.clone(),
            total_tokens: player.tokens.total(),
            tokens_bronze: player.tokens.bronze,
            tokens_silver: player.tokens.silver,
            tokens_gold: player.tokens.gold,
            reputation: player.reputation,
            employees: player.employees,
            machines: player.machines,
            production: player.production,
            sales: player.sales,
            revenue: player.revenue,
            bankrupt: player.bankrupt,
            level: player.level().as_str(),
        }
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.match_number,
            self.turn,
            self.player_name,
            self.total_tokens,
            self.tokens_bronze,
            self.tokens_silver,
            self.tokens_gold,
            self.reputation,
            self.employees,
            self.machines,
            self.production,
            self.sales,
            self.revenue,
            self.bankrupt,
            self.level,
        )
    }
}

// ─── MatchData ───────────────────────────────────────────────────────────────

/// Append-only log of one match: snapshots plus the terminal outcome.
/// Never mutated after the owning runner records a turn.
#[derive(Debug, Clone, Serialize)]
pub struct MatchData {
    pub match_number: u32,
    pub records: Vec<TurnRecord>,
    pub terminal_turn: u32,
    /// Credited winner: the detected game winner, or the richest active
    /// player at the turn cap. `None` when every company went bankrupt.
    pub winner: Option<String>,
}

impl MatchData {
    pub fn new(match_number: u32) -> Self {
        Self { match_number, records: Vec::new(), terminal_turn: 0, winner: None }
    }

    /// Snapshot every player (bankrupt included) in insertion order.
    pub fn record_turn(&mut self, turn: u32, players: &[Player]) {
        for player in players {
            self.records.push(TurnRecord::capture(self.match_number, turn, player));
        }
        self.terminal_turn = turn;
    }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Per-metric aggregation: mean, spread, 95% CI bounds over samples.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                ci_lower: 0.0,
                ci_upper: 0.0,
                min: 0.0,
                max: 0.0,
                n: 0,
            };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Summary & result ────────────────────────────────────────────────────────

/// Batch-level statistics over all completed matches.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub total_matches: u32,
    pub average_terminal_turn: f64,
    pub terminal_turns: Stats,
    pub wins_by_player: BTreeMap<String, u32>,
}

/// Full batch output: every row in presentation order plus the summary.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub records: Vec<TurnRecord>,
    pub summary: SimulationSummary,
}

impl SimulationResult {
    /// Marshal all records as CSV, rows grouped by match then turn then
    /// player insertion order.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.records.len() * 48 + 128);
        out.push_str(&CSV_COLUMNS.join(","));
        out.push('\n');
        for record in &self.records {
            out.push_str(&record.csv_row());
            out.push('\n');
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_matches_player_state() {
        let mut player = Player::new("IA 1", true);
        player.tokens.add(115);
        player.sales = 3;
        let record = TurnRecord::capture(2, 4, &player);
        assert_eq!(record.match_number, 2);
        assert_eq!(record.turn, 4);
        assert_eq!(record.total_tokens, 125);
        assert_eq!(record.tokens_gold, 1);
        assert_eq!(record.tokens_silver, 2);
        assert_eq!(record.tokens_bronze, 5);
        assert_eq!(record.level, "gold");
        assert_eq!(record.sales, 3);
    }

    #[test]
    fn test_csv_header_and_row_shape() {
        let player = Player::new("IA 1", true);
        let mut data = MatchData::new(1);
        data.record_turn(0, std::slice::from_ref(&player));
        let result = SimulationResult {
            records: data.records,
            summary: SimulationSummary {
                total_matches: 1,
                average_terminal_turn: 0.0,
                terminal_turns: Stats::from_samples(&[0.0]),
                wins_by_player: BTreeMap::new(),
            },
        };
        let csv = result.to_csv();
        let mut lines = csv.lines();
        let header = lines.next().expect("header line");
        assert!(header.starts_with("match_number,turn,player_name,total_tokens"));
        assert_eq!(header.split(',').count(), CSV_COLUMNS.len());
        let row = lines.next().expect("one data row");
        assert_eq!(row, "1,0,IA 1,10,0,1,0,2,1,0,0,0,0,false,silver");
    }

    #[test]
    fn test_stats_from_samples() {
        let stats = Stats::from_samples(&[2.0, 4.0, 6.0]);
        assert!((stats.mean - 4.0).abs() < f64::EPSILON);
        assert!((stats.std_dev - 2.0).abs() < f64::EPSILON);
        assert!((stats.min - 2.0).abs() < f64::EPSILON);
        assert!((stats.max - 6.0).abs() < f64::EPSILON);
        assert_eq!(stats.n, 3);
    }

    #[test]
    fn test_stats_empty() {
        let stats = Stats::from_samples(&[]);
        assert_eq!(stats.n, 0);
        assert!(stats.mean.abs() < f64::EPSILON);
    }
}
