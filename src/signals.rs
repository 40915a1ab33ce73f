//! Market-signal checks used to grade picks, and per-signal hit rates.
//!
//! Grading is pure: callers supply whatever line-movement and public-money
//! numbers they have; nothing here fetches.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::data::Record;
use crate::pick::BetResult;

/// Minimum model edge (percent) for the edge check.
pub const EDGE_THRESHOLD_PCT: f64 = 3.0;
/// Money% vs bet% gap (points) that counts as divergence.
pub const DIVERGENCE_POINTS: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divergence {
    /// Money share well above ticket share: larger bettors on this side.
    SharpAction,
    /// Ticket share well above money share.
    PublicHeavy,
    Aligned,
}

pub fn classify_divergence(bet_pct: f64, money_pct: f64) -> Divergence {
    if (money_pct - bet_pct).abs() <= DIVERGENCE_POINTS {
        Divergence::Aligned
    } else if money_pct > bet_pct {
        Divergence::SharpAction
    } else {
        Divergence::PublicHeavy
    }
}

/// Signals known for a game at grading time. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSignals {
    pub spread_open: Option<String>,
    pub spread_current: Option<String>,
    pub divergence: Option<Divergence>,
    pub sharp_signals: Vec<String>,
}

impl MarketSignals {
    /// Fill `divergence` from public spread bet% and money%.
    pub fn with_public_split(mut self, bet_pct: Option<f64>, money_pct: Option<f64>) -> Self {
        if let (Some(b), Some(m)) = (bet_pct, money_pct) {
            self.divergence = Some(classify_divergence(b, m));
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 4 => Grade::A,
            3 => Grade::B,
            _ => Grade::C,
        }
    }

    /// Flat staking by grade: A full unit, B half, C paper only.
    pub fn units(&self) -> f64 {
        match self {
            Grade::A => 1.0,
            Grade::B => 0.5,
            Grade::C => 0.0,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeOutcome {
    pub grade: Grade,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Four checks, one point each:
/// edge >= 3%, line movement tracked, sharp money aligned, no conflicting signal.
/// 4 points is an A, 3 a B, anything less a C.
pub fn grade_pick(edge: Option<&str>, signals: &MarketSignals) -> GradeOutcome {
    let mut score = 0u8;
    let mut reasons = Vec::with_capacity(4);

    match edge.and_then(|e| e.trim().parse::<f64>().ok()) {
        Some(e) if e >= EDGE_THRESHOLD_PCT => {
            score += 1;
            reasons.push("+ model edge significant".to_string());
        }
        Some(_) => reasons.push("- model edge weak (< 3%)".to_string()),
        None => reasons.push("? model edge unknown".to_string()),
    }

    match (present(&signals.spread_open), present(&signals.spread_current)) {
        (Some(open), Some(current)) => {
            if open.trim().parse::<f64>().is_ok() && current.trim().parse::<f64>().is_ok() {
                score += 1;
                reasons.push("+ line movement tracked".to_string());
            } else {
                reasons.push("? line movement unclear".to_string());
            }
        }
        _ => reasons.push("? line movement data unavailable".to_string()),
    }

    match signals.divergence {
        Some(Divergence::SharpAction) => {
            score += 1;
            reasons.push("+ sharp money aligned".to_string());
        }
        Some(Divergence::PublicHeavy) => reasons.push("- public heavy (consider fade)".to_string()),
        _ => reasons.push("~ no sharp signal".to_string()),
    }

    let conflicted = signals
        .sharp_signals
        .iter()
        .any(|s| s.to_lowercase().contains("conflict"));
    if conflicted {
        reasons.push("- conflicting signals present".to_string());
    } else {
        score += 1;
        reasons.push("+ no conflicting signals".to_string());
    }

    GradeOutcome {
        grade: Grade::from_score(score),
        score,
        reasons,
    }
}

// =============================================================================
// Signal performance
// =============================================================================

/// Settled record for one (signal, direction) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStat {
    pub signal: String,
    pub direction: String,
    pub wins: usize,
    pub total: usize,
}

impl SignalStat {
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.wins as f64 / self.total as f64
        }
    }
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

fn join_key(rec: &Record) -> (String, String, String) {
    (
        rec.get("date").unwrap_or("").to_string(),
        rec.get("game").unwrap_or("").to_string(),
        rec.get("bet").unwrap_or("").to_string(),
    )
}

/// Win rates per (signal_name, signal_direction), settled bets only.
///
/// A signal row with a blank or pending `bet_result` takes the result of the
/// grade-tracker row with the same (date, game, bet). Any other unsettled
/// value (`void`, `in progress`) is skipped.
pub fn signal_performance(signal_rows: &[Record], grade_rows: &[Record]) -> Vec<SignalStat> {
    let graded: HashMap<(String, String, String), BetResult> = grade_rows
        .iter()
        .map(|r| (join_key(r), BetResult::parse(r.get("result").unwrap_or(""))))
        .collect();

    let mut tally: BTreeMap<(String, String), (usize, usize)> = BTreeMap::new();
    for row in signal_rows {
        let raw = row.get("bet_result").unwrap_or("").trim();
        let result = if raw.is_empty() || raw.eq_ignore_ascii_case("pending") {
            graded
                .get(&join_key(row))
                .copied()
                .unwrap_or(BetResult::Pending)
        } else {
            BetResult::parse(raw)
        };
        if !result.is_graded() {
            continue;
        }
        let key = (
            row.get("signal_name").unwrap_or("").to_string(),
            row.get("signal_direction").unwrap_or("").to_string(),
        );
        let entry = tally.entry(key).or_insert((0, 0));
        entry.1 += 1;
        if result == BetResult::Win {
            entry.0 += 1;
        }
    }

    tally
        .into_iter()
        .map(|((signal, direction), (wins, total))| SignalStat {
            signal,
            direction,
            wins,
            total,
        })
        .collect()
}

pub fn render_signal_performance(stats: &[SignalStat]) -> String {
    if stats.is_empty() {
        return "No settled signal rows.\n".to_string();
    }
    let mut out = String::from("Signal performance (settled bets only):\n");
    let mut current: Option<&str> = None;
    for s in stats {
        if current != Some(s.signal.as_str()) {
            out.push_str(&format!("\nSignal: {}\n", s.signal));
            current = Some(s.signal.as_str());
        }
        out.push_str(&format!(
            "  - {} : {}/{} win ({:.1}%)\n",
            s.direction,
            s.wins,
            s.total,
            s.win_rate()
        ));
    }
    out
}
