//! Offline scoring of win-probability predictions.
//!
//! `value_bet_roi` replays a value-betting rule over settled games: bet a
//! side whenever the model beats the implied probability by more than a
//! margin, stake fractional Kelly, and settle against the outcome.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::sizing::{implied_probability, kelly_fraction};

/// Decimal equivalent of a -110 line.
pub const DEFAULT_ODDS: f64 = 1.0 + 100.0 / 110.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOdds {
    pub home: f64,
    pub away: f64,
}

impl Default for GameOdds {
    fn default() -> Self {
        Self {
            home: DEFAULT_ODDS,
            away: DEFAULT_ODDS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueBetSummary {
    /// pnl / wagered as a fraction; 0 when nothing was wagered.
    pub roi: f64,
    pub bets: usize,
    pub avg_edge: f64,
    pub wagered: f64,
    pub pnl: f64,
}

fn check_lengths(outcomes: &[f64], probs: &[f64]) -> Result<()> {
    if outcomes.len() != probs.len() {
        return Err(anyhow!(
            "length mismatch: {} outcomes vs {} probabilities",
            outcomes.len(),
            probs.len()
        ));
    }
    Ok(())
}

/// Mean squared error of probabilities against 0/1 outcomes.
pub fn brier_score(outcomes: &[f64], probs: &[f64]) -> Result<f64> {
    check_lengths(outcomes, probs)?;
    if outcomes.is_empty() {
        return Ok(0.0);
    }
    let sum: f64 = outcomes
        .iter()
        .zip(probs)
        .map(|(y, p)| (p - y).powi(2))
        .sum();
    Ok(sum / outcomes.len() as f64)
}

/// Share of games where `p > 0.5` agreed with the outcome.
pub fn accuracy(outcomes: &[f64], probs: &[f64]) -> Result<f64> {
    check_lengths(outcomes, probs)?;
    if outcomes.is_empty() {
        return Ok(0.0);
    }
    let hits = outcomes
        .iter()
        .zip(probs)
        .filter(|(y, p)| (**p > 0.5) == (**y >= 0.5))
        .count();
    Ok(hits as f64 / outcomes.len() as f64)
}

/// `outcomes[i]` is 1.0 for a home win, `probs[i]` the model's P(home win).
/// `odds` may be shorter than the games; missing entries use -110 both ways.
pub fn value_bet_roi(
    outcomes: &[f64],
    probs: &[f64],
    odds: &[GameOdds],
    margin: f64,
    kelly_frac: f64,
) -> Result<ValueBetSummary> {
    check_lengths(outcomes, probs)?;
    let mut s = ValueBetSummary::default();
    let mut edge_sum = 0.0;

    for (i, (y, p)) in outcomes.iter().zip(probs).enumerate() {
        let line = odds.get(i).copied().unwrap_or_default();
        let home_won = *y >= 0.5;
        let sides = [(*p, line.home, home_won), (1.0 - p, line.away, !home_won)];
        for (prob, price, won) in sides {
            let edge = prob - implied_probability(price);
            if edge <= margin {
                continue;
            }
            let stake = kelly_fraction(prob, price, kelly_frac);
            if stake <= 0.0 {
                continue;
            }
            s.wagered += stake;
            s.pnl += if won { stake * (price - 1.0) } else { -stake };
            s.bets += 1;
            edge_sum += edge;
        }
    }

    if s.wagered > 0.0 {
        s.roi = s.pnl / s.wagered;
    }
    if s.bets > 0 {
        s.avg_edge = edge_sum / s.bets as f64;
    }
    Ok(s)
}
