//! Bet sizing.
//!
//! Kelly: f* = (p*b - q) / b, with b = decimal odds - 1 and q = 1 - p.
//! Full Kelly is too volatile for a betting bankroll, so every entry point
//! takes a fraction (default 1/10).

use crate::signals::Grade;
use crate::state::Config;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingConfig {
    pub bankroll: f64,
    pub unit_size: f64,
    /// Cap per bet as a fraction of bankroll
    pub max_bet: f64,
    /// Kelly multiplier (0.1 = 1/10 Kelly)
    pub fraction: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            bankroll: 5000.0,
            unit_size: 100.0,
            max_bet: 0.05,
            fraction: 0.1,
        }
    }
}

impl SizingConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            bankroll: cfg.bankroll,
            unit_size: cfg.unit_size,
            max_bet: cfg.max_bet_pct,
            fraction: cfg.kelly_fraction,
        }
    }
}

// =============================================================================
// Odds conversions
// =============================================================================

/// American odds to decimal: +150 -> 2.5, -110 -> 1.909.
pub fn american_to_decimal(american: f64) -> f64 {
    if american > 0.0 {
        1.0 + american / 100.0
    } else if american < 0.0 {
        1.0 + 100.0 / american.abs()
    } else {
        1.0
    }
}

/// Accepts American (`-110`, `+150`) or decimal (`1.91`) text.
///
/// Anything with magnitude >= 100 is read as American.
pub fn parse_odds(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    if v.abs() >= 100.0 {
        Some(american_to_decimal(v))
    } else if v > 1.0 {
        Some(v)
    } else {
        None
    }
}

/// Implied probability from decimal odds, vig included.
pub fn implied_probability(odds: f64) -> f64 {
    if odds <= 1.0 {
        return 1.0;
    }
    1.0 / odds
}

/// Model edge over the implied probability, in percent, 2 dp.
pub fn edge_pct(model_prob: f64, odds: f64) -> f64 {
    round_to((model_prob - implied_probability(odds)) * 100.0, 2)
}

// =============================================================================
// Kelly Criterion
// =============================================================================

/// Fraction of bankroll to stake (0..=1). Zero when there is no edge.
pub fn kelly_fraction(model_prob: f64, odds: f64, fraction: f64) -> f64 {
    if model_prob <= 0.0 || model_prob >= 1.0 || odds <= 1.0 {
        return 0.0;
    }
    let b = odds - 1.0;
    let q = 1.0 - model_prob;
    let kelly = (model_prob * b - q) / b;
    if kelly <= 0.0 {
        return 0.0;
    }
    (fraction * kelly).min(1.0)
}

/// Stake in units, capped at `max_bet` of bankroll and rounded to 2 dp.
pub fn kelly_units(model_prob: f64, odds: f64, cfg: &SizingConfig) -> f64 {
    if cfg.bankroll <= 0.0 || cfg.unit_size <= 0.0 {
        return 0.0;
    }
    let bet_pct = kelly_fraction(model_prob, odds, cfg.fraction).min(cfg.max_bet);
    let units = round_to(bet_pct * cfg.bankroll / cfg.unit_size, 2);
    units.max(0.0)
}

/// Kelly units scaled by pick grade: A full, B half, C paper only.
pub fn grade_adjusted_units(grade: Grade, model_prob: f64, odds: f64, cfg: &SizingConfig) -> f64 {
    match grade {
        Grade::C => 0.0,
        Grade::B => round_to(kelly_units(model_prob, odds, cfg) * 0.5, 2),
        Grade::A => kelly_units(model_prob, odds, cfg),
    }
}

fn round_to(v: f64, dp: i32) -> f64 {
    let m = 10f64.powi(dp);
    (v * m).round() / m
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn american_conversion() {
        assert!((american_to_decimal(150.0) - 2.5).abs() < EPS);
        assert!((american_to_decimal(-110.0) - 1.909_090_909).abs() < 1e-6);
        assert_eq!(american_to_decimal(0.0), 1.0);
    }

    #[test]
    fn parse_odds_accepts_both_formats() {
        assert!((parse_odds("-110").unwrap() - 1.909_090_909).abs() < 1e-6);
        assert_eq!(parse_odds("+150"), Some(2.5));
        assert_eq!(parse_odds("1.91"), Some(1.91));
        assert_eq!(parse_odds("0.5"), None);
        assert_eq!(parse_odds("abc"), None);
    }

    #[test]
    fn no_edge_means_no_bet() {
        assert_eq!(kelly_fraction(0.50, 1.91, 1.0), 0.0);
        assert_eq!(kelly_fraction(0.0, 1.91, 1.0), 0.0);
        assert_eq!(kelly_fraction(1.0, 1.91, 1.0), 0.0);
        assert_eq!(kelly_fraction(0.6, 1.0, 1.0), 0.0);
    }

    #[test]
    fn full_kelly_matches_formula() {
        // p=0.6, b=0.91: (0.546 - 0.4) / 0.91
        let f = kelly_fraction(0.6, 1.91, 1.0);
        assert!((f - 0.146 / 0.91).abs() < EPS);
        let tenth = kelly_fraction(0.6, 1.91, 0.1);
        assert!((tenth - f * 0.1).abs() < EPS);
    }

    #[test]
    fn units_are_capped_and_rounded() {
        let cfg = SizingConfig::default();
        // 1/10 Kelly of ~16% is ~1.6% of 5000 = 80.2 dollars = 0.8 units
        assert_eq!(kelly_units(0.6, 1.91, &cfg), 0.8);
        let aggressive = SizingConfig { fraction: 1.0, ..cfg };
        // capped at 5% of bankroll = 250 dollars
        assert_eq!(kelly_units(0.6, 1.91, &aggressive), 2.5);
        let broke = SizingConfig { bankroll: 0.0, ..cfg };
        assert_eq!(kelly_units(0.6, 1.91, &broke), 0.0);
    }

    #[test]
    fn grade_scales_units() {
        let cfg = SizingConfig { fraction: 1.0, ..SizingConfig::default() };
        assert_eq!(grade_adjusted_units(Grade::A, 0.6, 1.91, &cfg), 2.5);
        assert_eq!(grade_adjusted_units(Grade::B, 0.6, 1.91, &cfg), 1.25);
        assert_eq!(grade_adjusted_units(Grade::C, 0.6, 1.91, &cfg), 0.0);
    }

    #[test]
    fn edge_against_implied() {
        assert_eq!(implied_probability(2.0), 0.5);
        assert_eq!(implied_probability(0.9), 1.0);
        assert_eq!(edge_pct(0.55, 2.0), 5.0);
    }
}
