use picksboard::backtest::{accuracy, brier_score, value_bet_roi, GameOdds};
use picksboard::calibration::{calibration_report, render_report};
use picksboard::data::parse_csv;
use picksboard::sizing::parse_odds;
use picksboard::state::Config;

/// Reads a CSV with `prob` and `outcome` columns (outcome 1 = home win).
/// Optional `home_odds`/`away_odds` columns feed the value-bet replay;
/// rows without them use -110.
fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "predictions.csv".to_string());
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(err) => {
            eprintln!("failed to open {}: {}", path, err);
            std::process::exit(1);
        }
    };

    let mut probs = Vec::new();
    let mut outcomes = Vec::new();
    let mut odds = Vec::new();
    for (i, rec) in parse_csv(&text).iter().enumerate() {
        let (Some(p), Some(y)) = (rec.get("prob"), rec.get("outcome")) else {
            eprintln!("row {}: missing prob/outcome", i + 1);
            continue;
        };
        match (p.parse::<f64>(), y.parse::<f64>()) {
            (Ok(p), Ok(y)) if (0.0..=1.0).contains(&p) => {
                probs.push(p);
                outcomes.push(if y >= 0.5 { 1.0 } else { 0.0 });
                let side = |col: &str| rec.get(col).and_then(parse_odds);
                let default = GameOdds::default();
                odds.push(GameOdds {
                    home: side("home_odds").unwrap_or(default.home),
                    away: side("away_odds").unwrap_or(default.away),
                });
            }
            _ => eprintln!("row {}: bad values prob={} outcome={}", i + 1, p, y),
        }
    }
    if probs.is_empty() {
        eprintln!("no usable rows in {}", path);
        std::process::exit(3);
    }

    let cfg = Config::from_env();
    match calibration_report(&path, &outcomes, &probs, cfg.calibration_bins) {
        Ok(report) => print!("{}", render_report(&report)),
        Err(err) => {
            eprintln!("calibration failed: {}", err);
            std::process::exit(4);
        }
    }

    let scores = (
        brier_score(&outcomes, &probs),
        accuracy(&outcomes, &probs),
        value_bet_roi(&outcomes, &probs, &odds, cfg.value_margin, cfg.kelly_fraction),
    );
    match scores {
        (Ok(brier), Ok(acc), Ok(vb)) => {
            println!("  Brier:    {:.4}", brier);
            println!("  Accuracy: {:.3}", acc);
            println!(
                "  Value bets: {} | ROI {:.3} | avg edge {:.3}",
                vb.bets, vb.roi, vb.avg_edge
            );
        }
        _ => {
            eprintln!("scoring failed: probability and outcome counts differ");
            std::process::exit(4);
        }
    }
}
