//! Calibration of win-probability models.
//!
//! Expected Calibration Error: bin predictions by confidence into equal-width
//! bins over [0, 1], then sum each bin's |observed rate - mean prediction|
//! weighted by its share of samples. The last bin is closed so 1.0 lands
//! somewhere.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
    pub mean_predicted: Option<f64>,
    pub mean_actual: Option<f64>,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub label: String,
    pub ece: f64,
    pub classwise_ece: f64,
    pub samples: usize,
    pub bins: Vec<CalibrationBin>,
}

fn check_inputs(outcomes: &[f64], probs: &[f64], bins: usize) -> Result<()> {
    if outcomes.len() != probs.len() {
        return Err(anyhow!(
            "length mismatch: {} outcomes vs {} probabilities",
            outcomes.len(),
            probs.len()
        ));
    }
    if bins == 0 {
        return Err(anyhow!("bin count must be positive"));
    }
    Ok(())
}

/// Edges are multiples of one step width, so e.g. the 20-bin edge at 0.15
/// is 3 * 0.05 = 0.15000000000000002 and 0.15 itself falls in bin 2.
fn bin_edges(i: usize, bins: usize) -> (f64, f64) {
    let step = 1.0 / bins as f64;
    (i as f64 * step, (i + 1) as f64 * step)
}

fn in_bin(p: f64, i: usize, bins: usize) -> bool {
    let (lo, hi) = bin_edges(i, bins);
    if i + 1 < bins {
        p >= lo && p < hi
    } else {
        p >= lo && p <= hi
    }
}

/// Per-bin (count, sum of predictions, sum of outcomes).
fn bin_sums(outcomes: &[f64], probs: &[f64], bins: usize) -> Vec<(usize, f64, f64)> {
    (0..bins)
        .map(|i| {
            outcomes
                .iter()
                .zip(probs)
                .filter(|(_, p)| in_bin(**p, i, bins))
                .fold((0usize, 0.0, 0.0), |(n, sp, sy), (y, p)| (n + 1, sp + p, sy + y))
        })
        .collect()
}

/// ECE in [0, 1]; 0 is perfectly calibrated. Empty input scores 0.
pub fn ece(outcomes: &[f64], probs: &[f64], bins: usize) -> Result<f64> {
    check_inputs(outcomes, probs, bins)?;
    let n = outcomes.len();
    if n == 0 {
        return Ok(0.0);
    }
    Ok(bin_sums(outcomes, probs, bins)
        .into_iter()
        .filter(|(count, _, _)| *count > 0)
        .map(|(count, sp, sy)| {
            let c = count as f64;
            (c / n as f64) * (sy / c - sp / c).abs()
        })
        .sum())
}

/// Mean of the positive-class and negative-class ECE.
///
/// Catches miscalibration plain ECE hides on imbalanced outcomes.
pub fn classwise_ece(outcomes: &[f64], probs: &[f64], bins: usize) -> Result<f64> {
    let pos = ece(outcomes, probs, bins)?;
    let neg_y: Vec<f64> = outcomes.iter().map(|y| 1.0 - y).collect();
    let neg_p: Vec<f64> = probs.iter().map(|p| 1.0 - p).collect();
    let neg = ece(&neg_y, &neg_p, bins)?;
    Ok((pos + neg) / 2.0)
}

pub fn calibration_report(
    label: &str,
    outcomes: &[f64],
    probs: &[f64],
    bins: usize,
) -> Result<CalibrationReport> {
    check_inputs(outcomes, probs, bins)?;
    let per_bin = bin_sums(outcomes, probs, bins)
        .into_iter()
        .enumerate()
        .map(|(i, (count, sp, sy))| {
            let (lo, hi) = bin_edges(i, bins);
            if count == 0 {
                return CalibrationBin {
                    lo,
                    hi,
                    count,
                    mean_predicted: None,
                    mean_actual: None,
                    gap: None,
                };
            }
            let mp = sp / count as f64;
            let ma = sy / count as f64;
            CalibrationBin {
                lo,
                hi,
                count,
                mean_predicted: Some(round_to(mp, 4)),
                mean_actual: Some(round_to(ma, 4)),
                gap: Some(round_to((mp - ma).abs(), 4)),
            }
        })
        .collect();

    Ok(CalibrationReport {
        label: label.to_string(),
        ece: round_to(ece(outcomes, probs, bins)?, 6),
        classwise_ece: round_to(classwise_ece(outcomes, probs, bins)?, 6),
        samples: outcomes.len(),
        bins: per_bin,
    })
}

pub fn render_report(report: &CalibrationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Calibration Report: {}\n", report.label));
    out.push_str(&format!("  Samples:       {}\n", report.samples));
    out.push_str(&format!("  ECE:           {:.4}\n", report.ece));
    out.push_str(&format!("  Classwise ECE: {:.4}\n", report.classwise_ece));
    out.push_str(&format!(
        "  {:>13}  {:>6}  {:>9}  {:>8}  {:>6}\n",
        "Bin", "Count", "Predicted", "Actual", "Gap"
    ));
    for b in &report.bins {
        let range = format!("[{:.2},{:.2})", b.lo, b.hi);
        match (b.mean_predicted, b.mean_actual, b.gap) {
            (Some(mp), Some(ma), Some(gap)) => out.push_str(&format!(
                "  {:>13}  {:>6}  {:>9.4}  {:>8.4}  {:>6.4}\n",
                range, b.count, mp, ma, gap
            )),
            _ => out.push_str(&format!(
                "  {:>13}  {:>6}  {:>9}  {:>8}  {:>6}\n",
                range, 0, "-", "-", "-"
            )),
        }
    }
    out
}

fn round_to(v: f64, dp: i32) -> f64 {
    let m = 10f64.powi(dp);
    (v * m).round() / m
}
