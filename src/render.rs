//! Display formatting for pick tables and KPI summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::Kpis;
use crate::pick::{Category, Pick};

/// Shown for any absent field.
pub const PLACEHOLDER: &str = "-";
/// Single row shown when a table would otherwise be empty.
pub const EMPTY_STATE: &str = "(no picks) No picks found for the selected filters";

const HEADERS: [&str; 10] = [
    "Date", "Model", "Game", "Pick", "Proj", "Book", "Odds", "Edge", "Result", "Profit",
];

/// One display-ready table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRow {
    pub date: String,
    pub category: String,
    pub game: String,
    pub pick: String,
    pub projection: String,
    pub book: String,
    pub odds: String,
    pub edge: String,
    pub result: String,
    pub profit: String,
}

impl PickRow {
    pub fn from_pick(pick: &Pick) -> Self {
        Self {
            date: format_short_date(pick.date()),
            category: pick.category.label().to_string(),
            game: or_placeholder(pick.game()),
            pick: pick.description().unwrap_or_else(|| PLACEHOLDER.to_string()),
            projection: or_placeholder(pick.projection()),
            book: or_placeholder(pick.book()),
            odds: or_placeholder(pick.odds()),
            edge: pick
                .edge()
                .map(|_| format_pct(pick.edge_value()))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            result: pick.result().label().to_string(),
            profit: format_currency(pick.profit()),
        }
    }

    fn cells(&self) -> [&str; 10] {
        [
            &self.date,
            &self.category,
            &self.game,
            &self.pick,
            &self.projection,
            &self.book,
            &self.odds,
            &self.edge,
            &self.result,
            &self.profit,
        ]
    }
}

fn or_placeholder(v: Option<&str>) -> String {
    v.unwrap_or(PLACEHOLDER).to_string()
}

/// One decimal place with a percent sign.
pub fn format_pct(v: f64) -> String {
    format!("{:.1}%", v)
}

/// Signed dollars to two decimals: `+$95.24`, `-$100.00`, `$0.00`.
pub fn format_currency(v: f64) -> String {
    let cents = (v * 100.0).round();
    if cents == 0.0 {
        "$0.00".to_string()
    } else if cents > 0.0 {
        format!("+${:.2}", cents / 100.0)
    } else {
        format!("-${:.2}", -cents / 100.0)
    }
}

/// `2026-01-05` -> `Jan 5, 2026`; anything unparsable is returned as-is.
pub fn format_short_date(raw: &str) -> String {
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn rows(picks: &[Pick]) -> Vec<PickRow> {
    picks.iter().map(PickRow::from_pick).collect()
}

/// Fixed-width text table, or the empty-state line when there are no rows.
pub fn render_table(rows: &[PickRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY_STATE);
    }
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
    for row in rows {
        push_line(&mut out, &row.cells(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

pub fn render_kpis(label: &str, k: &Kpis) -> String {
    format!(
        "{}: {} bets | {}-{}-{} (W-L-P) | {} pending | win rate {} | staked {} | profit {} | ROI {}",
        label,
        k.total_bets,
        k.wins,
        k.losses,
        k.pushes,
        k.pending,
        format_pct(k.win_rate),
        format_currency(k.total_stake).trim_start_matches('+'),
        format_currency(k.total_profit),
        format_pct(k.roi),
    )
}

pub fn render_category_kpis(split: &[(Category, Kpis)]) -> String {
    split
        .iter()
        .map(|(cat, k)| render_kpis(cat.label(), k))
        .collect::<Vec<_>>()
        .join("\n")
}
