use serde::{Deserialize, Serialize};

use crate::pick::{BetResult, Category, Pick};

/// Headline numbers for a set of picks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub pending: usize,
    /// Percent of graded (win/loss) picks that won; 0 with nothing graded.
    pub win_rate: f64,
    pub total_stake: f64,
    pub total_profit: f64,
    /// Profit over stake, in percent; 0 when nothing was staked.
    pub roi: f64,
}

impl Kpis {
    pub fn graded(&self) -> usize {
        self.wins + self.losses
    }
}

pub fn aggregate<'a, I>(picks: I) -> Kpis
where
    I: IntoIterator<Item = &'a Pick>,
{
    let mut k = Kpis::default();
    for pick in picks {
        k.total_bets += 1;
        match pick.result() {
            BetResult::Win => k.wins += 1,
            BetResult::Loss => k.losses += 1,
            BetResult::Push => k.pushes += 1,
            BetResult::Pending | BetResult::InProgress => k.pending += 1,
            BetResult::Final | BetResult::Graded => {}
        }
        k.total_stake += pick.stake();
        k.total_profit += pick.profit();
    }
    k.win_rate = ratio_pct(k.wins as f64, k.graded() as f64);
    k.roi = ratio_pct(k.total_profit, k.total_stake);
    k
}

/// KPIs per category, in `Category::ALL` order, skipping empty categories.
pub fn aggregate_by_category(picks: &[Pick]) -> Vec<(Category, Kpis)> {
    Category::ALL
        .iter()
        .filter_map(|cat| {
            let k = aggregate(picks.iter().filter(|p| p.category == *cat));
            (k.total_bets > 0).then_some((*cat, k))
        })
        .collect()
}

fn ratio_pct(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let v = num / den * 100.0;
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
