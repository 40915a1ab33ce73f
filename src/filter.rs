use serde::{Deserialize, Serialize};

use crate::pick::{BetResult, Category, Pick};

/// Optional predicates over picks; an unset predicate passes everything.
///
/// Dates compare as strings. That only works because exports use
/// fixed-width zero-padded `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickFilter {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub category: Option<Category>,
    pub result: Option<BetResult>,
}

impl PickFilter {
    pub fn matches(&self, pick: &Pick) -> bool {
        let date = pick.date();
        if let Some(from) = &self.date_from {
            if date < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if date > to.as_str() {
                return false;
            }
        }
        if let Some(cat) = self.category {
            if pick.category != cat {
                return false;
            }
        }
        if let Some(result) = self.result {
            if pick.result() != result {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, picks: &[Pick]) -> Vec<Pick> {
        picks.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self == &PickFilter::default()
    }
}

/// Newest first; ties keep load order.
pub fn sort_newest_first(picks: &mut [Pick]) {
    picks.sort_by(|a, b| b.date().cmp(a.date()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn pick(i: usize, date: &str, cat: Category, result: &str) -> Pick {
        Pick::new(i, cat, Record::from_pairs(&[("date", date), ("result", result)]))
    }

    fn sample() -> Vec<Pick> {
        vec![
            pick(0, "2026-01-03", Category::PlayerProp, "Win"),
            pick(1, "2026-01-05", Category::TeamModel, "Loss"),
            pick(2, "2026-01-07", Category::PlayerProp, ""),
            pick(3, "2026-01-05", Category::PlayerProp, "win"),
        ]
    }

    #[test]
    fn default_filter_passes_everything() {
        let f = PickFilter::default();
        assert!(f.is_empty());
        assert_eq!(f.apply(&sample()).len(), 4);
    }

    #[test]
    fn date_range_is_inclusive() {
        let f = PickFilter {
            date_from: Some("2026-01-05".into()),
            date_to: Some("2026-01-07".into()),
            ..Default::default()
        };
        let out = f.apply(&sample());
        assert_eq!(out.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        for p in &out {
            assert!("2026-01-05" <= p.date() && p.date() <= "2026-01-07");
        }
    }

    #[test]
    fn predicates_combine() {
        let f = PickFilter {
            category: Some(Category::PlayerProp),
            result: Some(BetResult::Win),
            ..Default::default()
        };
        let out = f.apply(&sample());
        assert_eq!(out.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 3]);

        let pending = PickFilter {
            result: Some(BetResult::Pending),
            ..Default::default()
        };
        assert_eq!(pending.apply(&sample())[0].index, 2);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut picks = sample();
        sort_newest_first(&mut picks);
        assert_eq!(
            picks.iter().map(|p| p.index).collect::<Vec<_>>(),
            vec![2, 1, 3, 0]
        );
    }
}
