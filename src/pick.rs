//! Pick records: one CSV row tagged with the model that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PlayerProp,
    TeamModel,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::PlayerProp, Category::TeamModel];

    pub fn label(&self) -> &'static str {
        match self {
            Category::PlayerProp => "Player Props",
            Category::TeamModel => "Team Model",
        }
    }

    pub fn file_suffix(&self) -> &'static str {
        match self {
            Category::PlayerProp => "player_props",
            Category::TeamModel => "team_model",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace(' ', "_").as_str() {
            "props" | "player" | "player_props" | "player_prop" => Some(Category::PlayerProp),
            "team" | "team_model" => Some(Category::TeamModel),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settlement state of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetResult {
    Win,
    Loss,
    Push,
    Pending,
    InProgress,
    Final,
    Graded,
}

impl BetResult {
    /// Case-insensitive; blank or unknown text is `Pending`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "win" => BetResult::Win,
            "loss" => BetResult::Loss,
            "push" => BetResult::Push,
            "in progress" | "in_progress" | "inprogress" => BetResult::InProgress,
            "final" => BetResult::Final,
            "graded" => BetResult::Graded,
            _ => BetResult::Pending,
        }
    }

    /// Strict parse for user-supplied filters: unknown text is rejected.
    pub fn from_filter(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        if lowered == "pending" {
            return Some(BetResult::Pending);
        }
        match BetResult::parse(&lowered) {
            BetResult::Pending => None,
            other => Some(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BetResult::Win => "Win",
            BetResult::Loss => "Loss",
            BetResult::Push => "Push",
            BetResult::Pending => "Pending",
            BetResult::InProgress => "In Progress",
            BetResult::Final => "Final",
            BetResult::Graded => "Graded",
        }
    }

    /// Counts toward the win-rate denominator.
    pub fn is_graded(&self) -> bool {
        matches!(self, BetResult::Win | BetResult::Loss)
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single betting recommendation.
///
/// Identity is positional: `index` is the row's position within the load
/// that produced it. Reloading replaces picks, it never merges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub index: usize,
    pub category: Category,
    pub record: Record,
}

impl Pick {
    pub fn new(index: usize, category: Category, record: Record) -> Self {
        Self {
            index,
            category,
            record,
        }
    }

    /// Fill `date` from the load's date when the export left it out.
    pub fn assign_date_if_missing(&mut self, date: &str) {
        if !self.record.contains("date") {
            self.record.insert("date", date);
        }
    }

    pub fn date(&self) -> &str {
        self.record.get("date").unwrap_or("")
    }

    pub fn game(&self) -> Option<&str> {
        self.non_empty("game")
    }

    pub fn result(&self) -> BetResult {
        BetResult::parse(self.record.get("result").unwrap_or(""))
    }

    pub fn stake(&self) -> f64 {
        self.record.number("stake")
    }

    pub fn profit(&self) -> f64 {
        self.record.number("profit")
    }

    pub fn book(&self) -> Option<&str> {
        self.non_empty("book")
    }

    pub fn odds(&self) -> Option<&str> {
        self.non_empty("odds")
    }

    pub fn line(&self) -> Option<&str> {
        self.non_empty("line")
    }

    pub fn projection(&self) -> Option<&str> {
        self.record.first_of(&["projection", "proj"])
    }

    /// Raw edge text; player props export `edge_pct`, the team model `edge`.
    pub fn edge(&self) -> Option<&str> {
        self.record.first_of(&["edge_pct", "edge"])
    }

    pub fn edge_value(&self) -> f64 {
        self.edge().map(crate::data::parse_number).unwrap_or(0.0)
    }

    /// Human-readable bet: `player market bet line` for props, `pick` for team picks.
    pub fn description(&self) -> Option<String> {
        match self.category {
            Category::PlayerProp => {
                let parts: Vec<&str> = ["player", "market", "bet", "line"]
                    .iter()
                    .filter_map(|k| self.non_empty(k))
                    .collect();
                if parts.is_empty() {
                    self.non_empty("pick").map(str::to_string)
                } else {
                    Some(parts.join(" "))
                }
            }
            Category::TeamModel => self.non_empty("pick").map(str::to_string),
        }
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.record.get(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_parse_is_case_insensitive_with_pending_default() {
        assert_eq!(BetResult::parse("WIN"), BetResult::Win);
        assert_eq!(BetResult::parse(" loss "), BetResult::Loss);
        assert_eq!(BetResult::parse("In Progress"), BetResult::InProgress);
        assert_eq!(BetResult::parse("graded"), BetResult::Graded);
        assert_eq!(BetResult::parse(""), BetResult::Pending);
        assert_eq!(BetResult::parse("void"), BetResult::Pending);
    }

    #[test]
    fn filter_parse_rejects_unknown() {
        assert_eq!(BetResult::from_filter("push"), Some(BetResult::Push));
        assert_eq!(BetResult::from_filter("Pending"), Some(BetResult::Pending));
        assert_eq!(BetResult::from_filter("void"), None);
    }

    #[test]
    fn category_parse_accepts_aliases() {
        assert_eq!(Category::parse("props"), Some(Category::PlayerProp));
        assert_eq!(Category::parse("Player Props"), Some(Category::PlayerProp));
        assert_eq!(Category::parse("team"), Some(Category::TeamModel));
        assert_eq!(Category::parse("futures"), None);
    }

    #[test]
    fn prop_description_joins_fields() {
        let rec = Record::from_pairs(&[
            ("player", "Jalen Brunson"),
            ("market", "points"),
            ("bet", "over"),
            ("line", "27.5"),
            ("projection", "30.1"),
            ("edge_pct", "6.4"),
        ]);
        let pick = Pick::new(0, Category::PlayerProp, rec);
        assert_eq!(
            pick.description().as_deref(),
            Some("Jalen Brunson points over 27.5")
        );
        assert_eq!(pick.projection(), Some("30.1"));
        assert_eq!(pick.edge_value(), 6.4);
    }

    #[test]
    fn team_pick_uses_alternate_columns() {
        let rec = Record::from_pairs(&[("pick", "Cavaliers +6.0"), ("proj", "4.5"), ("edge", "3.1")]);
        let pick = Pick::new(2, Category::TeamModel, rec);
        assert_eq!(pick.description().as_deref(), Some("Cavaliers +6.0"));
        assert_eq!(pick.projection(), Some("4.5"));
        assert_eq!(pick.edge(), Some("3.1"));
        assert_eq!(pick.result(), BetResult::Pending);
        assert_eq!(pick.stake(), 0.0);
    }

    #[test]
    fn missing_date_is_assigned_late() {
        let mut pick = Pick::new(0, Category::TeamModel, Record::from_pairs(&[("date", "")]));
        pick.assign_date_if_missing("2026-03-01");
        assert_eq!(pick.date(), "2026-03-01");

        let mut dated = Pick::new(0, Category::TeamModel, Record::from_pairs(&[("date", "2026-02-28")]));
        dated.assign_date_if_missing("2026-03-01");
        assert_eq!(dated.date(), "2026-02-28");
    }
}
