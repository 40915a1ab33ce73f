use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::feed::loader::{load_day, load_range};
use crate::feed::{Source, SourceKind};
use crate::filter::{sort_newest_first, PickFilter};
use crate::logging::{content_hash, log, log_refresh, obj, v_num, Domain, Level};
use crate::metrics::{aggregate, aggregate_by_category, Kpis};
use crate::pick::{Category, Pick};
use crate::render::{rows, PickRow};

#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP base for daily exports; takes precedence over `data_dir`.
    pub base_url: Option<String>,
    pub data_dir: String,
    pub http_timeout_secs: u64,
    pub bankroll: f64,
    pub unit_size: f64,
    pub kelly_fraction: f64,
    pub max_bet_pct: f64,
    pub calibration_bins: usize,
    pub value_margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            data_dir: "./data".to_string(),
            http_timeout_secs: 10,
            bankroll: 5000.0,
            unit_size: 100.0,
            kelly_fraction: 0.1,
            max_bet_pct: 0.05,
            calibration_bins: 20,
            value_margin: 0.025,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            base_url: std::env::var("PICKS_BASE_URL").ok().filter(|v| !v.trim().is_empty()),
            data_dir: std::env::var("PICKS_DATA_DIR").unwrap_or(d.data_dir),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.http_timeout_secs),
            bankroll: std::env::var("BANKROLL").ok().and_then(|v| v.parse().ok()).unwrap_or(d.bankroll),
            unit_size: std::env::var("UNIT_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(d.unit_size),
            kelly_fraction: std::env::var("KELLY_FRACTION").ok().and_then(|v| v.parse().ok()).unwrap_or(d.kelly_fraction),
            max_bet_pct: std::env::var("MAX_BET_PCT").ok().and_then(|v| v.parse().ok()).unwrap_or(d.max_bet_pct),
            calibration_bins: std::env::var("CALIBRATION_BINS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.calibration_bins),
            value_margin: std::env::var("VALUE_MARGIN").ok().and_then(|v| v.parse().ok()).unwrap_or(d.value_margin),
        }
    }

    pub fn source(&self) -> Result<Box<dyn Source>> {
        SourceKind::from_config(self).build(self)
    }
}

/// What a refresh should load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadRequest {
    Day(String),
    Range { from: String, to: String },
}

/// The last applied load.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Ticket of the refresh that produced this snapshot; 0 before any load.
    pub ticket: u64,
    pub request: Option<LoadRequest>,
    pub picks: Vec<Pick>,
    pub content_hash: String,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Applied { ticket: u64, picks: usize },
    /// A newer refresh already landed; this result was dropped.
    Stale { ticket: u64, current: u64 },
}

/// Filtered, sorted, rendered view of the current snapshot.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub rows: Vec<PickRow>,
    pub kpis: Kpis,
    pub by_category: Vec<(Category, Kpis)>,
}

/// Holds the process-wide pick snapshot.
///
/// Refreshes may overlap. Each takes a ticket before fetching and only
/// replaces the snapshot if no later ticket has been applied, so a slow
/// stale load cannot overwrite a newer one.
pub struct Board {
    next_ticket: AtomicU64,
    snapshot: Mutex<Snapshot>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(1),
            snapshot: Mutex::new(Snapshot::default()),
        }
    }

    pub fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    pub async fn refresh(&self, source: &dyn Source, request: LoadRequest) -> Refresh {
        let ticket = self.issue_ticket();
        let picks = match &request {
            LoadRequest::Day(date) => load_day(source, date).await,
            LoadRequest::Range { from, to } => load_range(source, from, to).await,
        };
        self.apply(ticket, request, picks)
    }

    /// Install `picks` under `ticket` unless a newer ticket is already applied.
    pub fn apply(&self, ticket: u64, request: LoadRequest, picks: Vec<Pick>) -> Refresh {
        let hash = fingerprint(&picks);
        let mut snap = match self.snapshot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if ticket < snap.ticket {
            log_refresh(ticket, false, picks.len(), &hash);
            return Refresh::Stale {
                ticket,
                current: snap.ticket,
            };
        }
        let count = picks.len();
        *snap = Snapshot {
            ticket,
            request: Some(request),
            picks,
            content_hash: hash.clone(),
            loaded_at: Some(Utc::now()),
        };
        log_refresh(ticket, true, count, &hash);
        Refresh::Applied {
            ticket,
            picks: count,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn view(&self, filter: &PickFilter) -> BoardView {
        let snap = self.snapshot();
        let mut picks = filter.apply(&snap.picks);
        sort_newest_first(&mut picks);
        let kpis = aggregate(&picks);
        log(
            Level::Debug,
            Domain::Stats,
            "kpis",
            kpi_fields(snap.ticket, snap.picks.len(), &kpis),
        );
        BoardView {
            rows: rows(&picks),
            kpis,
            by_category: aggregate_by_category(&picks),
        }
    }
}

fn kpi_fields(ticket: u64, loaded: usize, kpis: &Kpis) -> Map<String, Value> {
    obj(&[
        ("ticket", json!(ticket)),
        ("loaded", json!(loaded)),
        ("shown", json!(kpis.total_bets)),
        ("win_rate", v_num(kpis.win_rate)),
        ("roi", v_num(kpis.roi)),
        ("profit", v_num(kpis.total_profit)),
    ])
}

fn fingerprint(picks: &[Pick]) -> String {
    let body = serde_json::to_string(picks).unwrap_or_default();
    content_hash(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn picks(n: usize) -> Vec<Pick> {
        (0..n)
            .map(|i| {
                Pick::new(
                    i,
                    Category::TeamModel,
                    Record::from_pairs(&[("date", "2026-01-05"), ("result", "Win")]),
                )
            })
            .collect()
    }

    #[test]
    fn later_ticket_wins_regardless_of_completion_order() {
        let board = Board::new();
        let older = board.issue_ticket();
        let newer = board.issue_ticket();
        assert_eq!(
            board.apply(newer, LoadRequest::Day("2026-01-06".into()), picks(2)),
            Refresh::Applied { ticket: newer, picks: 2 }
        );
        assert_eq!(
            board.apply(older, LoadRequest::Day("2026-01-05".into()), picks(5)),
            Refresh::Stale { ticket: older, current: newer }
        );
        let snap = board.snapshot();
        assert_eq!(snap.picks.len(), 2);
        assert_eq!(snap.request, Some(LoadRequest::Day("2026-01-06".into())));
    }

    #[test]
    fn reload_replaces_wholesale() {
        let board = Board::new();
        let t1 = board.issue_ticket();
        board.apply(t1, LoadRequest::Day("2026-01-05".into()), picks(3));
        let t2 = board.issue_ticket();
        board.apply(t2, LoadRequest::Day("2026-01-05".into()), picks(1));
        assert_eq!(board.snapshot().picks.len(), 1);
    }

    #[test]
    fn identical_content_has_identical_hash() {
        let board = Board::new();
        let t1 = board.issue_ticket();
        board.apply(t1, LoadRequest::Day("d".into()), picks(2));
        let h1 = board.snapshot().content_hash;
        let t2 = board.issue_ticket();
        board.apply(t2, LoadRequest::Day("d".into()), picks(2));
        assert_eq!(h1, board.snapshot().content_hash);
    }

    #[test]
    fn kpi_log_fields_describe_the_filtered_view() {
        let board = Board::new();
        let t = board.issue_ticket();
        board.apply(t, LoadRequest::Day("2026-01-05".into()), picks(3));
        let view = board.view(&PickFilter {
            date_from: Some("2026-01-06".into()),
            ..PickFilter::default()
        });
        let fields = kpi_fields(t, 3, &view.kpis);
        assert_eq!(fields["ticket"], json!(1));
        assert_eq!(fields["loaded"], json!(3));
        assert_eq!(fields["shown"], json!(0));
        assert_eq!(fields["win_rate"], json!(0.0));
    }

    #[test]
    fn view_of_empty_board_is_empty() {
        let view = Board::new().view(&PickFilter::default());
        assert!(view.rows.is_empty());
        assert_eq!(view.kpis, Kpis::default());
        assert!(view.by_category.is_empty());
    }

    #[test]
    fn config_defaults_to_directory_source() {
        let cfg = Config::default();
        assert_eq!(SourceKind::from_config(&cfg), SourceKind::Dir("./data".into()));
        let http = Config {
            base_url: Some("https://example.com/data".into()),
            ..Config::default()
        };
        assert_eq!(
            SourceKind::from_config(&http),
            SourceKind::Http("https://example.com/data".into())
        );
    }
}
