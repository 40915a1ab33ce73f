//! End-to-end: daily exports on disk -> board snapshot -> filtered view.

use std::fs;
use std::path::Path;

use picksboard::feed::loader::{load_day, load_range};
use picksboard::feed::DirSource;
use picksboard::filter::PickFilter;
use picksboard::pick::{BetResult, Category};
use picksboard::render::{render_table, EMPTY_STATE};
use picksboard::state::{Board, LoadRequest, Refresh};
use tempfile::TempDir;

const PROPS_HEADER: &str = "date,game,player,market,bet,line,projection,edge_pct,book,odds,result,stake,profit";
const TEAM_HEADER: &str = "date,game,pick,proj,line,edge,book,odds,result,stake,profit";

fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) {
    let mut out = String::new();
    out.push_str(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(dir.join(name), out).unwrap();
}

fn seed(dir: &Path) {
    write_csv(
        dir,
        "2026-01-05_player_props.csv",
        PROPS_HEADER,
        &[
            "2026-01-05,NYK @ BOS,Jalen Brunson,points,over,27.5,30.1,6.4,FanDuel,-105,Win,100,95.24",
            "2026-01-05,LAL @ DEN,Nikola Jokic,rebounds,over,12.5,13.0,2.1,DraftKings,-115,Loss,100,-100",
        ],
    );
    write_csv(
        dir,
        "2026-01-05_team_model.csv",
        TEAM_HEADER,
        &["2026-01-05,CLE @ DET,Cavaliers +6.0,4.5,6.0,3.1,BetMGM,-110,Push,100,0"],
    );
    write_csv(
        dir,
        "2026-01-07_team_model.csv",
        TEAM_HEADER,
        &["2026-01-07,MIA @ ORL,Magic -2.5,3.9,-2.5,4.0,Caesars,-110,,100,"],
    );
}

#[tokio::test]
async fn day_load_reproduces_worked_kpis() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let src = DirSource::new(dir.path());

    let picks = load_day(&src, "2026-01-05").await;
    assert_eq!(picks.len(), 3);

    let board = Board::new();
    let t = board.issue_ticket();
    board.apply(t, LoadRequest::Day("2026-01-05".into()), picks);
    let view = board.view(&PickFilter::default());

    assert_eq!(view.kpis.total_bets, 3);
    assert_eq!(view.kpis.win_rate, 50.0);
    assert!((view.kpis.total_profit - -4.76).abs() < 1e-9);
    assert_eq!(view.kpis.total_stake, 300.0);
    assert!((view.kpis.roi - -1.59).abs() < 0.01);
    assert_eq!(view.by_category.len(), 2);
    assert_eq!(view.rows[0].date, "Jan 5, 2026");
}

#[tokio::test]
async fn unpublished_day_is_empty_not_an_error() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let src = DirSource::new(dir.path());

    assert!(load_day(&src, "2026-01-06").await.is_empty());

    let board = Board::new();
    let outcome = board
        .refresh(&src, LoadRequest::Day("2026-01-06".into()))
        .await;
    assert_eq!(outcome, Refresh::Applied { ticket: 1, picks: 0 });
    let view = board.view(&PickFilter::default());
    assert_eq!(render_table(&view.rows), format!("{}\n", EMPTY_STATE));
    assert_eq!(view.kpis.win_rate, 0.0);
    assert_eq!(view.kpis.roi, 0.0);
}

#[tokio::test]
async fn history_view_filters_and_sorts_newest_first() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let src = DirSource::new(dir.path());

    let picks = load_range(&src, "2026-01-04", "2026-01-08").await;
    assert_eq!(picks.len(), 4);

    let board = Board::new();
    board
        .refresh(
            &src,
            LoadRequest::Range {
                from: "2026-01-04".into(),
                to: "2026-01-08".into(),
            },
        )
        .await;

    let all = board.view(&PickFilter::default());
    assert_eq!(all.rows[0].date, "Jan 7, 2026");
    assert_eq!(all.rows[0].result, "Pending");
    assert_eq!(all.rows[0].profit, "$0.00");

    let team_only = board.view(&PickFilter {
        category: Some(Category::TeamModel),
        ..Default::default()
    });
    assert_eq!(team_only.rows.len(), 2);
    assert!(team_only.rows.iter().all(|r| r.category == "Team Model"));

    let windowed = board.view(&PickFilter {
        date_from: Some("2026-01-06".into()),
        date_to: Some("2026-01-07".into()),
        ..Default::default()
    });
    assert_eq!(windowed.rows.len(), 1);
    assert_eq!(windowed.rows[0].pick, "Magic -2.5");

    let wins = board.view(&PickFilter {
        result: Some(BetResult::Win),
        ..Default::default()
    });
    assert_eq!(wins.rows.len(), 1);
    assert_eq!(wins.rows[0].pick, "Jalen Brunson points over 27.5");
    assert_eq!(wins.rows[0].edge, "6.4%");
    assert_eq!(wins.rows[0].profit, "+$95.24");
    assert_eq!(wins.kpis.win_rate, 100.0);
}
