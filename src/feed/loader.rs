//! Turns source reads into picks.
//!
//! Loading never fails: a missing export is an empty day, and any other
//! failure is logged and also treated as empty.

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use serde_json::json;

use crate::data::{csv_file_name, parse_csv, validate_schema, Record};
use crate::feed::{Fetched, Source};
use crate::logging::{log, log_load, obj, v_str, Domain, Level};
use crate::pick::{Category, Pick};

/// Upper bound on days fetched by one history load.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Days loaded at once by a history load; each day is two reads.
pub const RANGE_CONCURRENCY: usize = 8;

/// Read and parse one CSV. Returns no records when absent or on any error.
pub async fn load_csv(source: &dyn Source, path: &str) -> Vec<Record> {
    match source.read(path).await {
        Ok(Fetched::Found(text)) => {
            let records = parse_csv(&text);
            log_load(path, "found", records.len());
            records
        }
        Ok(Fetched::NotFound) => {
            log_load(path, "not_found", 0);
            Vec::new()
        }
        Err(err) => {
            log(
                Level::Warn,
                Domain::Load,
                "csv_load_failed",
                obj(&[
                    ("path", v_str(path)),
                    ("source", v_str(&source.describe())),
                    ("msg", v_str(&err.to_string())),
                ]),
            );
            Vec::new()
        }
    }
}

async fn load_category(source: &dyn Source, date: &str, category: Category) -> Vec<Record> {
    let path = csv_file_name(date, category);
    let records = load_csv(source, &path).await;
    if let Some(first) = records.first() {
        let header: Vec<String> = first.keys().map(str::to_string).collect();
        let report = validate_schema(&header, category);
        if !report.ok {
            log(
                Level::Debug,
                Domain::Parse,
                "schema_mismatch",
                obj(&[("path", v_str(&path)), ("msg", v_str(&report.message))]),
            );
        }
    }
    records
}

/// Load both exports for `date`. The two reads run concurrently and fail
/// independently; player props come first, then team-model picks.
pub async fn load_day(source: &dyn Source, date: &str) -> Vec<Pick> {
    let (props, team) = tokio::join!(
        load_category(source, date, Category::PlayerProp),
        load_category(source, date, Category::TeamModel),
    );
    let mut picks = Vec::with_capacity(props.len() + team.len());
    tag_into(&mut picks, props, Category::PlayerProp, date);
    tag_into(&mut picks, team, Category::TeamModel, date);
    picks
}

fn tag_into(out: &mut Vec<Pick>, records: Vec<Record>, category: Category, date: &str) {
    for record in records {
        let mut pick = Pick::new(out.len(), category, record);
        pick.assign_date_if_missing(date);
        out.push(pick);
    }
}

/// Parse a zero-padded `YYYY-MM-DD` day.
///
/// chrono alone accepts `2026-1-5`; such values break lexicographic date
/// comparison, so anything that does not round-trip exactly is rejected.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|d| d.format("%Y-%m-%d").to_string() == raw)
}

/// Every date from `from` through `to` inclusive, as `YYYY-MM-DD`.
///
/// Empty when either bound is malformed, `to` precedes `from`, or the span
/// exceeds [`MAX_RANGE_DAYS`].
pub fn dates_between(from: &str, to: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (parse_day(from), parse_day(to)) else {
        return Vec::new();
    };
    let span = (end - start).num_days();
    if span < 0 || span >= MAX_RANGE_DAYS {
        return Vec::new();
    }
    start
        .iter_days()
        .take(span as usize + 1)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

/// Load every day in `[from, to]` and concatenate in date order.
///
/// At most [`RANGE_CONCURRENCY`] days are in flight at once.
pub async fn load_range(source: &dyn Source, from: &str, to: &str) -> Vec<Pick> {
    let dates = dates_between(from, to);
    if dates.is_empty() {
        log(
            Level::Warn,
            Domain::Load,
            "empty_range",
            obj(&[("from", v_str(from)), ("to", v_str(to))]),
        );
        return Vec::new();
    }

    let days: Vec<Vec<Pick>> = stream::iter(dates.iter().map(|d| load_day(source, d)))
        .buffered(RANGE_CONCURRENCY)
        .collect()
        .await;
    let mut picks: Vec<Pick> = days.into_iter().flatten().collect();
    for (i, pick) in picks.iter_mut().enumerate() {
        pick.index = i;
    }
    log(
        Level::Info,
        Domain::Load,
        "range_loaded",
        obj(&[
            ("from", v_str(from)),
            ("to", v_str(to)),
            ("days", json!(dates.len())),
            ("picks", json!(picks.len())),
        ]),
    );
    picks
}
