use anyhow::{anyhow, Result};
use chrono::Local;
use serde_json::json;

use picksboard::feed::loader::parse_day;
use picksboard::filter::PickFilter;
use picksboard::logging::{log, obj, v_str, Domain, Level};
use picksboard::pick::{BetResult, Category};
use picksboard::render::{render_category_kpis, render_kpis, render_table};
use picksboard::state::{Board, Config, LoadRequest, Refresh};

const USAGE: &str = "usage:
  picksboard day [DATE] [filters]
  picksboard history FROM TO [filters]

filters:
  --from DATE --to DATE      inclusive YYYY-MM-DD bounds
  --category props|team
  --result win|loss|push|pending|in_progress|final|graded
  --json                     print rows and KPIs as JSON";

fn day_arg(flag: &str, raw: String) -> Result<String> {
    match parse_day(&raw) {
        Some(_) => Ok(raw),
        None => Err(anyhow!("{} expects YYYY-MM-DD, got {}", flag, raw)),
    }
}

struct Args {
    request: LoadRequest,
    filter: PickFilter,
    json: bool,
}

fn parse_args(argv: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut filter = PickFilter::default();
    let mut json = false;

    let mut it = argv.iter();
    while let Some(arg) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} needs a value", name))
        };
        match arg.as_str() {
            "--from" => filter.date_from = Some(day_arg("--from", value("--from")?)?),
            "--to" => filter.date_to = Some(day_arg("--to", value("--to")?)?),
            "--category" => {
                let raw = value("--category")?;
                filter.category =
                    Some(Category::parse(&raw).ok_or_else(|| anyhow!("unknown category {}", raw))?);
            }
            "--result" => {
                let raw = value("--result")?;
                filter.result =
                    Some(BetResult::from_filter(&raw).ok_or_else(|| anyhow!("unknown result {}", raw))?);
            }
            "--json" => json = true,
            "-h" | "--help" => return Err(anyhow!("help")),
            flag if flag.starts_with("--") => return Err(anyhow!("unknown flag {}", flag)),
            _ => positional.push(arg.clone()),
        }
    }

    let today = || Local::now().format("%Y-%m-%d").to_string();
    let request = match positional.first().map(String::as_str) {
        None | Some("day") => match positional.get(1) {
            Some(date) => LoadRequest::Day(day_arg("day", date.clone())?),
            None => LoadRequest::Day(today()),
        },
        Some("history") => match (positional.get(1), positional.get(2)) {
            (Some(from), Some(to)) => LoadRequest::Range {
                from: day_arg("FROM", from.clone())?,
                to: day_arg("TO", to.clone())?,
            },
            _ => return Err(anyhow!("history needs FROM and TO")),
        },
        Some(other) => return Err(anyhow!("unknown command {}", other)),
    };

    Ok(Args {
        request,
        filter,
        json,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(err) => {
            if err.to_string() != "help" {
                eprintln!("{}", err);
            }
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let cfg = Config::from_env();
    let source = cfg.source()?;
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("source", v_str(&source.describe())),
            ("request", v_str(&format!("{:?}", args.request))),
        ]),
    );

    let board = Board::new();
    if let Refresh::Stale { ticket, current } = board.refresh(source.as_ref(), args.request).await {
        // single refresh per run; only reachable if something else refreshed concurrently
        return Err(anyhow!("refresh {} superseded by {}", ticket, current));
    }

    let view = board.view(&args.filter);
    if args.json {
        let by_category: Vec<_> = view
            .by_category
            .iter()
            .map(|(cat, k)| json!({ "category": cat, "kpis": k }))
            .collect();
        let payload = json!({
            "rows": view.rows,
            "kpis": view.kpis,
            "by_category": by_category,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print!("{}", render_table(&view.rows));
    println!();
    println!("{}", render_kpis("All picks", &view.kpis));
    if view.by_category.len() > 1 {
        println!("{}", render_category_kpis(&view.by_category));
    }
    Ok(())
}
