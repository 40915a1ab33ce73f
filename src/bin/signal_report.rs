use picksboard::data::parse_csv;
use picksboard::signals::{render_signal_performance, signal_performance};

fn read(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(err) => {
            eprintln!("failed to open {}: {}", path, err);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let signals_path = args
        .first()
        .cloned()
        .unwrap_or_else(|| "trackers/signal_performance.csv".to_string());
    let grades_path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "trackers/grade_performance.csv".to_string());

    let signals = parse_csv(&read(&signals_path));
    // a missing grade tracker only means no fallback results
    let grades = std::fs::read_to_string(&grades_path)
        .map(|t| parse_csv(&t))
        .unwrap_or_default();

    print!("{}", render_signal_performance(&signal_performance(&signals, &grades)));
}
