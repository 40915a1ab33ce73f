use picksboard::logging::{log, obj, v_num, v_str, Domain, Level};
use picksboard::signals::Grade;
use picksboard::sizing::{
    edge_pct, grade_adjusted_units, implied_probability, kelly_fraction, parse_odds, SizingConfig,
};
use picksboard::state::Config;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("usage: kelly PROB ODDS [GRADE]   (PROB in 0..1, ODDS as -110 or 1.91)");
        std::process::exit(2);
    }

    let prob: f64 = match args[0].parse() {
        Ok(p) if (0.0..=1.0).contains(&p) => p,
        _ => {
            eprintln!("bad probability {}", args[0]);
            std::process::exit(2);
        }
    };
    let odds = match parse_odds(&args[1]) {
        Some(o) => o,
        None => {
            eprintln!("bad odds {}", args[1]);
            std::process::exit(2);
        }
    };
    let grade = match args.get(2) {
        None => Grade::A,
        Some(raw) => match Grade::parse(raw) {
            Some(g) => g,
            None => {
                eprintln!("bad grade {} (expected A, B or C)", raw);
                std::process::exit(2);
            }
        },
    };

    let cfg = SizingConfig::from_config(&Config::from_env());
    let full = kelly_fraction(prob, odds, 1.0);
    let frac = kelly_fraction(prob, odds, cfg.fraction);
    let units = grade_adjusted_units(grade, prob, odds, &cfg);

    println!(
        "p={:.1}% odds={:.3} implied={:.1}% edge={:.2}%",
        prob * 100.0,
        odds,
        implied_probability(odds) * 100.0,
        edge_pct(prob, odds)
    );
    println!(
        "full kelly={:.3}% | {:.2}x kelly={:.3}% | grade {} -> {}u (${:.2} of ${:.2})",
        full * 100.0,
        cfg.fraction,
        frac * 100.0,
        grade,
        units,
        units * cfg.unit_size,
        cfg.bankroll
    );

    log(
        Level::Debug,
        Domain::Sizing,
        "kelly",
        obj(&[
            ("prob", v_num(prob)),
            ("odds", v_num(odds)),
            ("grade", v_str(&grade.to_string())),
            ("units", v_num(units)),
        ]),
    );
}
