use serde::{Deserialize, Serialize};

use crate::pick::Category;

/// Columns the player-props export is expected to carry.
pub const PLAYER_PROPS_COLUMNS: [&str; 13] = [
    "date", "game", "player", "market", "bet", "line", "projection", "edge_pct", "book", "odds",
    "result", "stake", "profit",
];

/// Columns the team-model export is expected to carry.
pub const TEAM_MODEL_COLUMNS: [&str; 11] = [
    "date", "game", "pick", "proj", "line", "edge", "book", "odds", "result", "stake", "profit",
];

/// One parsed CSV row: header name -> raw string value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut rec = Self::new();
        for (k, v) in pairs {
            rec.insert(k, v);
        }
        rec
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for the first key present with a non-empty value.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// Lenient numeric view of a field; absent or unparsable is 0.0.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map(parse_number).unwrap_or(0.0)
    }

    /// Insert or overwrite a field.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split CSV text into header-keyed records.
///
/// The first non-blank line is the header. Each later line is split on
/// commas and zipped positionally against it: short rows get `""` for the
/// missing trailing fields, extra values are dropped. Quoted fields are not
/// supported; a comma always separates.
pub fn parse_csv(text: &str) -> Vec<Record> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let header: Vec<String> = match lines.next() {
        Some(line) => split_line(line),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let values = split_line(line);
            let mut rec = Record::new();
            for (i, name) in header.iter().enumerate() {
                let value = values.get(i).map(String::as_str).unwrap_or("");
                rec.insert(name, value);
            }
            rec
        })
        .collect()
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parse the longest numeric prefix of `raw` as a float.
///
/// `"+95.24"` -> 95.24, `"5.2%"` -> 5.2, `"-110"` -> -110.0. Anything without
/// a numeric prefix (including `""` and `"$5"`) is 0.0.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut last_good = 0;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
                last_good = end;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            b'e' | b'E' if seen_digit => {
                // exponent only counts if digits follow
                let mut exp_end = end + 1;
                if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
                    exp_end += 1;
                }
                let digits_start = exp_end;
                while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                    exp_end += 1;
                }
                if exp_end > digits_start {
                    last_good = exp_end;
                }
                break;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return 0.0;
    }
    s[..last_good]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// File name of a day's export: `<date>_player_props.csv` or `<date>_team_model.csv`.
pub fn csv_file_name(date: &str, category: Category) -> String {
    format!("{}_{}.csv", date, category.file_suffix())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub missing: Vec<String>,
    pub ok: bool,
    pub message: String,
}

/// Compare a header row against the columns expected for `category`.
///
/// Informational only: loading proceeds regardless, absent fields render as
/// placeholders.
pub fn validate_schema(header: &[String], category: Category) -> SchemaReport {
    let expected: &[&str] = match category {
        Category::PlayerProp => &PLAYER_PROPS_COLUMNS,
        Category::TeamModel => &TEAM_MODEL_COLUMNS,
    };
    let missing: Vec<String> = expected
        .iter()
        .filter(|col| !header.iter().any(|h| h == *col))
        .map(|s| s.to_string())
        .collect();
    let ok = missing.is_empty();
    let message = if ok {
        "schema ok".to_string()
    } else {
        format!("missing columns: {}", missing.join(","))
    };
    SchemaReport {
        columns: header.to_vec(),
        missing,
        ok,
        message,
    }
}
