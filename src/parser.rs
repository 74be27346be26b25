use crate::error::{InputError, Result};
use crate::ir::{CategoryColumn, ChordTable, SeriesColumn, ValueColumn};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\s*(?P<key>[A-Za-z]+)\s*:\s*(?P<value>.*?)\s*$").unwrap());
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$").unwrap());

const MIN_COLUMNS: usize = 3;

/// Reads either a JSON table or delimited `From,To,Value[,Highlight]` rows.
pub fn parse_input(input: &str) -> Result<ChordTable> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        parse_table_json(trimmed)
    } else {
        parse_delimited(input)
    }
}

pub fn parse_table_json(input: &str) -> Result<ChordTable> {
    Ok(serde_json::from_str(input)?)
}

/// Delimited rows, one flow per line.
///
/// The delimiter is a tab, semicolon or comma, picked from the first row.
/// A first row whose value cell is not numeric is a header naming the
/// columns. `%% format: <pattern>` and `%% categoryFormat: <pattern>` lines
/// set number formats; other `%%` and `#` lines are comments. Repeated
/// (from, to) pairs are summed.
pub fn parse_delimited(input: &str) -> Result<ChordTable> {
    let mut category = CategoryColumn::default();
    let mut series = SeriesColumn {
        display_name: "To".to_string(),
        format: None,
    };
    category.display_name = "From".to_string();
    let mut value_name = "Value".to_string();
    let mut value_format: Option<String> = None;

    let mut delimiter: Option<char> = None;
    let mut seen_rows = false;
    let mut rows: Vec<FlowRow> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("%%") {
            if let Some(caps) = DIRECTIVE_RE.captures(line) {
                let value = caps["value"].to_string();
                match &caps["key"] {
                    "format" => value_format = Some(value),
                    "categoryFormat" => category.format = Some(value),
                    _ => {}
                }
            }
            continue;
        }

        let delim = *delimiter.get_or_insert_with(|| detect_delimiter(line));
        let fields = split_fields(line, delim);
        if fields.len() < MIN_COLUMNS {
            return Err(InputError::RowShape {
                line: line_no,
                expected: MIN_COLUMNS,
                found: fields.len(),
            });
        }

        if !seen_rows {
            seen_rows = true;
            if !fields[2].is_empty() && !is_number(&fields[2]) {
                category.display_name = fields[0].clone();
                series.display_name = fields[1].clone();
                value_name = fields[2].clone();
                continue;
            }
        }

        rows.push(FlowRow {
            from: fields[0].clone(),
            to: fields[1].clone(),
            value: parse_cell(&fields[2], line_no)?,
            highlight: match fields.get(3) {
                Some(cell) => Some(parse_cell(cell, line_no)?),
                None => None,
            },
        });
    }

    if rows.is_empty() {
        return Err(InputError::Empty);
    }

    let has_highlights = rows.iter().any(|row| row.highlight.is_some());
    let mut categories: IndexMap<String, usize> = IndexMap::new();
    for row in &rows {
        let next = categories.len();
        categories.entry(row.from.clone()).or_insert(next);
    }
    let row_count = categories.len();

    let mut columns: IndexMap<String, ValueColumn> = IndexMap::new();
    for row in &rows {
        let column = columns.entry(row.to.clone()).or_insert_with(|| ValueColumn {
            series: Some(row.to.clone()),
            display_name: value_name.clone(),
            format: value_format.clone(),
            values: vec![None; row_count],
            highlights: has_highlights.then(|| vec![None; row_count]),
            fill: None,
        });
        let Some(&row_idx) = categories.get(&row.from) else {
            continue;
        };
        accumulate(&mut column.values[row_idx], row.value);
        if let (Some(highlights), Some(value)) = (column.highlights.as_mut(), row.highlight) {
            accumulate(&mut highlights[row_idx], value);
        }
    }

    category.values = categories.into_keys().map(Some).collect();
    tracing::debug!(
        rows = rows.len(),
        categories = category.values.len(),
        series = columns.len(),
        "parsed delimited flows"
    );

    Ok(ChordTable {
        category,
        series: Some(series),
        values: columns.into_values().collect(),
    })
}

struct FlowRow {
    from: String,
    to: String,
    value: Option<f64>,
    highlight: Option<Option<f64>>,
}

fn accumulate(slot: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value {
        *slot = Some(slot.unwrap_or(0.0) + value);
    }
}

fn detect_delimiter(line: &str) -> char {
    if line.contains('\t') {
        '\t'
    } else if line.contains(';') && !line.contains(',') {
        ';'
    } else {
        ','
    }
}

fn is_number(cell: &str) -> bool {
    NUMBER_RE.is_match(cell)
}

/// Blank cells are missing values.
fn parse_cell(cell: &str, line: usize) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    if !is_number(cell) {
        return Err(InputError::NotANumber {
            line,
            text: cell.to_string(),
        });
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| InputError::NotANumber {
            line,
            text: cell.to_string(),
        })
}

/// Splits on `delimiter` outside quotes and strips the quotes.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in line.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            } else {
                current.push(ch);
            }
            continue;
        }
        if (ch == '"' || ch == '\'') && current.trim().is_empty() {
            current.clear();
            quote = Some(ch);
            continue;
        }
        if ch == delimiter {
            fields.push(current.trim().to_string());
            current.clear();
            continue;
        }
        current.push(ch);
    }
    fields.push(current.trim().to_string());
    fields
}
