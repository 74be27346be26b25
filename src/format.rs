use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<int>[#0,]*)(?:\.(?P<frac>[0#]*))?(?P<pct>%)?$").expect("format regex")
});

pub const BLANK_LABEL: &str = "(Blank)";
const GENERAL_MAX_DECIMALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayUnit {
    None,
    Thousands,
    Millions,
    Billions,
    Trillions,
}

impl DisplayUnit {
    /// Unit a reference magnitude should be displayed in.
    pub fn for_value(reference: f64) -> Self {
        let magnitude = reference.abs();
        if !magnitude.is_finite() || magnitude < 1e3 {
            DisplayUnit::None
        } else if magnitude < 1e6 {
            DisplayUnit::Thousands
        } else if magnitude < 1e9 {
            DisplayUnit::Millions
        } else if magnitude < 1e12 {
            DisplayUnit::Billions
        } else {
            DisplayUnit::Trillions
        }
    }

    fn divisor(self) -> f64 {
        match self {
            DisplayUnit::None => 1.0,
            DisplayUnit::Thousands => 1e3,
            DisplayUnit::Millions => 1e6,
            DisplayUnit::Billions => 1e9,
            DisplayUnit::Trillions => 1e12,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            DisplayUnit::None => "",
            DisplayUnit::Thousands => "K",
            DisplayUnit::Millions => "M",
            DisplayUnit::Billions => "bn",
            DisplayUnit::Trillions => "T",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NumberFormat {
    General,
    Pattern {
        grouping: bool,
        min_decimals: usize,
        max_decimals: usize,
        percent: bool,
    },
}

impl NumberFormat {
    fn parse(format: Option<&str>) -> Self {
        let Some(format) = format.map(str::trim).filter(|format| !format.is_empty()) else {
            return NumberFormat::General;
        };
        if format.eq_ignore_ascii_case("general") {
            return NumberFormat::General;
        }
        let Some(caps) = NUMBER_FORMAT_RE.captures(format) else {
            return NumberFormat::General;
        };
        let int = caps.name("int").map(|m| m.as_str()).unwrap_or("");
        let frac = caps.name("frac").map(|m| m.as_str()).unwrap_or("");
        if int.is_empty() && frac.is_empty() {
            return NumberFormat::General;
        }
        NumberFormat::Pattern {
            grouping: int.contains(','),
            min_decimals: frac.chars().filter(|ch| *ch == '0').count(),
            max_decimals: frac.len(),
            percent: caps.name("pct").is_some(),
        }
    }
}

/// Formats numbers from a host format string (`0`, `0.##`, `#,0.00`,
/// `0%`), optionally scaled to a display unit.
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    format: NumberFormat,
    unit: DisplayUnit,
}

impl ValueFormatter {
    pub fn new(format: Option<&str>) -> Self {
        Self {
            format: NumberFormat::parse(format),
            unit: DisplayUnit::None,
        }
    }

    /// Formatter whose display unit is derived from `reference`, typically
    /// the largest value that will go through it.
    pub fn with_display_units(format: Option<&str>, reference: f64) -> Self {
        Self {
            format: NumberFormat::parse(format),
            unit: DisplayUnit::for_value(reference),
        }
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }
        let scaled = value / self.unit.divisor();
        let body = match &self.format {
            NumberFormat::General => format_fixed(scaled, 0, GENERAL_MAX_DECIMALS, false),
            NumberFormat::Pattern {
                grouping,
                min_decimals,
                max_decimals,
                percent,
            } => {
                let scaled = if *percent { scaled * 100.0 } else { scaled };
                let text = format_fixed(scaled, *min_decimals, *max_decimals, *grouping);
                if *percent { format!("{text}%") } else { text }
            }
        };
        format!("{}{}", body, self.unit.suffix())
    }

    /// Category or series label. Numeric labels go through the pattern
    /// when one is set; text is shown as is.
    pub fn format_label(&self, label: Option<&str>) -> String {
        let Some(label) = label else {
            return BLANK_LABEL.to_string();
        };
        if matches!(self.format, NumberFormat::Pattern { .. })
            && let Ok(value) = label.trim().parse::<f64>()
            && value.is_finite()
        {
            return self.format(value);
        }
        label.to_string()
    }
}

fn format_fixed(value: f64, min_decimals: usize, max_decimals: usize, grouping: bool) -> String {
    let mut text = format!("{:.*}", max_decimals, value);
    if max_decimals > min_decimals && text.contains('.') {
        let keep_from = text.find('.').map(|dot| dot + 1 + min_decimals).unwrap_or(text.len());
        while text.len() > keep_from && text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    let negative = text.starts_with('-');
    let digits = text.trim_start_matches('-');
    let (int_part, frac_part) = match digits.find('.') {
        Some(dot) => (&digits[..dot], &digits[dot..]),
        None => (digits, ""),
    };
    let int_part = if grouping {
        group_thousands(int_part)
    } else {
        int_part.to_string()
    };
    let is_zero = int_part.chars().all(|ch| ch == '0' || ch == ',')
        && frac_part.chars().all(|ch| ch == '0' || ch == '.');
    let sign = if negative && !is_zero { "-" } else { "" };
    format!("{sign}{int_part}{frac_part}")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
