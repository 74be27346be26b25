use crate::text_metrics;

const ELLIPSIS: &str = "…";

pub(super) fn char_width_factor(ch: char) -> f32 {
    // Per-character widths of the default sans-serif stack, in em.
    match ch {
        ' ' => 0.278,
        '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.278,
        '(' | ')' | '[' | ']' | '{' | '}' | '-' => 0.333,
        'I' | 'i' | 'j' | 'l' => 0.222,
        'f' | 't' | 'r' => 0.333,
        'M' | 'W' => 0.833,
        'm' | 'w' => 0.777,
        'A'..='Z' => 0.667,
        'a'..='z' => 0.540,
        '0'..='9' => 0.556,
        '@' | '%' => 0.889,
        '#' | '&' => 0.667,
        _ => 0.600,
    }
}

pub(crate) fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics && text.is_ascii() {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// `text` cut down with a trailing ellipsis until it fits `max_width`.
/// Returns an empty string when not even the ellipsis fits.
pub(crate) fn truncate_to_width(
    text: &str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
    fast_metrics: bool,
) -> String {
    if text_width(text, font_size, font_family, fast_metrics) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let candidate: String = chars[..keep].iter().collect::<String>() + ELLIPSIS;
        if text_width(&candidate, font_size, font_family, fast_metrics) <= max_width {
            return candidate;
        }
    }
    String::new()
}
