//! KPI text formatting.

/// Shown in a KPI slot whose metric is undefined.
pub const PLACEHOLDER: &str = "—";

/// Format an integer with a thousands separator: `45218` -> `45.218`.
pub fn format_count(value: usize, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// One-decimal percentage, e.g. `66.7%`.
pub fn format_percent(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.1}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// One-decimal value with a unit suffix, e.g. `2.8x`.
pub fn format_with_suffix(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(value) => format!("{value:.1}{suffix}"),
        None => PLACEHOLDER.to_string(),
    }
}
