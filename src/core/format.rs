use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Locale used for grouped number labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NumberLocale {
    #[default]
    EnUs,
    EsEs,
}

impl NumberLocale {
    const fn separators(self) -> (char, char) {
        match self {
            Self::EnUs => (',', '.'),
            Self::EsEs => ('.', ','),
        }
    }

    /// Shortest integer part that receives group separators.
    const fn min_grouping_digits(self) -> usize {
        match self {
            Self::EnUs => 4,
            // es-ES leaves four-digit integers ungrouped.
            Self::EsEs => 5,
        }
    }
}

const MAX_FRACTION_DIGITS: usize = 3;

/// Formats a number with locale grouping and at most three fraction digits.
#[must_use]
pub fn format_grouped(value: f64, locale: NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_owned();
    }

    let text = format!("{:.prec$}", value.abs(), prec = MAX_FRACTION_DIGITS);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let (group_sep, decimal_sep) = locale.separators();

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    if int_part.len() >= locale.min_grouping_digits() {
        push_grouped_digits(&mut out, int_part, group_sep);
    } else {
        out.push_str(int_part);
    }
    if !frac_part.is_empty() {
        out.push(decimal_sep);
        out.push_str(frac_part);
    }
    out
}

fn push_grouped_digits(out: &mut String, digits: &str, separator: char) {
    let len = digits.len();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
}

/// Text shown in a table cell for one field value.
///
/// Absent and `null` fields are blank; numbers are grouped.
#[must_use]
pub fn display_value(value: Option<&Value>, locale: NumberLocale) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(|v| format_grouped(v, locale))
            .unwrap_or_else(|| number.to_string()),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_value(Some(item), locale))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_owned(),
    }
}

/// Stringifies a configuration value the way a host document stores it as an
/// attribute: arrays are comma-joined, numbers use their shortest form.
#[must_use]
pub fn attribute_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_string(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => attribute_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn number_string(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(int) = number.as_u64() {
        return int.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => format!("{}", float as i64),
        Some(float) => format!("{float}"),
        None => number.to_string(),
    }
}
