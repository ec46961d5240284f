//! Picking the Länge value out of detected tables.

use crate::types::Table;

/// Whether `s` is a non-negative decimal: ASCII digits with at most one `.`.
pub fn is_numeric(s: &str) -> bool {
    let digits = s.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Reduce a cell to its first line, with `,` read as the decimal separator.
///
/// ```
/// assert_eq!(pdf_lange::normalize_cell("12,5\nextra"), "12.5");
/// ```
pub fn normalize_cell(cell: &str) -> String {
    cell.split('\n')
        .next()
        .unwrap_or_default()
        .replace(',', ".")
        .trim()
        .to_owned()
}

/// The last numeric value in the first column of all tables.
///
/// Tables are visited in order and their first-column cells top to bottom.
/// The first cell of each table is taken as a header and skipped unless it
/// is already numeric as written.
pub fn last_lange(tables: &[Table]) -> Option<f64> {
    let mut last = None;

    for table in tables {
        for (idx, cell) in table.column(0).enumerate() {
            if idx == 0 && !is_numeric(cell) {
                continue;
            }
            let value = normalize_cell(cell);
            if is_numeric(&value) {
                if let Ok(number) = value.parse::<f64>() {
                    last = Some(number);
                }
            }
        }
    }

    last
}

/// Format a value the way the report prints floats: shortest round-trip
/// digits, integral values with one decimal (`120.0`), and exponent form
/// (`1e+16`, `1.5e-07`) below `1e-4` or from `1e16` on.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0. { "inf" } else { "-inf" }.to_owned();
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if value != 0. && !(-4..16).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }

    if value.fract() == 0. {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
