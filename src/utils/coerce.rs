//! Value coercion for locale-formatted spreadsheet cells
//!
//! Statistical exports mix `1.234,5`, `12,5%`, `1 234` and plain numbers in
//! the same column. Conversion never fails loudly: anything unparseable is
//! `None` and the caller decides what a missing value means.

use crate::data::Cell;
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(19|20)\d{2}").expect("year pattern is a valid regex")
});

const MIN_YEAR: i64 = 1900;
const MAX_YEAR: i64 = 2100;

/// Convert a cell to a number
///
/// Separator rules:
/// - both `,` and `.` present: `.` is a thousands separator, `,` the decimal point
/// - only `,` present: decimal point
///
/// `%` is stripped without rescaling.
pub fn to_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(v) => Some(*v),
        Cell::Text(s) => parse_number(s),
    }
}

/// String form of [`to_number`]
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .replace('%', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let canonical = if cleaned.contains(',') && cleaned.contains('.') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.replace(',', ".")
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extract a 4-digit year from a cell
///
/// Numeric cells count when they round into [1900, 2100]; otherwise the
/// first `19xx`/`20xx` run in the text form is used.
pub fn extract_year(cell: &Cell) -> Option<i32> {
    if let Cell::Number(v) = cell {
        let rounded = v.round();
        if rounded >= MIN_YEAR as f64 && rounded <= MAX_YEAR as f64 {
            return Some(rounded as i32);
        }
    }
    let text = cell.as_text();
    YEAR_PATTERN
        .find(&text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_locale_separators() {
        assert_relative_eq!(to_number(&text("1.234,5")).unwrap(), 1234.5);
        assert_relative_eq!(to_number(&text("12,5")).unwrap(), 12.5);
        assert_relative_eq!(to_number(&text("3.75")).unwrap(), 3.75);
        assert_relative_eq!(to_number(&text("1\u{00A0}234")).unwrap(), 1234.0);
    }

    #[test]
    fn test_percent_is_decoration() {
        assert_relative_eq!(to_number(&text("12,5%")).unwrap(), 12.5);
        assert_relative_eq!(to_number(&text(" -3 % ")).unwrap(), -3.0);
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(to_number(&text("n/a")), None);
        assert_eq!(to_number(&text("%")), None);
        assert_eq!(to_number(&Cell::Empty), None);
    }

    #[test]
    fn test_numeric_passthrough() {
        assert_eq!(to_number(&Cell::Number(42.0)), Some(42.0));
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year(&Cell::Number(2023.0)), Some(2023));
        assert_eq!(extract_year(&Cell::Number(2022.6)), Some(2023));
        assert_eq!(extract_year(&text("2021 yılı")), Some(2021));
        assert_eq!(extract_year(&text("Yıl: 1998 (revize)")), Some(1998));
        assert_eq!(extract_year(&Cell::Number(1850.0)), None);
        assert_eq!(extract_year(&text("toplam")), None);
        assert_eq!(extract_year(&Cell::Empty), None);
    }
}
