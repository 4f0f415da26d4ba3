//! Season labels and their date windows.
//!
//! A season label is `"<Name> <4-digit year>"` with Name one of `Spring`
//! or `Fall`. Anything else resolves to "no filter" rather than an error:
//! an unrecognized label widens the query to all results instead of
//! failing the request.

use chrono::NaiveDate;

/// Inclusive date interval covered by a season label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolve a season label to its date window.
///
/// Spring runs January through June, Fall runs July through December.
/// Returns `None` for `None`, malformed labels, unknown season names and
/// non-numeric years (fail-open by design, see DESIGN.md).
pub fn resolve(label: Option<&str>) -> Option<SeasonWindow> {
    let label = label?;
    let tokens: Vec<&str> = label.split_whitespace().collect();
    if tokens.len() != 2 {
        return None;
    }

    let year: i32 = tokens[1].parse().ok()?;
    if tokens[1].len() != 4 {
        return None;
    }

    let (start, end) = match tokens[0] {
        "Spring" => (
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 6, 30)?,
        ),
        "Fall" => (
            NaiveDate::from_ymd_opt(year, 7, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ),
        _ => return None,
    };

    Some(SeasonWindow { start, end })
}
