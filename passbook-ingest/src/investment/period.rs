use anyhow::Result;
use chrono::NaiveDate;
use passbook_core::StatementPeriod;
use regex::Regex;

const PERIOD_PATTERN: &str =
    r"(?i)statement for the period from (\d{2}-[A-Za-z]{3}-\d{4}) to (\d{2}-[A-Za-z]{3}-\d{4})";

/// Find the statement period; both ends become ISO dates, or both stay raw if
/// either one fails to parse.
pub fn parse_statement_period(text: &str) -> Result<StatementPeriod> {
    let period_re = Regex::new(PERIOD_PATTERN)?;

    let Some(caps) = period_re.captures(text) else {
        return Ok(StatementPeriod::default());
    };
    let (start, end) = (&caps[1], &caps[2]);

    let parsed = NaiveDate::parse_from_str(start, "%d-%b-%Y")
        .and_then(|s| NaiveDate::parse_from_str(end, "%d-%b-%Y").map(|e| (s, e)));

    Ok(match parsed {
        Ok((s, e)) => StatementPeriod {
            start: Some(s.format("%Y-%m-%d").to_string()),
            end: Some(e.format("%Y-%m-%d").to_string()),
        },
        Err(_) => StatementPeriod {
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        },
    })
}
