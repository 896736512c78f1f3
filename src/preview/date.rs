/// Calendar formatting for the certificate date line

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the ISO date is displayed on the certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// "May 1, 2024"
    #[default]
    Long,
    /// "01/05/2024"
    Short,
}

impl FromStr for DateStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(DateStyle::Long),
            "short" => Ok(DateStyle::Short),
            other => Err(format!("unknown date style '{}'", other)),
        }
    }
}

/// Format an ISO `YYYY-MM-DD` string for display.
///
/// Strings that are not ISO dates are returned unchanged, so a value is
/// never formatted twice into something else.
pub fn format_date(iso: &str, style: DateStyle) -> String {
    let Ok(date) = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") else {
        return iso.to_string();
    };
    match style {
        DateStyle::Long => date.format("%B %-d, %Y").to_string(),
        DateStyle::Short => date.format("%d/%m/%Y").to_string(),
    }
}
