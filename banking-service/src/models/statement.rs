use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{query::Filterable, store::Entity};

code_enum! {
    pub enum StatementFormat {
        Pdf => "PDF",
        Csv => "CSV",
    }
}

code_enum! {
    pub enum StatementStatus {
        Available => "AVAILABLE",
        Generating => "GENERATING",
    }
}

impl StatementFormat {
    /// Parse the `format` query value, which is case-insensitive.
    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StatementPeriod {
    /// The calendar month `year`-`month`, first to last day inclusive.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start_date = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start_date,
            end_date: next_month.pred_opt()?,
        })
    }

    /// The calendar month `months_back` months before the one containing `date`.
    pub fn months_before(date: NaiveDate, months_back: u32) -> Option<Self> {
        let index = date.year() * 12 + date.month0() as i32 - months_back as i32;
        Self::month(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub statement_id: String,
    pub account_id: String,
    pub period: StatementPeriod,
    pub generated_date: DateTime<Utc>,
    pub format: StatementFormat,
    /// Document size in bytes.
    pub size: u64,
    pub status: StatementStatus,
}

impl Entity for Statement {
    const KIND: &'static str = "statement";

    fn id(&self) -> &str {
        &self.statement_id
    }
}

impl Filterable for Statement {
    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "accountId" => Some(&self.account_id),
            "status" => Some(self.status.as_str()),
            "format" => Some(self.format.as_str()),
            _ => None,
        }
    }

    fn event_date(&self) -> Option<NaiveDate> {
        Some(self.period.start_date)
    }

    fn sort_key(&self) -> Option<DateTime<Utc>> {
        self.period
            .start_date
            .and_hms_opt(0, 0, 0)
            .map(|start| start.and_utc())
    }
}
