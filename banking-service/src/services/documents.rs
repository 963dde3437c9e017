//! Downloadable statement documents.

use csv::WriterBuilder;
use serde::Serialize;
use service_core::error::AppError;

use crate::models::{Statement, StatementFormat};
use crate::services::generator::{MockDataGenerator, StatementLine};

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Balance")]
    balance: String,
}

impl<'a> From<&'a StatementLine> for CsvRow<'a> {
    fn from(line: &'a StatementLine) -> Self {
        Self {
            date: line.date.format("%Y-%m-%d").to_string(),
            description: &line.description,
            amount: format!("{:.2}", line.amount),
            balance: format!("{:.2}", line.balance),
        }
    }
}

/// `attachment; filename="statement-<id>.<ext>"`
pub fn content_disposition(statement: &Statement, format: StatementFormat) -> String {
    format!(
        "attachment; filename=\"statement-{}.{}\"",
        statement.statement_id,
        format.extension()
    )
}

pub fn render(statement: &Statement, format: StatementFormat) -> Result<Vec<u8>, AppError> {
    let lines = MockDataGenerator::statement_lines(statement);
    match format {
        StatementFormat::Csv => render_csv(&lines),
        StatementFormat::Pdf => Ok(render_pdf(statement, &lines)),
    }
}

fn render_csv(lines: &[StatementLine]) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for line in lines {
        writer
            .serialize(CsvRow::from(line))
            .map_err(|err| AppError::InternalError(err.into()))?;
    }
    // Header row even when there are no lines.
    if lines.is_empty() {
        writer
            .write_record(["Date", "Description", "Amount", "Balance"])
            .map_err(|err| AppError::InternalError(err.into()))?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::InternalError(anyhow::anyhow!("Failed to flush CSV: {err}")))
}

/// Placeholder document; clients only check headers and that bytes arrive.
fn render_pdf(statement: &Statement, lines: &[StatementLine]) -> Vec<u8> {
    let mut body = format!(
        "%PDF-1.4\n% Mock PDF content for statement {}\n% Account {} period {} to {}\n",
        statement.statement_id,
        statement.account_id,
        statement.period.start_date,
        statement.period.end_date,
    );
    for line in lines {
        body.push_str(&format!(
            "% {} {} {:.2} {:.2}\n",
            line.date, line.description, line.amount, line.balance
        ));
    }
    body.push_str("%%EOF\n");
    body.into_bytes()
}
