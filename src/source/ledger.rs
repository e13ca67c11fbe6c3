use crate::error::SourceError;
use crate::models::{LedgerRecord, RawLedgerRow};
use crate::service::normalize::normalize_ledger_row;
use async_trait::async_trait;
use std::path::PathBuf;

/// Price/DOT reference data
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn fetch_ledger_records(&self) -> Result<Vec<LedgerRecord>, SourceError>;
}

/// Ledger exported from the price spreadsheet as CSV
pub struct CsvLedgerSource {
    path: PathBuf,
}

impl CsvLedgerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LedgerSource for CsvLedgerSource {
    async fn fetch_ledger_records(&self) -> Result<Vec<LedgerRecord>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_ledger_csv(&text)
    }
}

/// Header-keyed CSV; unknown columns are ignored, missing ones default to blank.
/// Rows that fail to decode are skipped.
pub fn parse_ledger_csv(text: &str) -> Result<Vec<LedgerRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    // header names are matched case-insensitively
    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    reader.set_headers(headers.clone());

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        match row.deserialize::<RawLedgerRow>(Some(&headers)) {
            Ok(raw) => records.push(normalize_ledger_row(raw)),
            Err(e) => tracing::debug!("Skipping ledger line {}: {}", line + 2, e),
        }
    }
    Ok(records)
}
