//! Labeled message dataset loading
//!
//! Reads the `Category,Message` CSV export. When no file is present the
//! trainer falls back to a small synthetic corpus so the pipeline can be
//! exercised without external data.

use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, SpamError};
use crate::types::{Category, Record};

const CATEGORY_COLUMN: &str = "Category";
const MESSAGE_COLUMN: &str = "Message";

/// Distinct messages of the synthetic corpus, in row order
const SYNTHETIC_MESSAGES: [(Category, &str); 5] = [
    (Category::Ham, "Hello, how are you?"),
    (Category::Spam, "Win a free lottery now!"),
    (Category::Ham, "Meeting at 3 PM"),
    (Category::Spam, "Click here to claim your prize"),
    (Category::Ham, "Can we talk later?"),
];

const SYNTHETIC_REPEATS: usize = 20;

/// Load a dataset from a CSV file with `Category` and `Message` headers
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())?;
    read_records(reader)
}

/// Parse CSV content already held in memory
pub fn parse_csv(content: &str) -> Result<Vec<Record>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    read_records(reader)
}

fn read_records<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>> {
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| SpamError::Dataset(format!("missing column '{}'", name)))
    };
    let category_idx = column(CATEGORY_COLUMN)?;
    let message_idx = column(MESSAGE_COLUMN)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let category_cell = row.get(category_idx).unwrap_or("");
        let message = row.get(message_idx).unwrap_or("").to_string();

        records.push(Record {
            category: Category::parse(category_cell),
            message,
        });
    }

    Ok(records)
}

/// The fixed fallback corpus: five messages with alternating labels,
/// repeated to reach a usable sample size
pub fn synthetic() -> Vec<Record> {
    let mut records = Vec::with_capacity(SYNTHETIC_MESSAGES.len() * SYNTHETIC_REPEATS);
    for _ in 0..SYNTHETIC_REPEATS {
        records.extend(
            SYNTHETIC_MESSAGES
                .iter()
                .map(|&(category, message)| Record::new(category, message)),
        );
    }
    records
}

/// Load the dataset at `path`, or the synthetic corpus when it does not exist
pub fn load_or_synthetic<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    info!("Looking for dataset at: {}", path.display());

    if path.exists() {
        let records = load_csv(path)?;
        info!("Dataset found: {} rows", records.len());
        Ok(records)
    } else {
        warn!("Dataset not found, using synthetic data for demonstration");
        Ok(synthetic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_shape() {
        let records = synthetic();
        assert_eq!(records.len(), 100);
        assert_eq!(records[0].category, Some(Category::Ham));
        assert_eq!(records[1].message, "Win a free lottery now!");
        assert_eq!(records[5], records[0]);

        let spam = records
            .iter()
            .filter(|r| r.category == Some(Category::Spam))
            .count();
        assert_eq!(spam, 40);
    }

    #[test]
    fn test_parse_csv_quoted_and_empty_cells() {
        let csv = "Category,Message\n\
                   ham,\"Hi, are we still on for lunch?\"\n\
                   spam,\"WINNER!! Call now\"\n\
                   ham,\n\
                   ,orphan message\n";
        let records = parse_csv(csv).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].message, "Hi, are we still on for lunch?");
        assert_eq!(records[1].category, Some(Category::Spam));
        assert_eq!(records[2].message, "");
        assert_eq!(records[3].category, None);
    }

    #[test]
    fn test_parse_csv_column_order_free() {
        let csv = "Message,Category,Extra\nhello there,ham,x\n";
        let records = parse_csv(csv).unwrap();
        assert_eq!(records, vec![Record::new(Category::Ham, "hello there")]);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "Label,Text\nham,hello\n";
        let err = parse_csv(csv).unwrap_err();
        assert!(matches!(err, SpamError::Dataset(_)));
    }

    #[test]
    fn test_parse_csv_malformed_row() {
        let csv = "Category,Message\nham,hello,unexpected\n";
        assert!(matches!(parse_csv(csv), Err(SpamError::Csv(_))));
    }

    #[test]
    fn test_load_or_synthetic_missing_file() {
        let records = load_or_synthetic("/nonexistent/mail_data.csv").unwrap();
        assert_eq!(records, synthetic());
    }
}
