//! CSV import pipeline: read, normalize, upsert.
//!
//! Rows that fail normalization are never written; their errors are returned
//! in the [`ImportReport`] so the caller can show every one of them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rusqlite::Connection;

use crate::database::{upsert_product, UpsertOutcome};
use crate::error::Result;
use crate::models::RawProduct;
use crate::normalizer::{FieldError, NormalizedBatch, RowError};

/// Result of an import run
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Number of products inserted for the first time
    pub created: usize,
    /// Number of existing products overwritten by name
    pub updated: usize,
    /// Rows that were skipped, in file order
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of rows written to the database
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }
}

/// Reads inventory CSV data and normalizes every record.
///
/// Records that cannot be decoded (wrong column count, missing columns) are
/// kept in the batch as row errors. Only an I/O failure aborts the read.
pub fn read_inventory<R: Read>(reader: R) -> Result<NormalizedBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut batch = NormalizedBatch::new();
    for result in rdr.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line());
                match record.deserialize::<RawProduct>(Some(&headers)) {
                    Ok(raw) => batch.push_row(line, &raw),
                    Err(e) => batch.push_error(RowError::malformed(line, e.to_string())),
                }
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line());
                batch.push_error(RowError::malformed(line, e.to_string()));
            }
        }
    }

    log::debug!("Read {} inventory rows", batch.len());
    Ok(batch)
}

/// Upserts every well-formed row of `batch` and collects the rejected ones.
///
/// A row the database refuses is reported like a parse failure and the
/// remaining rows are still attempted.
pub fn import_batch(conn: &mut Connection, batch: NormalizedBatch) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for (line, outcome) in batch.into_lined_outcomes() {
        match outcome {
            Ok(product) => match upsert_product(conn, &product) {
                Ok(UpsertOutcome::Created(_)) => report.created += 1,
                Ok(UpsertOutcome::Updated(_)) => report.updated += 1,
                Err(e) => {
                    log::error!("Failed to save '{}': {}", product.name, e);
                    report.errors.push(RowError {
                        line,
                        product_name: product.name,
                        problems: vec![FieldError::Storage(e.to_string())],
                    });
                }
            },
            Err(err) => report.errors.push(err),
        }
    }

    if report.has_errors() {
        log::warn!(
            "Imported {} products ({} new, {} updated), {} rows skipped",
            report.imported(),
            report.created,
            report.updated,
            report.errors.len()
        );
    } else {
        log::info!(
            "Imported {} products ({} new, {} updated)",
            report.imported(),
            report.created,
            report.updated
        );
    }
    Ok(report)
}

/// Imports an inventory CSV file into the database.
pub fn import_csv_file(conn: &mut Connection, path: &Path) -> Result<ImportReport> {
    log::info!("Importing inventory from {}", path.display());
    let file = File::open(path)?;
    let batch = read_inventory(file)?;
    import_batch(conn, batch)
}
