use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by inventory CSV files (e.g. "01/02/2020")
pub const CSV_DATE_FORMAT: &str = "%m/%d/%Y";

/// A product row as it comes out of the inventory CSV, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "product_name")]
    pub name: String,
    #[serde(rename = "product_quantity")]
    pub quantity: String,
    #[serde(rename = "product_price")]
    pub price: String,
    #[serde(rename = "date_updated")]
    pub date_updated: RawDate,
}

/// The `date_updated` field of a raw row.
///
/// CSV rows always carry text; rows built in-process (manual add) already
/// have a typed date, which the normalizer passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RawDate {
    Text(String),
    Date(NaiveDate),
}

impl From<String> for RawDate {
    fn from(text: String) -> Self {
        RawDate::Text(text)
    }
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Date(date)
    }
}

/// A fully normalized product, ready to be upserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: u32,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub last_updated: NaiveDate,
}

/// A product as stored in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub last_updated: NaiveDate,
}

impl Product {
    /// Drops the surrogate ID, leaving the fields that survive an export/import cycle
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            quantity: self.quantity,
            price: self.price,
            last_updated: self.last_updated,
        }
    }
}

/// One line of a CSV export; column order is fixed by field order
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    pub product_name: &'a str,
    pub product_price: String,
    pub product_quantity: u32,
    pub date_updated: String,
}

impl<'a> From<&'a Product> for ExportRow<'a> {
    fn from(product: &'a Product) -> Self {
        ExportRow {
            product_name: &product.name,
            product_price: format_price(product.price),
            product_quantity: product.quantity,
            date_updated: product.last_updated.format(CSV_DATE_FORMAT).to_string(),
        }
    }
}

/// Formats cents as a dollar amount, e.g. 1250 -> "$12.50"
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}
