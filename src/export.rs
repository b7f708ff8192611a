//! CSV export of the product table.

use std::io::Write;
use std::path::Path;

use rusqlite::Connection;

use crate::database::list_products;
use crate::error::Result;
use crate::models::ExportRow;

/// Writes every stored product to `writer` as CSV.
///
/// Columns: `product_name, product_price, product_quantity, date_updated`.
/// Returns the number of product rows written.
pub fn write_inventory<W: Write>(conn: &Connection, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut count = 0;

    for product in list_products(conn) {
        let product = product?;
        wtr.serialize(ExportRow::from(&product))?;
        count += 1;
    }

    // An empty table still gets a header row
    if count == 0 {
        wtr.write_record(["product_name", "product_price", "product_quantity", "date_updated"])?;
    }

    wtr.flush()?;
    Ok(count)
}

/// Exports the product table to `path`, replacing any existing file.
pub fn export_csv_file(conn: &Connection, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let count = write_inventory(conn, file)?;
    log::info!("Exported {} products to {}", count, path.display());
    Ok(count)
}
