//! Database operations for the product table
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Each upsert runs in its own transaction; a batch import is not atomic.

use std::collections::VecDeque;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{InventoryError, Result};
use crate::models::{NewProduct, Product};

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Rows fetched per round trip by [`Products`]
const PAGE_SIZE: i64 = 64;

/// Opens (or creates) the inventory database and initialises the schema.
pub fn open_database(path: &Path) -> DbResult<Connection> {
    log::info!("Inventory DB: {}", path.display());
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the `product` table if it does not already exist.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS product (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL UNIQUE,
            quantity     INTEGER NOT NULL CHECK (quantity >= 0),
            price        INTEGER NOT NULL,
            last_updated TEXT NOT NULL
        );",
    )?;

    log::debug!("Database schema initialized");
    Ok(())
}

/// Whether an upsert created a new row or overwrote an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
}

impl UpsertOutcome {
    /// ID of the row that was written
    pub fn id(&self) -> i64 {
        match *self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => id,
        }
    }
}

/// Inserts a product, or overwrites quantity, price and date on the existing
/// product with the same name. The ID of an existing product never changes.
pub fn upsert_product(conn: &mut Connection, product: &NewProduct) -> DbResult<UpsertOutcome> {
    let tx = conn.transaction()?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM product WHERE name = ?1",
            params![&product.name],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE product
                 SET quantity = ?1, price = ?2, last_updated = ?3
                 WHERE id = ?4",
                params![product.quantity, product.price, product.last_updated, id],
            )?;
            UpsertOutcome::Updated(id)
        }
        None => {
            tx.execute(
                "INSERT INTO product (name, quantity, price, last_updated)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    &product.name,
                    product.quantity,
                    product.price,
                    product.last_updated
                ],
            )?;
            UpsertOutcome::Created(tx.last_insert_rowid())
        }
    };

    tx.commit()?;
    log::debug!("Upserted '{}': {:?}", product.name, outcome);
    Ok(outcome)
}

fn product_from_row(row: &Row<'_>) -> DbResult<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        price: row.get(3)?,
        last_updated: row.get(4)?,
    })
}

/// Get a product by ID, or [`InventoryError::NotFound`] if there is none
pub fn get_product(conn: &Connection, id: i64) -> Result<Product> {
    conn.query_row(
        "SELECT id, name, quantity, price, last_updated FROM product WHERE id = ?1",
        params![id],
        product_from_row,
    )
    .optional()?
    .ok_or(InventoryError::NotFound(id))
}

/// Look up a product by its unique name
pub fn find_product_by_name(conn: &Connection, name: &str) -> DbResult<Option<Product>> {
    conn.query_row(
        "SELECT id, name, quantity, price, last_updated FROM product WHERE name = ?1",
        params![name],
        product_from_row,
    )
    .optional()
}

/// Get total count of products in database
pub fn product_count(conn: &Connection) -> DbResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM product", [], |row| row.get(0))
}

/// Iterate over all products in insertion order.
///
/// Rows are fetched lazily a page at a time. Call again to restart from the
/// beginning.
pub fn list_products(conn: &Connection) -> Products<'_> {
    Products {
        conn,
        after_id: 0,
        page: VecDeque::new(),
        done: false,
    }
}

/// Lazy, paged iterator returned by [`list_products`]
pub struct Products<'conn> {
    conn: &'conn Connection,
    after_id: i64,
    page: VecDeque<Product>,
    done: bool,
}

impl Products<'_> {
    fn fetch_page(&mut self) -> DbResult<()> {
        let conn = self.conn;
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, quantity, price, last_updated
             FROM product
             WHERE id > ?1
             ORDER BY id ASC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![self.after_id, PAGE_SIZE], product_from_row)?
            .collect::<DbResult<Vec<_>>>()?;

        if (rows.len() as i64) < PAGE_SIZE {
            self.done = true;
        }
        if let Some(last) = rows.last() {
            self.after_id = last.id;
        }
        self.page.extend(rows);
        Ok(())
    }
}

impl Iterator for Products<'_> {
    type Item = DbResult<Product>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page.is_empty() && !self.done {
            if let Err(e) = self.fetch_page() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.page.pop_front().map(Ok)
    }
}
