//! Inventory Manager - product CSV to SQLite
//!
//! Imports product records from an inventory CSV into a local SQLite table,
//! then offers a console menu to look up, add and back up products.

pub mod database;
pub mod error;
pub mod export;
pub mod import;
pub mod menu;
pub mod models;
pub mod normalizer;

pub use database::{
    find_product_by_name, get_product, init_schema, list_products, open_database, product_count,
    upsert_product, Products, UpsertOutcome,
};
pub use error::{InventoryError, Result};
pub use export::{export_csv_file, write_inventory};
pub use import::{import_batch, import_csv_file, read_inventory, ImportReport};
pub use menu::Menu;
pub use models::{NewProduct, Product, RawDate, RawProduct};
pub use normalizer::{normalize_product, normalize_rows, FieldError, NormalizedBatch, RowError};
