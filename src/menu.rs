//! Interactive console menu.
//!
//! Generic over its input and output so the whole loop can be driven from
//! tests with in-memory buffers.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::database::{get_product, upsert_product, UpsertOutcome};
use crate::error::{InventoryError, Result};
use crate::export::export_csv_file;
use crate::import::ImportReport;
use crate::models::{format_price, RawDate, RawProduct};
use crate::normalizer::{normalize_product, RowError};

const TITLE: &str = "Inventory Manager";

/// Menu entries as (command, description); `q` is handled separately
const ENTRIES: [(&str, &str); 3] = [
    ("v", "Lookup Item by ID"),
    ("a", "Add New Item"),
    ("b", "Back-up Current Inventory"),
];

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

pub struct Menu<'a, R, W> {
    conn: &'a mut Connection,
    input: R,
    output: W,
    backup_path: PathBuf,
    clear_screen: bool,
    today: Option<NaiveDate>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(conn: &'a mut Connection, input: R, output: W, backup_path: PathBuf) -> Self {
        Self {
            conn,
            input,
            output,
            backup_path,
            clear_screen: false,
            today: None,
        }
    }

    /// Clear the terminal before each screen
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Fix the date stamped on manually added items (defaults to the local date)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Shows every row that was skipped during import and waits for ENTER.
    pub fn report_import_errors(&mut self, report: &ImportReport) -> Result<()> {
        if !report.has_errors() {
            return Ok(());
        }
        writeln!(
            self.output,
            "{} row(s) could not be imported:\n",
            report.errors.len()
        )?;
        for err in &report.errors {
            writeln!(self.output, "  {}", err)?;
        }
        writeln!(self.output)?;
        self.pause("[press ENTER to continue to the MAIN MENU]")?;
        Ok(())
    }

    /// Shows why the startup import could not run and waits for ENTER.
    pub fn report_import_failure(&mut self, path: &Path, err: &InventoryError) -> Result<()> {
        writeln!(self.output, "Could not import {}: {}\n", path.display(), err)?;
        writeln!(self.output, "Continuing with the existing inventory.\n")?;
        self.pause("[press ENTER to continue to the MAIN MENU]")
    }

    /// Runs the menu until the user quits or input ends.
    ///
    /// Only a console I/O failure ends the loop with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.clear()?;
            self.print_menu()?;

            let mut selection = match self.prompt("Please make a selection from the menu above =>  ")? {
                Some(s) => s.to_lowercase(),
                None => return Ok(()),
            };
            while selection != "q" && !ENTRIES.iter().any(|(key, _)| *key == selection) {
                let message = format!(
                    "Sorry, '{}' is not a valid selection, please try again =>  ",
                    selection
                );
                selection = match self.prompt(&message)? {
                    Some(s) => s.to_lowercase(),
                    None => return Ok(()),
                };
            }

            self.clear()?;
            let result = match selection.as_str() {
                "v" => self.view_item(),
                "a" => self.add_item(),
                "b" => self.backup(),
                _ => return Ok(()),
            };

            match result {
                Ok(()) => {}
                Err(InventoryError::Io(e)) => return Err(InventoryError::Io(e)),
                Err(e) => {
                    log::error!("Menu action failed: {}", e);
                    writeln!(self.output, "Error: {}\n", e)?;
                    self.pause("[press ENTER to return to the MAIN MENU]")?;
                }
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let rule = "*".repeat(TITLE.len());
        writeln!(self.output, "{}\n{}\n{}\n", rule, TITLE, rule)?;
        for (key, description) in ENTRIES {
            writeln!(self.output, "{} => {}", key, description)?;
        }
        writeln!(self.output, "q => Quit\n")?;
        Ok(())
    }

    fn view_item(&mut self) -> Result<()> {
        loop {
            let input = match self.prompt("Please enter an item ID (ENTER for MAIN MENU) =>  ")? {
                Some(s) if !s.is_empty() => s,
                _ => return Ok(()),
            };
            self.clear()?;

            let id = match input.parse::<i64>() {
                Ok(id) => id,
                Err(_) => {
                    writeln!(self.output, "'{}' is not a valid ID\n", input)?;
                    continue;
                }
            };

            match get_product(self.conn, id) {
                Ok(product) => {
                    writeln!(self.output, "Name: {}\n", product.name)?;
                    writeln!(self.output, "Quantity: {}\n", product.quantity)?;
                    writeln!(self.output, "Price: {}\n", format_price(product.price))?;
                    writeln!(self.output, "Date Updated: {}\n", product.last_updated)?;
                }
                Err(InventoryError::NotFound(id)) => {
                    writeln!(self.output, "No item found with ID {}\n", id)?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn add_item(&mut self) -> Result<()> {
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        loop {
            let name = match self.prompt("Product name (ENTER to cancel) =>  ")? {
                Some(s) if !s.is_empty() => s,
                _ => return Ok(()),
            };
            let Some(quantity) = self.prompt("Quantity =>  ")? else {
                return Ok(());
            };
            let Some(price) = self.prompt("Price (e.g. $4.99) =>  ")? else {
                return Ok(());
            };

            let raw = RawProduct {
                name,
                quantity,
                price,
                date_updated: RawDate::Date(today),
            };

            // Each attempt is validated on its own, so earlier errors never resurface
            let product = match normalize_product(&raw) {
                Ok(product) => product,
                Err(problems) => {
                    let err = RowError {
                        line: None,
                        product_name: raw.name.trim().to_string(),
                        problems,
                    };
                    self.clear()?;
                    writeln!(self.output, "{}\n", err)?;
                    writeln!(self.output, "Please try again.\n")?;
                    continue;
                }
            };

            match upsert_product(self.conn, &product)? {
                UpsertOutcome::Created(id) => {
                    log::info!("Added '{}' with ID {}", product.name, id);
                    writeln!(self.output, "Added '{}' with ID {}\n", product.name, id)?;
                }
                UpsertOutcome::Updated(id) => {
                    log::info!("Updated '{}' (ID {})", product.name, id);
                    writeln!(self.output, "Updated '{}' (ID {})\n", product.name, id)?;
                }
            }
            self.pause("[press ENTER to return to the MAIN MENU]")?;
            return Ok(());
        }
    }

    fn backup(&mut self) -> Result<()> {
        let message = format!("Back-up file [{}] =>  ", self.backup_path.display());
        let Some(input) = self.prompt(&message)? else {
            return Ok(());
        };
        let path = if input.is_empty() {
            self.backup_path.clone()
        } else {
            PathBuf::from(input)
        };

        match export_csv_file(self.conn, &path) {
            Ok(count) => writeln!(
                self.output,
                "Backed up {} product(s) to {}\n",
                count,
                path.display()
            )?,
            Err(e) => {
                log::error!("Back-up to {} failed: {}", path.display(), e);
                writeln!(self.output, "Back-up failed: {}\n", e)?;
            }
        }
        self.pause("[press ENTER to return to the MAIN MENU]")?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.clear_screen {
            write!(self.output, "{}", CLEAR_SCREEN)?;
        }
        Ok(())
    }

    fn pause(&mut self, message: &str) -> Result<()> {
        self.prompt(message)?;
        Ok(())
    }

    /// Prints `message` and reads one trimmed line; `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod tests;
