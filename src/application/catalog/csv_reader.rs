//! CSV → `NewProduct` parsing.
//!
//! The first record is the header. Columns are located by name, so their
//! order is free and unknown columns are ignored. Every cell is trimmed and
//! coerced explicitly; the first bad cell aborts the whole file.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::importer::ImportError;
use crate::domain::NewProduct;

const COLUMNS: [&str; 6] = ["name", "barcode", "brand", "description", "price", "available"];

/// Positions of the required columns inside a record.
struct ColumnMap {
    name: usize,
    barcode: usize,
    brand: usize,
    description: usize,
    price: usize,
    available: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or_else(|| ImportError::Parse {
                    row: 1,
                    column: column.to_string(),
                    message: "column is missing from the header".to_string(),
                })
        };

        Ok(Self {
            name: find(COLUMNS[0])?,
            barcode: find(COLUMNS[1])?,
            brand: find(COLUMNS[2])?,
            description: find(COLUMNS[3])?,
            price: find(COLUMNS[4])?,
            available: find(COLUMNS[5])?,
        })
    }
}

/// Parse every data row of a products file.
pub fn parse_products<R: Read>(reader: R) -> Result<Vec<NewProduct>, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(rdr.headers()?)?;

    let mut products = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is row 1.
        let row = index as u64 + 2;
        products.push(parse_row(&record, &columns, row)?);
    }

    Ok(products)
}

fn parse_row(record: &StringRecord, columns: &ColumnMap, row: u64) -> Result<NewProduct, ImportError> {
    Ok(NewProduct {
        name: text(record, columns.name, "name", row)?,
        barcode: parse_barcode(cell(record, columns.barcode, "barcode", row)?, row)?,
        brand: text(record, columns.brand, "brand", row)?,
        description: text(record, columns.description, "description", row)?,
        price: parse_price(cell(record, columns.price, "price", row)?, row)?,
        available: parse_available(cell(record, columns.available, "available", row)?, row)?,
    })
}

fn parse_error(row: u64, column: &str, message: impl Into<String>) -> ImportError {
    ImportError::Parse {
        row,
        column: column.to_string(),
        message: message.into(),
    }
}

fn cell<'r>(
    record: &'r StringRecord,
    index: usize,
    column: &str,
    row: u64,
) -> Result<&'r str, ImportError> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(parse_error(row, column, "value is required")),
    }
}

fn text(record: &StringRecord, index: usize, column: &str, row: u64) -> Result<String, ImportError> {
    cell(record, index, column, row).map(str::to_string)
}

fn parse_barcode(value: &str, row: u64) -> Result<i64, ImportError> {
    value
        .parse::<i64>()
        .map_err(|_| parse_error(row, "barcode", format!("'{}' is not an integer", value)))
}

fn parse_price(value: &str, row: u64) -> Result<f64, ImportError> {
    match value.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(parse_error(row, "price", format!("'{}' is not a number", value))),
    }
}

fn parse_available(value: &str, row: u64) -> Result<bool, ImportError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(parse_error(
            row,
            "available",
            format!("'{}' is not a boolean", value),
        )),
    }
}
