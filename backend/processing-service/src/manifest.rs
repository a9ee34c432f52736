//! Manifest parsing and column validation.
//!
//! A manifest is a CSV file with one row per product and the required columns
//! `Serial Number`, `Product Name` and `Input Image Urls`. Extra columns are
//! ignored and column order does not matter. The whole file is validated
//! before any job or product row is created, so a bad manifest leaves nothing
//! behind in the store.

use crate::csv;
use crate::error::{AppError, Result};
use crate::models::NewProduct;

/// Columns a manifest must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["Serial Number", "Product Name", "Input Image Urls"];

/// Parse manifest CSV text into intake rows, in file order
pub fn parse_manifest(content: &str) -> Result<Vec<NewProduct>> {
    // Excel exports commonly lead with a BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = csv::parse_records(content).into_iter();
    let header = records
        .next()
        .ok_or_else(|| AppError::BadRequest("Manifest file is empty".to_string()))?;

    let columns = resolve_columns(&header)?;

    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        // Header is line 1
        let line = index + 2;
        rows.push(parse_row(&record, &columns, line)?);
    }

    Ok(rows)
}

/// Indices of the required columns within the header record
struct ColumnIndices {
    serial_number: usize,
    name: usize,
    input_image_urls: usize,
}

fn resolve_columns(header: &[String]) -> Result<ColumnIndices> {
    let find = |name: &str| header.iter().position(|col| col.trim() == name);

    let [serial_number, name, input_image_urls] = REQUIRED_COLUMNS.map(find);
    match (serial_number, name, input_image_urls) {
        (Some(serial_number), Some(name), Some(input_image_urls)) => Ok(ColumnIndices {
            serial_number,
            name,
            input_image_urls,
        }),
        (serial_number, name, input_image_urls) => {
            let missing: Vec<&str> = [serial_number, name, input_image_urls]
                .iter()
                .zip(REQUIRED_COLUMNS)
                .filter(|(found, _)| found.is_none())
                .map(|(_, column)| column)
                .collect();
            Err(AppError::BadRequest(format!(
                "Missing columns: {}",
                missing.join(", ")
            )))
        }
    }
}

fn parse_row(record: &[String], columns: &ColumnIndices, line: usize) -> Result<NewProduct> {
    let cell = |index: usize| -> Result<&str> {
        record.get(index).map(String::as_str).ok_or_else(|| {
            AppError::BadRequest(format!("Manifest line {} has too few columns", line))
        })
    };

    let serial_raw = cell(columns.serial_number)?.trim();
    let serial_number: i64 = serial_raw.parse().map_err(|_| {
        AppError::BadRequest(format!(
            "Manifest line {} has an invalid serial number: {:?}",
            line, serial_raw
        ))
    })?;

    Ok(NewProduct {
        serial_number,
        name: cell(columns.name)?.trim().to_string(),
        // Kept verbatim; the summary artifact renders this original string
        input_image_urls: cell(columns.input_image_urls)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_basic() {
        let rows = parse_manifest(
            "Serial Number,Product Name,Input Image Urls\r\n\
             1,Widget,\"http://x/a.jpg,http://x/b.jpg\"\r\n\
             2,Gadget,http://x/c.jpg\r\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].serial_number, 1);
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].input_image_urls, "http://x/a.jpg,http://x/b.jpg");
        assert_eq!(rows[1].serial_number, 2);
        assert_eq!(rows[1].input_image_urls, "http://x/c.jpg");
    }

    #[test]
    fn test_parse_manifest_column_order_is_free() {
        let rows = parse_manifest(
            "Input Image Urls,Serial Number,Product Name\n\
             http://x/a.jpg,7,Widget\n",
        )
        .unwrap();
        assert_eq!(rows[0].serial_number, 7);
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].input_image_urls, "http://x/a.jpg");
    }

    #[test]
    fn test_parse_manifest_extra_columns_ignored() {
        let rows = parse_manifest(
            "Serial Number,Product Name,Input Image Urls,Notes\n\
             1,Widget,http://x/a.jpg,ignore me\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].input_image_urls, "http://x/a.jpg");
    }

    #[test]
    fn test_parse_manifest_missing_columns() {
        let err = parse_manifest("Serial Number,Name\n1,Widget\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Missing columns: Product Name, Input Image Urls"
        );
    }

    #[test]
    fn test_parse_manifest_empty_file() {
        assert!(parse_manifest("").is_err());
    }

    #[test]
    fn test_parse_manifest_invalid_serial() {
        let err = parse_manifest(
            "Serial Number,Product Name,Input Image Urls\nabc,Widget,http://x/a.jpg\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid serial number"));
    }

    #[test]
    fn test_parse_manifest_strips_bom() {
        let rows = parse_manifest(
            "\u{feff}Serial Number,Product Name,Input Image Urls\n1,Widget,http://x/a.jpg\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_parse_manifest_header_only() {
        let rows = parse_manifest("Serial Number,Product Name,Input Image Urls\n").unwrap();
        assert!(rows.is_empty());
    }
}
