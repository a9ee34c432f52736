//! Summary artifact - the tabular result file produced once per completed job
//!
//! One row per product in processing order; URL lists stay in their
//! comma-joined string form, so those fields come out quoted. The header and
//! quoting are a byte-exact contract external consumers parse.

use crate::csv;
use crate::storage::RESULT_PREFIX;

/// Fixed artifact header
pub const SUMMARY_COLUMNS: [&str; 4] = [
    "Serial Number",
    "Product Name",
    "Input Image Urls",
    "Output Image Urls",
];

/// One artifact row, captured as each product finishes
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub serial_number: i64,
    pub name: String,
    pub input_image_urls: String,
    pub output_image_urls: String,
}

/// Render the artifact for a finished job
pub fn render(rows: &[SummaryRow]) -> String {
    let mut out = String::new();
    csv::write_record(&mut out, &SUMMARY_COLUMNS);
    for row in rows {
        let serial = row.serial_number.to_string();
        csv::write_record(
            &mut out,
            &[
                &serial,
                &row.name,
                &row.input_image_urls,
                &row.output_image_urls,
            ],
        );
    }
    out
}

/// Blob key the artifact is stored under, one per job
pub fn summary_key(job_id: &str) -> String {
    format!("{}/{}.csv", RESULT_PREFIX, job_id)
}
