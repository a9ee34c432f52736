//! Minimal RFC 4180 record reader/writer.
//!
//! Fields containing a comma, double quote, CR or LF are double-quoted with
//! embedded quotes doubled; records end in CRLF. The manifest parser and the
//! summary artifact both go through this module so the two sides of the
//! contract cannot drift.

/// Append one record to `out`, quoting fields as needed, terminated by CRLF
pub fn write_record(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quoting(field) {
            out.push('"');
            for ch in field.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}

fn needs_quoting(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Parse CSV text into records. Accepts CRLF or LF row endings and a missing
/// final terminator; blank lines are skipped.
pub fn parse_records(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    // Whether the current record has any content yet (distinguishes a blank
    // line from a record ending in an empty field)
    let mut field_started = false;
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut records, &mut record, &mut field, &mut field_started);
            }
            '\n' => {
                end_record(&mut records, &mut record, &mut field, &mut field_started);
            }
            _ => {
                field.push(ch);
                field_started = true;
            }
        }
    }
    end_record(&mut records, &mut record, &mut field, &mut field_started);

    records
}

fn end_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    field_started: &mut bool,
) {
    if record.is_empty() && field.is_empty() && !*field_started {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
    *field_started = false;
}
