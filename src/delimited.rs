//! Comma-separated text helpers for task exports.

/// Field separator.
pub const FIELD_SEPARATOR: char = ',';

/// Record separator.
pub const RECORD_SEPARATOR: char = '\n';

/// Wraps a value in double quotes, doubling any embedded quotes.
#[must_use]
pub fn quote_field(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' {
            quoted.push_str("\"\"");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('"');
    quoted
}

/// Returns the value unchanged unless it holds a separator, quote or line
/// break, in which case it is quoted.
#[must_use]
pub fn plain_field(value: &str) -> String {
    if value.contains([FIELD_SEPARATOR, '"', '\n', '\r']) {
        quote_field(value)
    } else {
        value.to_owned()
    }
}

/// Joins already-escaped fields into one record.
#[must_use]
pub fn join_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut record = String::new();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            record.push(FIELD_SEPARATOR);
        }
        record.push_str(field.as_ref());
    }
    record
}
