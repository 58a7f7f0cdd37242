//! Table and JSON output for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use license_core::error::AppError;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows as one table, or as a JSON array.
pub fn print_rows<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table if rows.is_empty() => println!("No results found."),
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Json => print_json(rows)?,
    }
    Ok(())
}

/// Print one row. JSON output is the bare object, not a one-element array.
pub fn print_row<T: Serialize + Tabled>(row: &T, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => print_rows(std::slice::from_ref(row), format),
        OutputFormat::Json => print_json(row),
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        key: String,
        valid: bool,
    }

    fn row() -> Row {
        Row {
            key: "ABC-123".to_string(),
            valid: true,
        }
    }

    #[test]
    fn test_rows_print_in_both_formats() {
        for format in [OutputFormat::Table, OutputFormat::Json] {
            print_rows(&[row(), row()], format).expect("rows");
            print_rows::<Row>(&[], format).expect("empty rows");
            print_row(&row(), format).expect("row");
        }
    }
}
