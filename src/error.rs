use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("{file}: missing required column(s): {}", .columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },
    #[error("{file}, line {line}: {message}")]
    ConfigError {
        file: String,
        line: u64,
        message: String,
    },
    #[error("Page size '{0}' not known")]
    UnknownPageSize(String),
    #[error("Font '{0}' not known")]
    UnknownFont(String),
    #[error("Colour '{0}' not known")]
    UnknownColour(String),
    #[error("Invalid label grid: {0}")]
    InvalidGrid(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Malformed template {template:?}: {message}")]
    TemplateSyntax { template: String, message: String },
    #[error("Label type '{0}' not known")]
    UnknownLabelType(String),
    #[error("Template {template:?} references field '{field}' which is not in the record")]
    MissingField { template: String, field: String },
    #[error("Template {template:?} formats field '{field}' as an integer, but it holds {value:?}")]
    NotAnInteger {
        template: String,
        field: String,
        value: String,
    },
    #[error("Quantity column '{0}' not present in record")]
    MissingQuantity(String),
    #[error("Quantity column '{column}' holds {value:?}, expected a non-negative integer")]
    BadQuantity { column: String, value: String },
    #[error("{0}")]
    UsageError(String),
    #[error("'{}' exists, not overwriting", .0.display())]
    FileExists(PathBuf),
    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LabelError>;
