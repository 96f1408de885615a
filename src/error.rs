use thiserror::Error;

/// Errors surfaced by the table. Operations on a missing row id or column key
/// are silent no-ops and never produce one of these.
#[derive(Debug, Error)]
pub enum TableError {
    /// The import source could not be parsed. No rows were added.
    #[error("CSV parse error: {0}")]
    ImportParse(String),

    /// A draft field failed its type constraint on commit.
    #[error("{field} must be a number (got {value:?})")]
    Validation { field: String, value: String },

    #[error("no row is being edited")]
    NoActiveEdit,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::ImportParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
