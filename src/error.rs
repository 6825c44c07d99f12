use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepositionError {
    /// A caller-supplied parameter is outside its valid domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Table data is missing or malformed, or a query fell outside a table.
    #[error("Table lookup error: {0}")]
    TableLookup(String),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DepositionResult<T> = Result<T, DepositionError>;

impl DepositionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DepositionError::InvalidInput(message.into())
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        DepositionError::TableLookup(message.into())
    }

    /// Prefix the message of a table lookup error with where it happened.
    pub fn in_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            DepositionError::TableLookup(message) => {
                DepositionError::TableLookup(format!("{}: {}", context, message))
            }
            other => other,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DepositionError::InvalidInput(_))
    }

    pub fn is_table_lookup(&self) -> bool {
        matches!(self, DepositionError::TableLookup(_))
    }
}
