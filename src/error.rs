use thiserror::Error;

pub type CodesheetResult<T> = Result<T, CodesheetError>;

#[derive(Error, Debug)]
pub enum CodesheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// A declared-numeric property value that cannot be materialized as its type
    #[error("Property '{property_id}': value '{value}' is not a valid {expected}")]
    TypeCoercion {
        property_id: String,
        value: String,
        expected: String,
    },

    #[error("Column space exhausted: column index {requested} exceeds the {max}-column limit")]
    ColumnSpaceExhausted { requested: usize, max: u32 },

    #[error("Sheet '{0}' already exists")]
    DuplicateSheet(String),

    #[error("Sheet '{0}' not found")]
    MissingSheet(String),

    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl CodesheetError {
    /// Whether this error aborts assembly outright
    ///
    /// Only sheet-name collisions are recoverable; the reference builder downgrades
    /// them to a logged skip.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CodesheetError::DuplicateSheet(_))
    }
}
