use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Shift calendar has {actual} positive-point shifts, expected {expected}")]
    ShiftCountMismatch { expected: usize, actual: usize },

    #[error("Priority code '{code}' not recognized for {individual}")]
    UnknownPriorityCode { individual: String, code: String },

    #[error("Invalid {field} code {value} in row {row}")]
    InvalidCode { field: &'static str, value: i64, row: usize },

    #[error("Row {row} references institution {reference}, but only {available} are loaded")]
    UnknownInstitution { row: usize, reference: i64, available: usize },

    #[error("Malformed {file} row {row}: {reason}")]
    MalformedRow { file: &'static str, row: usize, reason: String },

    #[error("Priority not found for {name} ({id}); justification: {justification}")]
    MissingPriority { name: String, id: String, justification: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AllocResult<T> = Result<T, AllocError>;
