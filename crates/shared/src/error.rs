use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordImportError {
    #[error("failed to parse ticket records: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate ticket id '{id}' in record set")]
    DuplicateId { id: String },
}
