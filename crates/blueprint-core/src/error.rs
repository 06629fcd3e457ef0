use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No schema registered for class: {0}")]
    NotRegistered(String),

    #[error("Class {class} does not expose method: {method}")]
    MissingMethod { class: String, method: String },

    #[error("Unknown accessor: {0}")]
    UnknownAccessor(String),

    #[error("Document has no value in slot {slot} ({name})")]
    MissingSlot { slot: usize, name: String },

    #[error("Failed to encode value: {0}")]
    Encode(String),

    #[error("Failed to decode stored value: {0}")]
    Decode(String),

    #[error(transparent)]
    Adapter(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
