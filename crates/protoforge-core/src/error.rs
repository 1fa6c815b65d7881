use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Unknown schema: {reference}")]
    UnknownSchema { reference: String },

    #[error("Schema already registered: {reference}")]
    DuplicateSchema { reference: String },

    #[error("Schema document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Conversion error: {0}")]
    Conversion(String),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
