use protoforge_core::ForgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Field name `{field}` is not valid for schema `{schema}`")]
    InvalidField { field: String, schema: String },

    #[error("Cannot generate proto for abstract schema `{schema}`")]
    AbstractSchema { schema: String },

    #[error("Cyclic relation chain: {path}")]
    CyclicRelation { path: String },

    #[error("Invalid generator config: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] ForgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodegenError>;
