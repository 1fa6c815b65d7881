pub mod error;
pub mod json_format;
pub mod schema;
pub mod types;

pub use error::*;
pub use json_format::*;
pub use schema::*;
pub use types::*;
