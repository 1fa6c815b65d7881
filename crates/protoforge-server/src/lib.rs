pub mod error;
pub mod service;
pub mod servicer;

pub use error::*;
pub use service::*;
pub use servicer::*;
