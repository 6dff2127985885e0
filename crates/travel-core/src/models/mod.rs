//! Shared data models for the travel gateway

mod backend;
mod outcome;
mod query;
mod response;

pub use backend::*;
pub use outcome::*;
pub use query::*;
pub use response::*;
