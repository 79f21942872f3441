pub mod property;
pub mod query;

pub use property::*;
pub use query::*;
