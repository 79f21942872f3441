//! Repository implementations module.
//!
//! This module contains the implementations of the `PropertyRepository` trait:
//! - `mongo`: MongoDB implementation
//! - `local`: In-memory implementation for unit testing and local development
pub mod local;
#[cfg(feature = "mongo-repo")]
pub mod mongo;

pub use local::LocalRepository;
#[cfg(feature = "mongo-repo")]
pub use mongo::MongoRepository;
