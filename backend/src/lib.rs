//! # HomeNest Backend
//!
//! Property listing service backed by a document store.
//!
//! ## Architecture
//!
//! - [`models`]: Property documents, identifiers, listing queries and write acknowledgements
//! - [`db`]: Repository trait, store backends, configuration and the service layer
//! - [`config`]: HTTP listener settings
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Quick start
//!
//! ```ignore
//! use homenest::db::{services, RepositoryFactory};
//! use homenest::models::PropertyQuery;
//!
//! let repo = RepositoryFactory::create_local();
//! let query = PropertyQuery::default().with_search("villa");
//! let hits = services::list_properties(repo.as_ref(), &query).await?;
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
