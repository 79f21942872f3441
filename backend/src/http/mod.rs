//! HTTP server module for the HomeNest backend.
//!
//! This module provides an axum-based HTTP server that exposes the property
//! store as a REST API. Handlers hold no store state of their own: the
//! repository is acquired once at startup and injected through [`AppState`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query/path/body extraction                             │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error envelopes                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db/services.rs)                           │
//! │  - Server-side timestamps                                 │
//! │  - Not-found contract                                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / MongoRepository                      │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
