//! HTTP status exposition.
//!
//! # Data Flow
//! ```text
//! GET /
//!     → server.rs (middleware, handler)
//!     → SnapshotReader::latest()
//!     → response.rs (status code + JSON document)
//! ```

pub mod response;
pub mod server;

pub use response::{StatusCodes, StatusDocument, NOT_YET_EVALUATED};
pub use server::StatusServer;
