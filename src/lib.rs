//! Runtime-generated command-line interface for JSON:API style services.
//!
//! The crate loads an `OpenAPI` document, derives a flat set of command-line
//! flags for every operation, assembles requests from user-supplied values and
//! flattens paginated, relationship-linked responses back into plain records.

pub mod atomic;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod docs;
pub mod duration;
pub mod engine;
pub mod error;
pub mod logging;
pub mod response;
pub mod spec;
pub mod transport;
