//! Paging and flattening of normalized responses.

pub mod normalizer;
pub mod pager;
pub mod wire;

pub use normalizer::{normalize_resources, Record};
pub use pager::{Endpoint, PageDriver, PagedOutput};
