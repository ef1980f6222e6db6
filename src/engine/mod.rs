//! Flag derivation and request execution for schema operations.

pub mod assembler;
pub mod builder;
pub mod executor;
pub mod generator;
pub mod naming;
pub mod required;

pub use assembler::{assemble, BodySource, FlagValues, PreparedRequest};
pub use builder::{build_command_schema, BuildOptions, CommandSchema, FlagKind, FlagSpec};
pub use executor::{execute, prepare_command, Invocation};
