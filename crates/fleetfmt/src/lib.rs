//! Canonical quoting and ordering for the YAML files of Elastic integration packages.
//!
//! The crate parses YAML into a lossless [rowan] tree and runs a fixed
//! pipeline of [passes](formatter::Pass) over every document, chosen per
//! file class by the [`Conventions`](conventions::Conventions) table.

pub mod classify;
pub mod conventions;
pub mod dom;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod syntax;
pub mod util;

pub use error::Error;
pub use rowan;
