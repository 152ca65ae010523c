//! Typed views over the syntax tree, together with the navigation
//! helpers the formatting passes rely on.

mod error;
mod keys;
mod navigate;
mod node;

pub use error::QueryError;
pub use keys::{KeyOrIndex, Keys};
pub use navigate::{ancestor, path_of, query, query_path};
pub use node::{Document, Entry, Item, Mapping, Node, Scalar, Sequence};
