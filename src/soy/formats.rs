//! Output formats for parsed programs
//!
//! - `tag`: XML-like tags mirroring the tree
//! - `treeviz`: a box-drawing outline for terminals
//!
//! JSON and YAML come straight from the nodes' `serde::Serialize` impls, see
//! [`crate::soy::processor`].

pub mod tag;
pub mod treeviz;

pub use tag::serialize_program;
pub use treeviz::to_treeviz_str;
