//! # soyparse
//!
//! A front-end parser for soy template files: namespaces, templates,
//! delegate templates, doc blocks, control commands and a small expression
//! language, turned into a position-annotated AST.
//!
//! ## Testing
//!
//! For the fluent assertion helpers used by the test suite, see the
//! [testing module](soy::testing).

pub mod soy;

pub use soy::parser::{parse, parse_with_options, ParseError, ParseErrorKind, ParseOptions};
