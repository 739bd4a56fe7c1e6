//! Testing utilities for AST assertions
//!
//! This module provides a fluent API for asserting on parsed programs,
//! making parser tests more readable and maintainable.
//!
//! # Example
//!
//! ```rust,ignore
//! use soyparse::soy::testing::assert_ast;
//!
//! let program = soyparse::parse("{namespace a}{template .t}Hi{/template}").unwrap();
//!
//! assert_ast(&program)
//!     .namespace("a")
//!     .template_count(1)
//!     .template(0, |t| {
//!         t.name("a.t").body(|body| {
//!             body.node_count(1)
//!                 .node(0, |node| node.assert_text().text("Hi"));
//!         });
//!     });
//! ```

mod assertions;
mod matchers;

pub use assertions::{
    assert_ast, assert_expression, BodyAssertion, BodyNodeAssertion, CallAssertion,
    CommandAssertion, ExpressionAssertion, LetAssertion, ProgramAssertion, TemplateAssertion,
    TextNodeAssertion,
};
pub use matchers::TextMatch;
