//! Parser module for soy templates
//!
//! The grammar is built with chumsky combinators and runs directly over the
//! characters of the source (there is no separate lexer):
//!
//! 1. **combinators** - generic helpers: raw capture, marks, command openers
//! 2. **expression** - the partial expression language with raw fallback
//! 3. **body** - template content, flattened control blocks
//! 4. **declarations** - doc blocks, `{@param}`, attributes, templates
//! 5. **program** - namespace plus templates
//! 6. **api** - the public entry point and error conversion
//!
//! ## Testing
//!
//! See the [testing module](crate::soy::testing) for the fluent AST
//! assertions used by the parser tests.

pub mod api;
pub mod body;
pub mod combinators;
pub mod declarations;
pub mod depth;
pub mod error;
pub mod expression;
pub mod program;
#[cfg(test)]
mod tests;

pub use crate::soy::ast::{
    AstNode, BindingValue, Body, BodyNode, Call, DelTemplate, Expression, Mark, Position, Program,
    SourceLocation, Template, TemplateItem,
};

pub use api::{parse, parse_with_options, ParseOptions};
pub use error::{ParseError, ParseErrorKind};
