//! AST definitions and utilities for soy templates
//!
//! This module provides the Abstract Syntax Tree (AST) produced by the
//! parser, along with the position types every node carries.
//!
//! ## Modules
//!
//! - `span` - Position and Mark types for source locations
//! - `position` - Conversion from character offsets to positions
//! - `node` - Declaration and body node definitions
//! - `expression` - Expression node definitions
//! - `traits` - Uniform access to node information

pub mod expression;
pub mod node;
pub mod position;
pub mod span;
pub mod traits;

// Re-export commonly used types at module root
pub use expression::{
    BooleanLiteral, Expression, FunctionCall, MapItem, MapLiteral, NumberLiteral, OtherExpression,
    Reference, StringLiteral, Ternary,
};
pub use node::{
    Attribute, BindingValue, Body, BodyNode, Call, DelTemplate, Interpolation, LetStatement,
    OtherCmd, Param, ParamDeclaration, Program, SoyDoc, Template, TemplateItem, TextNode,
};
pub use position::SourceLocation;
pub use span::{Mark, Position};
pub use traits::AstNode;
