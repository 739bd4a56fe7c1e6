//! Public API for the parser.

use chumsky::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::combinators::Marker;
use super::depth::check_nesting;
use super::error::ParseError;
use super::program::{namespace_header, program};
use crate::soy::ast::Program;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Parser settings; missing fields take their defaults when deserialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Deepest block/bracket nesting accepted before parsing is refused
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse a soy file with default options
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_with_options(source, &ParseOptions::default())
}

/// Parse a soy file.
///
/// The namespace is read first so that relative template and call names can
/// be resolved while the rest of the file is parsed.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Program, ParseError> {
    let marker = Marker::new(source);
    let location = marker.location();
    debug!(
        chars = location.len(),
        lines = location.line_count(),
        max_depth = options.max_depth,
        "parsing soy source"
    );

    check_nesting(source, location, options.max_depth)?;

    let namespace = namespace_header()
        .parse(source)
        .map_err(|errors| ParseError::from_simple(source, location, errors))?;

    let program = program(&marker, Arc::new(namespace))
        .parse(source)
        .map_err(|errors| ParseError::from_simple(source, location, errors))?;

    debug!(
        namespace = %program.namespace.join("."),
        templates = program.templates.len(),
        "parsed soy program"
    );
    Ok(program)
}
