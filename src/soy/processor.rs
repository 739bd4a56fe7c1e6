//! File processing API for soy templates
//!
//! Parses a source (or a file) and renders the resulting tree in one of the
//! available output formats:
//!
//! - `ast-tag`: XML-like tags, see [`formats::tag`](crate::soy::formats::tag)
//! - `ast-treeviz`: box-drawing outline, see [`formats::treeviz`](crate::soy::formats::treeviz)
//! - `ast-json` / `ast-yaml`: the serde rendering of the AST
//!
//! ```rust,ignore
//! use soyparse::soy::processor::{process, OutputFormat};
//!
//! let format = OutputFormat::from_name("ast-treeviz")?;
//! let output = process(source, &format, &ParseOptions::default())?;
//! ```

use crate::soy::formats::{serialize_program, to_treeviz_str};
use crate::soy::parser::{parse_with_options, ParseError, ParseOptions};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    AstTag,
    AstTreeviz,
    AstJson,
    AstYaml,
}

impl OutputFormat {
    /// Parse a format name like "ast-tag" or "ast-json"
    pub fn from_name(name: &str) -> Result<Self, ProcessingError> {
        match name {
            "ast-tag" => Ok(OutputFormat::AstTag),
            "ast-treeviz" => Ok(OutputFormat::AstTreeviz),
            "ast-json" => Ok(OutputFormat::AstJson),
            "ast-yaml" => Ok(OutputFormat::AstYaml),
            _ => Err(ProcessingError::UnknownFormat(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::AstTag => "ast-tag",
            OutputFormat::AstTreeviz => "ast-treeviz",
            OutputFormat::AstJson => "ast-json",
            OutputFormat::AstYaml => "ast-yaml",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::AstTag => "XML-like tags mirroring the AST",
            OutputFormat::AstTreeviz => "Tree outline with one node per line",
            OutputFormat::AstJson => "Full AST as pretty-printed JSON",
            OutputFormat::AstYaml => "Full AST as YAML",
        }
    }
}

/// Get all available output formats
pub fn available_formats() -> Vec<OutputFormat> {
    vec![
        OutputFormat::AstTag,
        OutputFormat::AstTreeviz,
        OutputFormat::AstJson,
        OutputFormat::AstYaml,
    ]
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    Io(String),
    Parse(ParseError),
    Serialize(String),
    UnknownFormat(String),
}

impl std::error::Error for ProcessingError {}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::Io(msg) => write!(f, "IO error: {}", msg),
            ProcessingError::Parse(error) => write!(f, "Parse error: {}", error),
            ProcessingError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ProcessingError::UnknownFormat(name) => write!(f, "Unknown format: {}", name),
        }
    }
}

impl From<ParseError> for ProcessingError {
    fn from(error: ParseError) -> Self {
        ProcessingError::Parse(error)
    }
}

/// Parse `source` and render it in `format`
pub fn process(
    source: &str,
    format: &OutputFormat,
    options: &ParseOptions,
) -> Result<String, ProcessingError> {
    let program = parse_with_options(source, options)?;
    debug!(format = format.name(), "rendering program");

    match format {
        OutputFormat::AstTag => Ok(serialize_program(&program)),
        OutputFormat::AstTreeviz => Ok(to_treeviz_str(&program)),
        OutputFormat::AstJson => serde_json::to_string_pretty(&program)
            .map_err(|e| ProcessingError::Serialize(e.to_string())),
        OutputFormat::AstYaml => {
            serde_yaml::to_string(&program).map_err(|e| ProcessingError::Serialize(e.to_string()))
        }
    }
}

/// Process a soy file according to the given format
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    format: &OutputFormat,
    options: &ParseOptions,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path)
        .map_err(|e| ProcessingError::Io(format!("{}: {}", file_path.display(), e)))?;
    process(&content, format, options)
}
