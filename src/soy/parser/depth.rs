//! Nesting pre-scan
//!
//! The grammar is recursive, so pathological input (thousands of nested
//! `{if}` blocks or brackets) could exhaust the stack. Before parsing, a
//! linear scan over the tags measures how deep blocks and brackets go and
//! rejects the source if any point exceeds the limit.
//!
//! The scan bounds the depth the grammar will reach; it does not validate
//! the source.

use tracing::trace;

use super::error::{ParseError, ParseErrorKind};
use crate::soy::ast::SourceLocation;

/// Commands with a matching `{/name}` tag, unless written self-closing
const BLOCK_COMMANDS: &[&str] = &[
    "template",
    "deltemplate",
    "call",
    "delcall",
    "param",
    "let",
    "if",
    "foreach",
    "for",
    "msg",
    "switch",
    "plural",
    "select",
    "literal",
];

/// Check that block and bracket nesting never exceeds `max_depth`.
///
/// Returns the deepest level seen.
pub(crate) fn check_nesting(
    source: &str,
    location: &SourceLocation,
    max_depth: usize,
) -> Result<usize, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut index = 0usize;

    while index < chars.len() {
        if chars[index] != '{' {
            index += 1;
            continue;
        }

        let closing = chars.get(index + 1) == Some(&'/');
        let name_start = if closing { index + 2 } else { index + 1 };
        let name = command_name(&chars, name_start);
        let tag_end = find(&chars, name_start, &['}']).unwrap_or(chars.len());
        let is_block = BLOCK_COMMANDS.contains(&name.as_str());

        if closing {
            if is_block {
                depth = depth.saturating_sub(1);
            }
            index = tag_end + 1;
            continue;
        }

        let self_closing = tag_end < chars.len() && tag_end > 0 && chars[tag_end - 1] == '/';
        let opens = is_block && !self_closing;
        let level = depth + usize::from(opens) + bracket_depth(&chars[index..tag_end]);

        if level > max_depth {
            trace!(offset = index, level, max_depth, "nesting limit exceeded");
            return Err(ParseError::at(
                location,
                index,
                ParseErrorKind::TooDeep { limit: max_depth },
            ));
        }
        deepest = deepest.max(level);

        if opens && name == "literal" {
            // literal content is opaque; skip straight past its closing tag
            index = find_sequence(&chars, tag_end, "{/literal}")
                .map(|at| at + "{/literal}".len())
                .unwrap_or(chars.len());
            continue;
        }

        if opens {
            depth += 1;
        }
        index = tag_end + 1;
    }

    trace!(deepest, "nesting pre-scan complete");
    Ok(deepest)
}

fn command_name(chars: &[char], start: usize) -> String {
    chars
        .iter()
        .skip(start)
        .take_while(|c| c.is_alphanumeric() || **c == '_' || **c == '@')
        .collect()
}

fn find(chars: &[char], from: usize, targets: &[char]) -> Option<usize> {
    (from..chars.len()).find(|&i| targets.contains(&chars[i]))
}

fn find_sequence(chars: &[char], from: usize, needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    (from..chars.len()).find(|&i| chars[i..].starts_with(&needle))
}

/// Deepest `(`/`[` nesting inside a tag
fn bracket_depth(tag: &[char]) -> usize {
    let mut current = 0usize;
    let mut deepest = 0usize;
    for c in tag {
        match c {
            '(' | '[' => {
                current += 1;
                deepest = deepest.max(current);
            }
            ')' | ']' => current = current.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
