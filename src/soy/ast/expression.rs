//! Expression node definitions
//!
//! Only a handful of expression forms are modelled. Anything else the
//! expression grammar meets (arithmetic, comparisons, field and index access,
//! list literals, parenthesised groups) is kept verbatim in an
//! [`OtherExpression`].

use super::span::Mark;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Reference(Reference),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Number(NumberLiteral),
    Map(MapLiteral),
    FunctionCall(FunctionCall),
    Ternary(Ternary),
    Other(OtherExpression),
}

/// A `$name` variable reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub mark: Mark,
    pub name: String,
}

/// A single-quoted string literal, escapes resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub mark: Mark,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub mark: Mark,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLiteral {
    pub mark: Mark,
    pub value: f64,
}

/// A `['key': value, ...]` literal; keys are always string literals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLiteral {
    pub mark: Mark,
    pub items: Vec<MapItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapItem {
    pub mark: Mark,
    pub key: StringLiteral,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub mark: Mark,
    pub name: String,
    pub args: Vec<Expression>,
}

/// `cond ? left : right`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ternary {
    pub mark: Mark,
    pub cond: Box<Expression>,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Expression text outside the modelled subset, captured as written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherExpression {
    pub mark: Mark,
    pub raw: String,
}

impl Reference {
    pub fn new(mark: Mark, name: impl Into<String>) -> Self {
        Self {
            mark,
            name: name.into(),
        }
    }
}

impl StringLiteral {
    pub fn new(mark: Mark, value: impl Into<String>) -> Self {
        Self {
            mark,
            value: value.into(),
        }
    }
}

impl BooleanLiteral {
    pub fn new(mark: Mark, value: bool) -> Self {
        Self { mark, value }
    }
}

impl NumberLiteral {
    pub fn new(mark: Mark, value: f64) -> Self {
        Self { mark, value }
    }
}

impl MapLiteral {
    pub fn new(mark: Mark, items: Vec<MapItem>) -> Self {
        Self { mark, items }
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.items
            .iter()
            .find(|item| item.key.value == key)
            .map(|item| &item.value)
    }
}

impl MapItem {
    pub fn new(mark: Mark, key: StringLiteral, value: Expression) -> Self {
        Self { mark, key, value }
    }
}

impl FunctionCall {
    pub fn new(mark: Mark, name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self {
            mark,
            name: name.into(),
            args,
        }
    }
}

impl Ternary {
    pub fn new(mark: Mark, cond: Expression, left: Expression, right: Expression) -> Self {
        Self {
            mark,
            cond: Box::new(cond),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl OtherExpression {
    pub fn new(mark: Mark, raw: impl Into<String>) -> Self {
        Self {
            mark,
            raw: raw.into(),
        }
    }
}

impl Expression {
    pub fn mark(&self) -> Mark {
        match self {
            Expression::Reference(e) => e.mark,
            Expression::String(e) => e.mark,
            Expression::Boolean(e) => e.mark,
            Expression::Number(e) => e.mark,
            Expression::Map(e) => e.mark,
            Expression::FunctionCall(e) => e.mark,
            Expression::Ternary(e) => e.mark,
            Expression::Other(e) => e.mark,
        }
    }

    /// Render the expression back to soy-like text.
    ///
    /// Modelled forms are printed canonically; raw captures verbatim.
    pub fn to_source(&self) -> String {
        match self {
            Expression::Reference(r) => format!("${}", r.name),
            Expression::String(s) => format!("'{}'", escape_string(&s.value)),
            Expression::Boolean(b) => b.value.to_string(),
            Expression::Number(n) => n.value.to_string(),
            Expression::Map(m) => {
                let items: Vec<String> = m
                    .items
                    .iter()
                    .map(|item| {
                        format!(
                            "'{}': {}",
                            escape_string(&item.key.value),
                            item.value.to_source()
                        )
                    })
                    .collect();
                format!("[{}]", items.join(", "))
            }
            Expression::FunctionCall(call) => {
                let args: Vec<String> = call.args.iter().map(Expression::to_source).collect();
                format!("{}({})", call.name, args.join(", "))
            }
            Expression::Ternary(t) => format!(
                "{} ? {} : {}",
                t.cond.to_source(),
                t.left.to_source(),
                t.right.to_source()
            ),
            Expression::Other(o) => o.raw.clone(),
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\'' => escaped.push_str("\\'"),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
