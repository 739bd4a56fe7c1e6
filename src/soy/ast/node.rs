//! Declaration and body node definitions
//!
//! Nodes are plain data built bottom-up by the grammar; each carries the
//! mark of the input consumed to build it. Branch boundaries inside
//! `if`/`foreach`/`msg`/`switch` blocks are not kept: those blocks become an
//! [`OtherCmd`] with one flat body.

use super::expression::Expression;
use super::span::Mark;
use serde::Serialize;

/// The ordered content between a command's opening and closing tags
pub type Body = Vec<BodyNode>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub mark: Mark,
    pub namespace: Vec<String>,
    pub templates: Vec<TemplateItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TemplateItem {
    Template(Template),
    DelTemplate(DelTemplate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub mark: Mark,
    pub doc: Option<SoyDoc>,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub params: Vec<ParamDeclaration>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelTemplate {
    pub mark: Mark,
    pub doc: Option<SoyDoc>,
    pub name: String,
    pub variant: Option<String>,
    pub attributes: Vec<Attribute>,
    pub params: Vec<ParamDeclaration>,
    pub body: Body,
}

/// `{@param name: type}` in a template header, or `@param name` in a doc block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDeclaration {
    pub mark: Mark,
    pub required: bool,
    pub name: String,
    pub type_expr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoyDoc {
    pub mark: Mark,
    pub text: String,
    pub params: Vec<ParamDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub mark: Mark,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum BodyNode {
    Text(TextNode),
    Interpolation(Interpolation),
    Call(Call),
    Let(LetStatement),
    OtherCmd(OtherCmd),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub mark: Mark,
    pub text: String,
}

/// Unparsed text between `{` and `}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpolation {
    pub mark: Mark,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub mark: Mark,
    pub template_name: String,
    /// `{delcall}` rather than `{call}`
    pub delegate: bool,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub mark: Mark,
    pub name: String,
    pub value: BindingValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetStatement {
    pub mark: Mark,
    pub name: String,
    pub value: BindingValue,
}

/// The value bound by `{param}` or `{let}`: inline expression or block body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum BindingValue {
    Expression(Expression),
    Body(Body),
}

/// A control block (`if`, `foreach`, `msg`, ...) with its branches flattened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherCmd {
    pub mark: Mark,
    pub name: String,
    pub body: Body,
}

impl Program {
    pub fn new(mark: Mark, namespace: Vec<String>, templates: Vec<TemplateItem>) -> Self {
        Self {
            mark,
            namespace,
            templates,
        }
    }

    /// Find a template or delegate template by its (resolved) name
    pub fn find(&self, name: &str) -> Option<&TemplateItem> {
        self.templates.iter().find(|item| item.name() == name)
    }
}

impl TemplateItem {
    pub fn name(&self) -> &str {
        match self {
            TemplateItem::Template(t) => &t.name,
            TemplateItem::DelTemplate(t) => &t.name,
        }
    }

    pub fn doc(&self) -> Option<&SoyDoc> {
        match self {
            TemplateItem::Template(t) => t.doc.as_ref(),
            TemplateItem::DelTemplate(t) => t.doc.as_ref(),
        }
    }

    pub fn params(&self) -> &[ParamDeclaration] {
        match self {
            TemplateItem::Template(t) => &t.params,
            TemplateItem::DelTemplate(t) => &t.params,
        }
    }

    pub fn body(&self) -> &[BodyNode] {
        match self {
            TemplateItem::Template(t) => &t.body,
            TemplateItem::DelTemplate(t) => &t.body,
        }
    }

    pub fn mark(&self) -> Mark {
        match self {
            TemplateItem::Template(t) => t.mark,
            TemplateItem::DelTemplate(t) => t.mark,
        }
    }
}

impl Template {
    pub fn new(
        mark: Mark,
        doc: Option<SoyDoc>,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        params: Vec<ParamDeclaration>,
        body: Body,
    ) -> Self {
        Self {
            mark,
            doc,
            name: name.into(),
            attributes,
            params,
            body,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }
}

impl DelTemplate {
    pub fn new(
        mark: Mark,
        doc: Option<SoyDoc>,
        name: impl Into<String>,
        variant: Option<String>,
        attributes: Vec<Attribute>,
        params: Vec<ParamDeclaration>,
        body: Body,
    ) -> Self {
        Self {
            mark,
            doc,
            name: name.into(),
            variant,
            attributes,
            params,
            body,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name == name)
        .map(|attr| attr.value.as_str())
}

impl ParamDeclaration {
    pub fn new(
        mark: Mark,
        required: bool,
        name: impl Into<String>,
        type_expr: impl Into<String>,
    ) -> Self {
        Self {
            mark,
            required,
            name: name.into(),
            type_expr: type_expr.into(),
        }
    }
}

impl SoyDoc {
    pub fn new(mark: Mark, text: impl Into<String>, params: Vec<ParamDeclaration>) -> Self {
        Self {
            mark,
            text: text.into(),
            params,
        }
    }
}

impl Attribute {
    pub fn new(mark: Mark, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            mark,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl TextNode {
    pub fn new(mark: Mark, text: impl Into<String>) -> Self {
        Self {
            mark,
            text: text.into(),
        }
    }
}

impl Interpolation {
    pub fn new(mark: Mark, raw: impl Into<String>) -> Self {
        Self {
            mark,
            raw: raw.into(),
        }
    }
}

impl Call {
    pub fn new(
        mark: Mark,
        template_name: impl Into<String>,
        delegate: bool,
        params: Vec<Param>,
    ) -> Self {
        Self {
            mark,
            template_name: template_name.into(),
            delegate,
            params,
        }
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl Param {
    pub fn new(mark: Mark, name: impl Into<String>, value: BindingValue) -> Self {
        Self {
            mark,
            name: name.into(),
            value,
        }
    }
}

impl LetStatement {
    pub fn new(mark: Mark, name: impl Into<String>, value: BindingValue) -> Self {
        Self {
            mark,
            name: name.into(),
            value,
        }
    }
}

impl OtherCmd {
    pub fn new(mark: Mark, name: impl Into<String>, body: Body) -> Self {
        Self {
            mark,
            name: name.into(),
            body,
        }
    }
}

impl BodyNode {
    pub fn mark(&self) -> Mark {
        match self {
            BodyNode::Text(n) => n.mark,
            BodyNode::Interpolation(n) => n.mark,
            BodyNode::Call(n) => n.mark,
            BodyNode::Let(n) => n.mark,
            BodyNode::OtherCmd(n) => n.mark,
        }
    }

    /// Nodes nested directly under this one, in source order
    pub fn children(&self) -> Vec<&BodyNode> {
        match self {
            BodyNode::Text(_) | BodyNode::Interpolation(_) => Vec::new(),
            BodyNode::Call(call) => call
                .params
                .iter()
                .flat_map(|p| p.value.body().iter())
                .collect(),
            BodyNode::Let(let_stmt) => let_stmt.value.body().iter().collect(),
            BodyNode::OtherCmd(cmd) => cmd.body.iter().collect(),
        }
    }
}

impl BindingValue {
    pub fn expression(&self) -> Option<&Expression> {
        match self {
            BindingValue::Expression(e) => Some(e),
            BindingValue::Body(_) => None,
        }
    }

    /// The block body, or an empty slice for inline values
    pub fn body(&self) -> &[BodyNode] {
        match self {
            BindingValue::Expression(_) => &[],
            BindingValue::Body(body) => body,
        }
    }
}
