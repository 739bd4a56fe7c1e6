//! Fluent assertion API for AST nodes

use super::matchers::TextMatch;
use crate::soy::ast::{
    AstNode, BindingValue, BodyNode, Call, Expression, LetStatement, OtherCmd, Program,
    TemplateItem, TextNode,
};

// ============================================================================
// Entry Points
// ============================================================================

/// Create an assertion builder for a parsed program
pub fn assert_ast(program: &Program) -> ProgramAssertion<'_> {
    ProgramAssertion { program }
}

/// Create an assertion builder for an expression
pub fn assert_expression(expression: &Expression) -> ExpressionAssertion<'_> {
    ExpressionAssertion {
        expression,
        context: "expression".to_string(),
    }
}

fn summarize(nodes: &[BodyNode]) -> String {
    nodes
        .iter()
        .map(|node| format!("{}({})", node.node_type(), node.display_label()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Program Assertions
// ============================================================================

pub struct ProgramAssertion<'a> {
    program: &'a Program,
}

impl<'a> ProgramAssertion<'a> {
    /// Assert the dotted namespace
    pub fn namespace(self, expected: &str) -> Self {
        assert_eq!(self.program.namespace.join("."), expected, "program namespace");
        self
    }

    pub fn template_count(self, expected: usize) -> Self {
        let names: Vec<&str> = self.program.templates.iter().map(|t| t.name()).collect();
        assert_eq!(
            names.len(),
            expected,
            "Expected {} templates, found {}: {:?}",
            expected,
            names.len(),
            names
        );
        self
    }

    /// Assert on a specific template by index
    pub fn template<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(TemplateAssertion<'a>),
    {
        assert!(
            index < self.program.templates.len(),
            "Template index {} out of bounds (program has {} templates)",
            index,
            self.program.templates.len()
        );
        assertion(TemplateAssertion {
            item: &self.program.templates[index],
            context: format!("templates[{}]", index),
        });
        self
    }
}

// ============================================================================
// Template Assertions
// ============================================================================

pub struct TemplateAssertion<'a> {
    item: &'a TemplateItem,
    context: String,
}

impl<'a> TemplateAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(self.item.name(), expected, "{}: template name", self.context);
        self
    }

    /// Assert this is a `{deltemplate}` with the given variant
    pub fn delegate(self, variant: Option<&str>) -> Self {
        match self.item {
            TemplateItem::DelTemplate(t) => assert_eq!(
                t.variant.as_deref(),
                variant,
                "{}: deltemplate variant",
                self.context
            ),
            TemplateItem::Template(t) => panic!(
                "{}: Expected DelTemplate, found Template '{}'",
                self.context, t.name
            ),
        }
        self
    }

    pub fn param_count(self, expected: usize) -> Self {
        assert_eq!(
            self.item.params().len(),
            expected,
            "{}: header param count",
            self.context
        );
        self
    }

    /// Assert a header `{@param}` by index
    pub fn param(self, index: usize, name: &str, required: bool, type_expr: &str) -> Self {
        let param = self.item.params().get(index).unwrap_or_else(|| {
            panic!("{}: no header param at index {}", self.context, index)
        });
        assert_eq!(
            (param.name.as_str(), param.required, param.type_expr.as_str()),
            (name, required, type_expr),
            "{}: params[{}]",
            self.context,
            index
        );
        self
    }

    /// Assert the doc block text
    pub fn doc(self, expected: impl Into<TextMatch>) -> Self {
        let doc = self
            .item
            .doc()
            .unwrap_or_else(|| panic!("{}: Expected a doc block, found none", self.context));
        expected
            .into()
            .assert(&doc.text, &format!("{}.doc", self.context));
        self
    }

    /// Assert the names of the `@param` annotations in the doc block
    pub fn doc_params(self, expected: &[&str]) -> Self {
        let names: Vec<&str> = self
            .item
            .doc()
            .map(|doc| doc.params.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, expected, "{}: doc params", self.context);
        self
    }

    pub fn body<F>(self, assertion: F) -> Self
    where
        F: FnOnce(BodyAssertion<'a>),
    {
        assertion(BodyAssertion {
            nodes: self.item.body(),
            context: format!("{}.body", self.context),
        });
        self
    }
}

// ============================================================================
// Body Assertions
// ============================================================================

pub struct BodyAssertion<'a> {
    nodes: &'a [BodyNode],
    context: String,
}

impl<'a> BodyAssertion<'a> {
    pub fn node_count(self, expected: usize) -> Self {
        assert_eq!(
            self.nodes.len(),
            expected,
            "{}: Expected {} nodes, found {}: [{}]",
            self.context,
            expected,
            self.nodes.len(),
            summarize(self.nodes)
        );
        self
    }

    /// Assert on a specific node by index
    pub fn node<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BodyNodeAssertion<'a>),
    {
        assert!(
            index < self.nodes.len(),
            "{}: node index {} out of bounds ({} nodes)",
            self.context,
            index,
            self.nodes.len()
        );
        assertion(BodyNodeAssertion {
            node: &self.nodes[index],
            context: format!("{}[{}]", self.context, index),
        });
        self
    }
}

pub struct BodyNodeAssertion<'a> {
    node: &'a BodyNode,
    context: String,
}

impl<'a> BodyNodeAssertion<'a> {
    fn unexpected(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {} {}",
            self.context,
            expected,
            self.node.node_type(),
            self.node.display_label()
        )
    }

    pub fn assert_text(self) -> TextNodeAssertion<'a> {
        match self.node {
            BodyNode::Text(text) => TextNodeAssertion {
                text,
                context: self.context,
            },
            _ => self.unexpected("Text"),
        }
    }

    /// Assert this node is an interpolation with the given raw content
    pub fn assert_interpolation(self, raw: &str) {
        match self.node {
            BodyNode::Interpolation(i) => {
                assert_eq!(i.raw, raw, "{}: interpolation", self.context)
            }
            _ => self.unexpected("Interpolation"),
        }
    }

    pub fn assert_call(self) -> CallAssertion<'a> {
        match self.node {
            BodyNode::Call(call) => CallAssertion {
                call,
                context: self.context,
            },
            _ => self.unexpected("Call"),
        }
    }

    pub fn assert_let(self) -> LetAssertion<'a> {
        match self.node {
            BodyNode::Let(stmt) => LetAssertion {
                stmt,
                context: self.context,
            },
            _ => self.unexpected("Let"),
        }
    }

    /// Assert this node is the control block `name`
    pub fn assert_command(self, name: &str) -> CommandAssertion<'a> {
        match self.node {
            BodyNode::OtherCmd(cmd) if cmd.name == name => CommandAssertion {
                cmd,
                context: self.context,
            },
            _ => self.unexpected(&format!("{{{}}} block", name)),
        }
    }
}

pub struct TextNodeAssertion<'a> {
    text: &'a TextNode,
    context: String,
}

impl<'a> TextNodeAssertion<'a> {
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected.into().assert(&self.text.text, &self.context);
        self
    }
}

pub struct CallAssertion<'a> {
    call: &'a Call,
    context: String,
}

impl<'a> CallAssertion<'a> {
    pub fn template_name(self, expected: &str) -> Self {
        assert_eq!(self.call.template_name, expected, "{}: call target", self.context);
        self
    }

    pub fn delegate(self, expected: bool) -> Self {
        assert_eq!(self.call.delegate, expected, "{}: delcall", self.context);
        self
    }

    pub fn param_names(self, expected: &[&str]) -> Self {
        let names: Vec<&str> = self.call.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, expected, "{}: call params", self.context);
        self
    }

    /// Assert on the inline expression bound to `name`
    pub fn param_expression<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        let param = self
            .call
            .param(name)
            .unwrap_or_else(|| panic!("{}: no param named {:?}", self.context, name));
        match &param.value {
            BindingValue::Expression(expression) => assertion(ExpressionAssertion {
                expression,
                context: format!("{}.{}", self.context, name),
            }),
            BindingValue::Body(_) => {
                panic!("{}: param {:?} has a block body", self.context, name)
            }
        }
        self
    }

    /// Assert on the block body bound to `name`
    pub fn param_body<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(BodyAssertion<'a>),
    {
        let param = self
            .call
            .param(name)
            .unwrap_or_else(|| panic!("{}: no param named {:?}", self.context, name));
        match &param.value {
            BindingValue::Body(nodes) => assertion(BodyAssertion {
                nodes,
                context: format!("{}.{}", self.context, name),
            }),
            BindingValue::Expression(e) => panic!(
                "{}: param {:?} is inline ({})",
                self.context,
                name,
                e.to_source()
            ),
        }
        self
    }
}

pub struct LetAssertion<'a> {
    stmt: &'a LetStatement,
    context: String,
}

impl<'a> LetAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(self.stmt.name, expected, "{}: let name", self.context);
        self
    }

    pub fn expression<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExpressionAssertion<'a>),
    {
        match &self.stmt.value {
            BindingValue::Expression(expression) => assertion(ExpressionAssertion {
                expression,
                context: format!("{}.value", self.context),
            }),
            BindingValue::Body(_) => panic!("{}: let has a block body", self.context),
        }
        self
    }

    pub fn body<F>(self, assertion: F) -> Self
    where
        F: FnOnce(BodyAssertion<'a>),
    {
        match &self.stmt.value {
            BindingValue::Body(nodes) => assertion(BodyAssertion {
                nodes,
                context: format!("{}.body", self.context),
            }),
            BindingValue::Expression(_) => panic!("{}: let is inline", self.context),
        }
        self
    }
}

pub struct CommandAssertion<'a> {
    cmd: &'a OtherCmd,
    context: String,
}

impl<'a> CommandAssertion<'a> {
    pub fn body<F>(self, assertion: F) -> Self
    where
        F: FnOnce(BodyAssertion<'a>),
    {
        assertion(BodyAssertion {
            nodes: &self.cmd.body,
            context: format!("{}.{}", self.context, self.cmd.name),
        });
        self
    }
}

// ============================================================================
// Expression Assertions
// ============================================================================

pub struct ExpressionAssertion<'a> {
    expression: &'a Expression,
    context: String,
}

impl<'a> ExpressionAssertion<'a> {
    /// Assert the node type, e.g. `"Ternary"` or `"OtherExpression"`
    pub fn node_type(self, expected: &str) -> Self {
        assert_eq!(
            self.expression.node_type(),
            expected,
            "{}: {}",
            self.context,
            self.expression.to_source()
        );
        self
    }

    /// Assert the canonical source rendering
    pub fn source(self, expected: &str) -> Self {
        assert_eq!(self.expression.to_source(), expected, "{}", self.context);
        self
    }

    /// Assert the marked text in `source`
    pub fn marks(self, source: &str, expected: &str) -> Self {
        assert_eq!(
            self.expression.mark().slice(source),
            expected,
            "{}: marked text",
            self.context
        );
        self
    }
}
