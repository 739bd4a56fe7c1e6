//! AST traits - Common interface for uniform node access

use super::expression::Expression;
use super::node::{
    Attribute, BodyNode, Param, ParamDeclaration, Program, SoyDoc, TemplateItem,
};
use super::span::Mark;

/// Common interface for all AST nodes
pub trait AstNode {
    fn node_type(&self) -> &'static str;
    fn display_label(&self) -> String;
    fn mark(&self) -> Mark;
}

impl AstNode for Program {
    fn node_type(&self) -> &'static str {
        "Program"
    }

    fn display_label(&self) -> String {
        self.namespace.join(".")
    }

    fn mark(&self) -> Mark {
        self.mark
    }
}

impl AstNode for TemplateItem {
    fn node_type(&self) -> &'static str {
        match self {
            TemplateItem::Template(_) => "Template",
            TemplateItem::DelTemplate(_) => "DelTemplate",
        }
    }

    fn display_label(&self) -> String {
        match self {
            TemplateItem::DelTemplate(t) => match &t.variant {
                Some(variant) => format!("{} ({})", t.name, variant),
                None => t.name.clone(),
            },
            TemplateItem::Template(t) => t.name.clone(),
        }
    }

    fn mark(&self) -> Mark {
        TemplateItem::mark(self)
    }
}

impl AstNode for SoyDoc {
    fn node_type(&self) -> &'static str {
        "SoyDoc"
    }

    fn display_label(&self) -> String {
        self.text.lines().next().unwrap_or_default().to_string()
    }

    fn mark(&self) -> Mark {
        self.mark
    }
}

impl AstNode for ParamDeclaration {
    fn node_type(&self) -> &'static str {
        "ParamDeclaration"
    }

    fn display_label(&self) -> String {
        let marker = if self.required { "" } else { "?" };
        format!("{}{}: {}", self.name, marker, self.type_expr)
    }

    fn mark(&self) -> Mark {
        self.mark
    }
}

impl AstNode for Attribute {
    fn node_type(&self) -> &'static str {
        "Attribute"
    }

    fn display_label(&self) -> String {
        format!("{}=\"{}\"", self.name, self.value)
    }

    fn mark(&self) -> Mark {
        self.mark
    }
}

impl AstNode for BodyNode {
    fn node_type(&self) -> &'static str {
        match self {
            BodyNode::Text(_) => "Text",
            BodyNode::Interpolation(_) => "Interpolation",
            BodyNode::Call(_) => "Call",
            BodyNode::Let(_) => "Let",
            BodyNode::OtherCmd(_) => "OtherCmd",
        }
    }

    fn display_label(&self) -> String {
        match self {
            BodyNode::Text(t) => format!("{:?}", t.text),
            BodyNode::Interpolation(i) => format!("{{{}}}", i.raw),
            BodyNode::Call(c) if c.delegate => format!("delcall {}", c.template_name),
            BodyNode::Call(c) => c.template_name.clone(),
            BodyNode::Let(l) => format!("${}", l.name),
            BodyNode::OtherCmd(o) => o.name.clone(),
        }
    }

    fn mark(&self) -> Mark {
        BodyNode::mark(self)
    }
}

impl AstNode for Param {
    fn node_type(&self) -> &'static str {
        "Param"
    }

    fn display_label(&self) -> String {
        self.name.clone()
    }

    fn mark(&self) -> Mark {
        self.mark
    }
}

impl AstNode for Expression {
    fn node_type(&self) -> &'static str {
        match self {
            Expression::Reference(_) => "Reference",
            Expression::String(_) => "StringLiteral",
            Expression::Boolean(_) => "BooleanLiteral",
            Expression::Number(_) => "NumberLiteral",
            Expression::Map(_) => "MapLiteral",
            Expression::FunctionCall(_) => "FunctionCall",
            Expression::Ternary(_) => "Ternary",
            Expression::Other(_) => "OtherExpression",
        }
    }

    fn display_label(&self) -> String {
        self.to_source()
    }

    fn mark(&self) -> Mark {
        Expression::mark(self)
    }
}
