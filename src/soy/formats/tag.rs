//! XML-like AST tag serialization
//!
//! Serializes a parsed program to an XML-like format that directly reflects
//! the AST structure.
//!
//! ## Format
//!
//! - Node type → tag name
//! - Names, flags and raw values → attributes
//! - Text content and expression source → element text
//! - Children → nested elements
//!
//! ## Example
//!
//! ```text
//! <program namespace="examples.simple">
//!   <template name="examples.simple.hello">
//!     <param name="name" required="false" type="string"/>
//!     <text>Hello </text>
//!     <interpolation>$name</interpolation>
//!   </template>
//! </program>
//! ```

use crate::soy::ast::{
    Attribute, BindingValue, BodyNode, Expression, ParamDeclaration, Program, SoyDoc,
    TemplateItem,
};

/// Serialize a program to AST tag format
pub fn serialize_program(program: &Program) -> String {
    let mut result = String::new();
    result.push_str(&format!(
        "<program namespace=\"{}\">\n",
        escape_xml(&program.namespace.join("."))
    ));
    for item in &program.templates {
        serialize_template(item, 1, &mut result);
    }
    result.push_str("</program>");
    result
}

fn serialize_template(item: &TemplateItem, indent_level: usize, output: &mut String) {
    let indent = "  ".repeat(indent_level);
    let (tag, attributes) = match item {
        TemplateItem::Template(t) => ("template", &t.attributes),
        TemplateItem::DelTemplate(t) => ("deltemplate", &t.attributes),
    };

    output.push_str(&format!("{}<{} name=\"{}\"", indent, tag, escape_xml(item.name())));
    if let TemplateItem::DelTemplate(t) = item {
        if let Some(variant) = &t.variant {
            output.push_str(&format!(" variant=\"{}\"", escape_xml(variant)));
        }
    }
    output.push_str(">\n");

    if let Some(doc) = item.doc() {
        serialize_doc(doc, indent_level + 1, output);
    }
    for attribute in attributes {
        serialize_attribute(attribute, indent_level + 1, output);
    }
    for param in item.params() {
        serialize_declaration(param, indent_level + 1, output);
    }
    for node in item.body() {
        serialize_body_node(node, indent_level + 1, output);
    }

    output.push_str(&format!("{}</{}>\n", indent, tag));
}

fn serialize_doc(doc: &SoyDoc, indent_level: usize, output: &mut String) {
    let indent = "  ".repeat(indent_level);
    output.push_str(&format!("{}<doc>{}", indent, escape_xml(&doc.text)));
    if doc.params.is_empty() {
        output.push_str("</doc>\n");
        return;
    }
    output.push('\n');
    for param in &doc.params {
        serialize_declaration(param, indent_level + 1, output);
    }
    output.push_str(&format!("{}</doc>\n", indent));
}

fn serialize_attribute(attribute: &Attribute, indent_level: usize, output: &mut String) {
    output.push_str(&format!(
        "{}<attribute name=\"{}\">{}</attribute>\n",
        "  ".repeat(indent_level),
        escape_xml(&attribute.name),
        escape_xml(&attribute.value)
    ));
}

fn serialize_declaration(param: &ParamDeclaration, indent_level: usize, output: &mut String) {
    output.push_str(&format!(
        "{}<param name=\"{}\" required=\"{}\" type=\"{}\"/>\n",
        "  ".repeat(indent_level),
        escape_xml(&param.name),
        param.required,
        escape_xml(&param.type_expr)
    ));
}

/// Serialize a body node (recursive)
fn serialize_body_node(node: &BodyNode, indent_level: usize, output: &mut String) {
    let indent = "  ".repeat(indent_level);

    match node {
        BodyNode::Text(text) => {
            output.push_str(&format!("{}<text>{}</text>\n", indent, escape_xml(&text.text)));
        }
        BodyNode::Interpolation(interpolation) => {
            output.push_str(&format!(
                "{}<interpolation>{}</interpolation>\n",
                indent,
                escape_xml(&interpolation.raw)
            ));
        }
        BodyNode::Call(call) => {
            let tag = if call.delegate { "delcall" } else { "call" };
            output.push_str(&format!(
                "{}<{} template=\"{}\"",
                indent,
                tag,
                escape_xml(&call.template_name)
            ));
            if call.params.is_empty() {
                output.push_str("/>\n");
                return;
            }
            output.push_str(">\n");
            for param in &call.params {
                serialize_binding("with-param", &param.name, &param.value, indent_level + 1, output);
            }
            output.push_str(&format!("{}</{}>\n", indent, tag));
        }
        BodyNode::Let(stmt) => {
            serialize_binding("let", &stmt.name, &stmt.value, indent_level, output);
        }
        BodyNode::OtherCmd(cmd) => {
            if cmd.body.is_empty() {
                output.push_str(&format!("{}<{}/>\n", indent, cmd.name));
                return;
            }
            output.push_str(&format!("{}<{}>\n", indent, cmd.name));
            for child in &cmd.body {
                serialize_body_node(child, indent_level + 1, output);
            }
            output.push_str(&format!("{}</{}>\n", indent, cmd.name));
        }
    }
}

fn serialize_binding(
    tag: &str,
    name: &str,
    value: &BindingValue,
    indent_level: usize,
    output: &mut String,
) {
    let indent = "  ".repeat(indent_level);
    match value {
        BindingValue::Expression(expression) => {
            output.push_str(&format!(
                "{}<{} name=\"{}\" expression=\"{}\">{}</{}>\n",
                indent,
                tag,
                escape_xml(name),
                expression_kind(expression),
                escape_xml(&expression.to_source()),
                tag
            ));
        }
        BindingValue::Body(body) => {
            output.push_str(&format!("{}<{} name=\"{}\">\n", indent, tag, escape_xml(name)));
            for node in body {
                serialize_body_node(node, indent_level + 1, output);
            }
            output.push_str(&format!("{}</{}>\n", indent, tag));
        }
    }
}

fn expression_kind(expression: &Expression) -> &'static str {
    match expression {
        Expression::Reference(_) => "reference",
        Expression::String(_) => "string",
        Expression::Boolean(_) => "boolean",
        Expression::Number(_) => "number",
        Expression::Map(_) => "map",
        Expression::FunctionCall(_) => "function-call",
        Expression::Ternary(_) => "ternary",
        Expression::Other(_) => "other",
    }
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
