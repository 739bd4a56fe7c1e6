//! Treeviz formatter for parsed programs

use crate::soy::ast::{
    AstNode, BindingValue, BodyNode, Expression, Param, ParamDeclaration, Program, SoyDoc,
    TemplateItem,
};

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Anything that gets its own line in the tree
#[derive(Clone, Copy)]
enum Entry<'a> {
    Template(&'a TemplateItem),
    Doc(&'a SoyDoc),
    Declaration(&'a ParamDeclaration),
    Body(&'a BodyNode),
    Param(&'a Param),
    Expression(&'a Expression),
}

impl<'a> Entry<'a> {
    fn node(&self) -> &'a dyn AstNode {
        match *self {
            Entry::Template(n) => n,
            Entry::Doc(n) => n,
            Entry::Declaration(n) => n,
            Entry::Body(n) => n,
            Entry::Param(n) => n,
            Entry::Expression(n) => n,
        }
    }

    fn children(&self) -> Vec<Entry<'a>> {
        match *self {
            Entry::Template(item) => item
                .doc()
                .map(Entry::Doc)
                .into_iter()
                .chain(item.params().iter().map(Entry::Declaration))
                .chain(item.body().iter().map(Entry::Body))
                .collect(),
            Entry::Doc(doc) => doc.params.iter().map(Entry::Declaration).collect(),
            Entry::Declaration(_) => Vec::new(),
            Entry::Body(node) => match node {
                BodyNode::Call(call) => call.params.iter().map(Entry::Param).collect(),
                BodyNode::Let(stmt) => binding(&stmt.value),
                BodyNode::OtherCmd(cmd) => cmd.body.iter().map(Entry::Body).collect(),
                BodyNode::Text(_) | BodyNode::Interpolation(_) => Vec::new(),
            },
            Entry::Param(param) => binding(&param.value),
            Entry::Expression(expression) => match expression {
                Expression::Ternary(t) => vec![
                    Entry::Expression(&t.cond),
                    Entry::Expression(&t.left),
                    Entry::Expression(&t.right),
                ],
                Expression::Map(map) => map
                    .items
                    .iter()
                    .map(|item| Entry::Expression(&item.value))
                    .collect(),
                Expression::FunctionCall(call) => call.args.iter().map(Entry::Expression).collect(),
                _ => Vec::new(),
            },
        }
    }
}

fn binding(value: &BindingValue) -> Vec<Entry<'_>> {
    match value {
        BindingValue::Expression(expression) => vec![Entry::Expression(expression)],
        BindingValue::Body(body) => body.iter().map(Entry::Body).collect(),
    }
}

pub fn to_treeviz_str(program: &Program) -> String {
    let mut result = String::new();
    let entries: Vec<Entry> = program.templates.iter().map(Entry::Template).collect();
    append_entries(&mut result, &entries, "");
    result
}

fn append_entries(result: &mut String, entries: &[Entry], prefix: &str) {
    for (i, entry) in entries.iter().enumerate() {
        let is_last = i == entries.len() - 1;
        append_entry(result, entry, prefix, is_last);
    }
}

fn append_entry(result: &mut String, entry: &Entry, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let node = entry.node();

    result.push_str(&format!(
        "{}{} {}: {}\n",
        prefix,
        connector,
        node.node_type(),
        truncate(&node.display_label(), LABEL_WIDTH)
    ));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_entries(result, &entry.children(), &new_prefix);
}
