//! Template body grammar
//!
//! A body is a sequence of text runs, interpolations, `{call}`/`{delcall}`,
//! `{let}` and control blocks, ending at the closing tag of the enclosing
//! command. Control blocks keep only their content: interior commands such
//! as `{else}` or `{case ...}` are matched and dropped, so every branch ends
//! up in one flat body.
//!
//! `{literal}` content is kept as a single text node and never parsed.

use chumsky::prelude::*;
use std::ops::Range;
use std::sync::Arc;

use super::combinators::{
    close_command, keyword, marked, open_command, raw_until, required_whitespace, template_name,
    unterminated_at_eof, whitespace, Marker, ParserError,
};
use super::declarations::attribute;
use super::expression::{expression, slash_close};
use crate::soy::ast::{
    BindingValue, Body, BodyNode, Call, Interpolation, LetStatement, OtherCmd, Param, TextNode,
};
use crate::soy::namespace::resolve_template_name;

pub(crate) type BodyItemParser = BoxedParser<'static, char, BodyNode, ParserError>;

/// Command words that never start an interpolation
pub const RESERVED_COMMANDS: &[&str] = &[
    "namespace",
    "template",
    "deltemplate",
    "call",
    "delcall",
    "param",
    "let",
    "if",
    "elseif",
    "else",
    "foreach",
    "ifempty",
    "for",
    "msg",
    "fallbackmsg",
    "switch",
    "case",
    "default",
    "plural",
    "select",
    "literal",
    "@param",
];

const CASE_INTERIOR: &[&str] = &["case", "default"];

/// One body item; relative call targets resolve against `namespace`
pub(crate) fn body_item(marker: &Marker, namespace: Arc<Vec<String>>) -> BodyItemParser {
    let marker = marker.clone();

    recursive(move |item| {
        let item: BodyItemParser = item.boxed();

        choice((
            text_run(&marker),
            call(&marker, "call", namespace.clone(), item.clone()),
            call(&marker, "delcall", namespace.clone(), item.clone()),
            let_statement(&marker, item.clone()),
            control_block(&marker, "if", &["elseif", "else"], item.clone()),
            control_block(&marker, "foreach", &["ifempty"], item.clone()),
            control_block(&marker, "for", &[], item.clone()),
            control_block(&marker, "msg", &["fallbackmsg"], item.clone()),
            control_block(&marker, "switch", CASE_INTERIOR, item.clone()),
            control_block(&marker, "plural", CASE_INTERIOR, item.clone()),
            control_block(&marker, "select", CASE_INTERIOR, item),
            literal(&marker),
            interpolation(&marker),
        ))
    })
    .boxed()
}

/// Items up to and including `{/name}`, with the `interior` commands dropped
pub(crate) fn body_content(
    name: &'static str,
    interior: &[&'static str],
    item: BodyItemParser,
) -> impl Parser<char, Body, Error = ParserError> + Clone {
    open_command(interior)
        .to(None)
        .or(item.map(Some))
        .repeated()
        .then_ignore(close_command(name))
        .map(|nodes: Vec<Option<BodyNode>>| nodes.into_iter().flatten().collect())
}

fn text_run(marker: &Marker) -> impl Parser<char, BodyNode, Error = ParserError> + Clone {
    marked(
        marker,
        none_of("{").repeated().at_least(1).collect::<String>(),
        |mark, text: String| BodyNode::Text(TextNode::new(mark, text)),
    )
}

/// `{...}` that is not a command, kept as written
fn interpolation(marker: &Marker) -> impl Parser<char, BodyNode, Error = ParserError> + Clone {
    let raw = just('{')
        .ignore_then(raw_until(just('}'), true))
        .try_map(|raw: String, span: Range<usize>| {
            if is_command(&raw) {
                Err(Simple::custom(
                    span,
                    format!("unexpected command `{{{}}}`", raw.trim()),
                ))
            } else {
                Ok(raw)
            }
        });

    marked(marker, raw, |mark, raw: String| {
        BodyNode::Interpolation(Interpolation::new(mark, raw))
    })
}

/// Closing tags and reserved command words cannot be interpolated
fn is_command(raw: &str) -> bool {
    let raw = raw.trim_start();
    if raw.starts_with('/') {
        return true;
    }
    let word_end = raw
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '@'))
        .unwrap_or(raw.len());
    RESERVED_COMMANDS.contains(&&raw[..word_end])
}

/// `{call name .../}` or `{call name ...}{param ...}...{/call}`, same for `delcall`
fn call(
    marker: &Marker,
    command: &'static str,
    namespace: Arc<Vec<String>>,
    item: BodyItemParser,
) -> impl Parser<char, BodyNode, Error = ParserError> + Clone {
    let delegate = command == "delcall";
    let head = just('{')
        .ignore_then(keyword(command))
        .ignore_then(required_whitespace())
        .ignore_then(template_name());
    let extra = take_until(just("/}").ignored().or(just('}').ignored()).rewind()).ignored();

    let self_closing = just("/}").to(Vec::new());
    let with_params = just('}')
        .ignore_then(whitespace().ignore_then(param(marker, item)).repeated())
        .then_ignore(whitespace())
        .then_ignore(close_command(command));

    let call = head
        .then_ignore(extra)
        .then(self_closing.or(with_params));

    unterminated_at_eof(marker, marked(
        marker,
        call,
        move |mark, (name, params): (String, Vec<Param>)| {
            let template_name = if delegate {
                name
            } else {
                resolve_template_name(&name, namespace.as_slice())
            };
            BodyNode::Call(Call::new(mark, template_name, delegate, params))
        },
    ))
}

/// `{param name: expr /}` or `{param name}...{/param}`
fn param(marker: &Marker, item: BodyItemParser) -> impl Parser<char, Param, Error = ParserError> + Clone {
    let head = just('{')
        .ignore_then(keyword("param"))
        .ignore_then(required_whitespace())
        .ignore_then(text::ident());

    unterminated_at_eof(marker, marked(
        marker,
        head.then(binding_value(marker, "param", item)),
        |mark, (name, value): (String, BindingValue)| Param::new(mark, name, value),
    ))
}

/// `{let $name: expr /}` or `{let $name}...{/let}`
fn let_statement(
    marker: &Marker,
    item: BodyItemParser,
) -> impl Parser<char, BodyNode, Error = ParserError> + Clone {
    let head = just('{')
        .ignore_then(keyword("let"))
        .ignore_then(required_whitespace())
        .ignore_then(just('$'))
        .ignore_then(text::ident());

    unterminated_at_eof(marker, marked(
        marker,
        head.then(binding_value(marker, "let", item)),
        |mark, (name, value): (String, BindingValue)| {
            BodyNode::Let(LetStatement::new(mark, name, value))
        },
    ))
}

/// The part of `{param}`/`{let}` after the bound name
fn binding_value(
    marker: &Marker,
    command: &'static str,
    item: BodyItemParser,
) -> impl Parser<char, BindingValue, Error = ParserError> + Clone {
    let inline = whitespace()
        .ignore_then(just(':'))
        .ignore_then(whitespace())
        .ignore_then(expression(marker, slash_close()))
        .then_ignore(slash_close())
        .map(BindingValue::Expression);

    let block = required_whitespace()
        .ignore_then(attribute(marker))
        .repeated()
        .then_ignore(whitespace())
        .then_ignore(just('}'))
        .ignore_then(body_content(command, &[], item))
        .map(BindingValue::Body);

    inline.or(block)
}

/// `{name ...}` content `{/name}` with `interior` commands flattened away
fn control_block(
    marker: &Marker,
    name: &'static str,
    interior: &[&'static str],
    item: BodyItemParser,
) -> impl Parser<char, BodyNode, Error = ParserError> + Clone {
    let block = open_command(&[name]).ignore_then(body_content(name, interior, item));

    unterminated_at_eof(marker, marked(marker, block, move |mark, body: Body| {
        BodyNode::OtherCmd(OtherCmd::new(mark, name, body))
    }))
}

fn literal(marker: &Marker) -> impl Parser<char, BodyNode, Error = ParserError> + Clone {
    let content = marked(
        marker,
        raw_until(close_command("literal"), false),
        |mark, text: String| TextNode::new(mark, text),
    );
    let block = just('{')
        .ignore_then(keyword("literal"))
        .then_ignore(whitespace())
        .then_ignore(just('}'))
        .ignore_then(content)
        .then_ignore(close_command("literal"));

    unterminated_at_eof(marker, marked(marker, block, |mark, content: TextNode| {
        let body = if content.text.is_empty() {
            Vec::new()
        } else {
            vec![BodyNode::Text(content)]
        };
        BodyNode::OtherCmd(OtherCmd::new(mark, "literal", body))
    }))
}
