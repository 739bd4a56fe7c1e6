//! Parser tests over complete soy files

use super::*;
use crate::soy::ast::expression::Expression as Expr;
use crate::soy::testing::{assert_ast, assert_expression, TextMatch};

const GREETING: &str = r#"{namespace examples.simple}

/**
 * Says hello to a person.
 * Falls back to a generic greeting.
 * @param? name the person
 */
{template .hello}
  {@param? name: string}
  Hello {$name ?: 'there'}!
{/template}

/** Lists items. */
{template .list autoescape="strict"}
  {@param items: list<string>}
  {foreach $item in $items}
    {call .hello}
      {param name: $item /}
    {/call}
  {ifempty}
    Nothing.
  {/foreach}
{/template}

{deltemplate examples.menu variant="'compact'"}
  {delcall examples.item /}
{/deltemplate}
"#;

fn parse_ok(source: &str) -> Program {
    match parse(source) {
        Ok(program) => program,
        Err(error) => panic!("parse failed: {}\nsource:\n{}", error, source),
    }
}

/// Wrap a template body in a minimal file
fn body_source(body: &str) -> String {
    format!("{{namespace t}}\n{{template .t}}{}{{/template}}", body)
}

/// Text of every leaf in order, descending into blocks
fn leaf_text<'a>(nodes: impl IntoIterator<Item = &'a BodyNode>, out: &mut String) {
    for node in nodes {
        match node {
            BodyNode::Text(text) => out.push_str(&text.text),
            BodyNode::Interpolation(i) => out.push_str(&i.raw),
            other => leaf_text(other.children(), out),
        }
    }
}

fn first_let_expression(program: &Program) -> &Expr {
    match &program.templates[0].body()[0] {
        BodyNode::Let(stmt) => stmt.value.expression().expect("inline let"),
        other => panic!("expected let, found {:?}", other),
    }
}

#[test]
fn test_parses_complete_file() {
    let program = parse_ok(GREETING);

    assert_ast(&program)
        .namespace("examples.simple")
        .template_count(3)
        .template(0, |t| {
            t.name("examples.simple.hello")
                .doc("Says hello to a person.\nFalls back to a generic greeting.")
                .doc_params(&["name"])
                .param_count(1)
                .param(0, "name", false, "string");
        })
        .template(1, |t| {
            t.name("examples.simple.list")
                .doc(TextMatch::StartsWith("Lists".into()))
                .param(0, "items", true, "list<string>");
        })
        .template(2, |t| {
            t.name("examples.menu").delegate(Some("'compact'"));
        });
}

#[test]
fn test_template_count_matches_declarations() {
    let source = "{namespace n}\n{template .a}A{/template}\n// note\n{template .b}{/template}\n/* x */{deltemplate d}D{/deltemplate}";
    assert_ast(&parse_ok(source)).template_count(3);
}

#[test]
fn test_foreach_and_call_structure() {
    let program = parse_ok(GREETING);
    let item = program.find("examples.simple.list").expect("list template");
    let foreach = item
        .body()
        .iter()
        .find(|node| matches!(node, BodyNode::OtherCmd(cmd) if cmd.name == "foreach"))
        .expect("foreach block");

    let children = foreach.children();
    let call = children
        .iter()
        .find_map(|node| match node {
            BodyNode::Call(call) => Some(call),
            _ => None,
        })
        .expect("call inside foreach");
    assert_eq!(call.template_name, "examples.simple.hello");
    assert!(matches!(
        call.param("name").and_then(|p| p.value.expression()),
        Some(Expr::Reference(r)) if r.name == "item"
    ));

    // the {ifempty} branch ends up in the same body
    assert!(children
        .iter()
        .any(|node| matches!(node, BodyNode::Text(t) if t.text.contains("Nothing."))));
}

#[test]
fn test_ternary_of_references() {
    let program = parse_ok(&body_source("{let $v: $a ? $b : $c /}"));
    let expr = first_let_expression(&program);

    let Expr::Ternary(ternary) = expr else {
        panic!("expected ternary, found {:?}", expr);
    };
    assert_expression(&ternary.cond).source("$a");
    assert_expression(&ternary.left).source("$b");
    assert_expression(&ternary.right).source("$c");
}

#[test]
fn test_ternary_missing_false_branch_fails() {
    assert!(parse(&body_source("{let $v: $a ? $b /}")).is_err());
}

#[test]
fn test_unrecognized_expression_is_kept_verbatim() {
    let program = parse_ok(&body_source("{let $v: 1 + 2 /}"));
    assert_expression(first_let_expression(&program))
        .node_type("OtherExpression")
        .source("1 + 2");
}

#[test]
fn test_string_literal_mark_spans_quotes() {
    let source = body_source("{let $v: 'hi there' /}");
    let program = parse_ok(&source);
    assert_expression(first_let_expression(&program))
        .node_type("StringLiteral")
        .marks(&source, "'hi there'");
}

#[test]
fn test_if_else_is_erased() {
    let program = parse_ok(&body_source("{if $x}A{else}B{/if}"));
    assert_ast(&program).template(0, |t| {
        t.body(|body| {
            body.node_count(1).node(0, |node| {
                node.assert_command("if").body(|inner| {
                    inner
                        .node_count(2)
                        .node(0, |n| {
                            n.assert_text().text("A");
                        })
                        .node(1, |n| {
                            n.assert_text().text("B");
                        });
                });
            });
        });
    });
}

#[test]
fn test_leaf_text_round_trip() {
    let program = parse_ok(&body_source(
        "Dear {$name},{if $vip} thanks{else} hello{/if}{literal}{raw}{/literal}.",
    ));
    let mut text = String::new();
    leaf_text(program.templates[0].body(), &mut text);
    assert_eq!(text, "Dear $name, thanks hello{raw}.");
}

#[test]
fn test_unterminated_template_points_at_opening_tag() {
    let error = parse("{namespace a}\n{template .foo}A").unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::Unterminated {
            command: "template".to_string()
        }
    );
    assert_eq!((error.line, error.column, error.offset), (2, 1, 14));
    assert!(error.to_string().contains("{/template}"));
}

#[test]
fn test_unterminated_inner_block_is_reported() {
    let error = parse("{namespace a}\n{template .foo}\n  {if $x}A").unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::Unterminated {
            command: "if".to_string()
        }
    );
    assert_eq!((error.line, error.column), (3, 3));
}

#[test]
fn test_map_with_numeric_key_fails() {
    assert!(parse(&body_source("{let $m: [1: 'x'] /}")).is_err());
}

#[test]
fn test_map_literal_in_call_param() {
    let program = parse_ok(&body_source(
        "{call .x}{param opts: ['size': 2, 'label': 'ok'] /}{/call}",
    ));
    assert_ast(&program).template(0, |t| {
        t.body(|body| {
            body.node(0, |node| {
                node.assert_call()
                    .template_name("t.x")
                    .param_expression("opts", |e| {
                        e.node_type("MapLiteral")
                            .source("['size': 2, 'label': 'ok']");
                    });
            });
        });
    });
}

#[test]
fn test_doc_param_extraction() {
    let source = "{namespace a}\n/**\n * First line.\n * @param? bar\n * Second line.\n */\n{template .t}{/template}";
    let program = parse_ok(source);
    let doc = program.templates[0].doc().expect("doc block");

    assert_eq!(doc.text, "First line.\nSecond line.");
    assert_eq!(doc.params.len(), 1);
    assert_eq!(doc.params[0].name, "bar");
    assert!(!doc.params[0].required);
    assert_eq!(doc.params[0].type_expr, "any");
}

#[test]
fn test_marks_nest_within_parents() {
    let program = parse_ok(GREETING);
    for item in &program.templates {
        assert!(program.mark.encloses(&item.mark()));
        for node in item.body() {
            assert!(item.mark().encloses(&node.mark()));
            for child in node.children() {
                assert!(node.mark().encloses(&child.mark()));
            }
        }
    }
}

#[test]
fn test_else_outside_if_fails() {
    assert!(parse(&body_source("A{else}B")).is_err());
}

#[test]
fn test_mismatched_closing_tag_fails() {
    assert!(parse(&body_source("{if $x}A{/foreach}")).is_err());
}

#[test]
fn test_interpolation_keeps_raw_text() {
    let program = parse_ok(&body_source("{$user.name |escapeHtml}"));
    assert_ast(&program).template(0, |t| {
        t.body(|body| {
            body.node(0, |n| n.assert_interpolation("$user.name |escapeHtml"));
        });
    });
}

#[test]
fn test_let_block_with_kind() {
    let program = parse_ok(&body_source("{let $title kind=\"text\"}Hi {$n}{/let}"));
    assert_ast(&program).template(0, |t| {
        t.body(|body| {
            body.node(0, |n| {
                n.assert_let().name("title").body(|inner| {
                    inner.node_count(2);
                });
            });
        });
    });
}

#[test]
fn test_trailing_garbage_fails() {
    assert!(parse("{namespace a}{template .t}{/template} junk").is_err());
}

#[test]
fn test_empty_input_fails() {
    let error = parse("").unwrap_err();
    assert_eq!((error.line, error.column), (1, 1));
}

#[test]
fn test_body_text_keeps_template_layout() {
    let program = parse_ok(GREETING);
    assert_ast(&program).template(0, |t| {
        t.body(|body| {
            body.node_count(3)
                .node(0, |n| {
                    n.assert_text()
                        .text(TextMatch::Trimmed("Hello".into()))
                        .text("\n  Hello ");
                })
                .node(1, |n| n.assert_interpolation("$name ?: 'there'"))
                .node(2, |n| {
                    n.assert_text().text(TextMatch::lines(["!"]));
                });
        });
    });
}
