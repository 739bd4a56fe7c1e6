//! Property-based tests for the soy grammar
//!
//! These check that plain text and raw captures survive parsing unchanged,
//! and that simple expression forms are always recognised.

use proptest::prelude::*;
use soyparse::soy::ast::{BindingValue, BodyNode, Expression, Program};
use soyparse::parse;

fn wrap(body: &str) -> String {
    format!("{{namespace prop}}\n{{template .t}}{}{{/template}}", body)
}

fn body(program: &Program) -> &[BodyNode] {
    program.templates[0].body()
}

fn let_expression(program: &Program) -> Expression {
    match &body(program)[0] {
        BodyNode::Let(stmt) => match &stmt.value {
            BindingValue::Expression(expression) => expression.clone(),
            BindingValue::Body(_) => panic!("expected an inline let"),
        },
        other => panic!("expected a let, found {:?}", other),
    }
}

/// Plain template text: no braces, no comment openers
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?<>=\"'\n-]{1,40}"
}

/// Plain variable names
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,8}"
}

/// Data paths like `user.name`; field access stays opaque to the grammar
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,8}(\\.[a-z][a-zA-Z0-9_]{0,8}){0,2}"
}

/// Expressions the grammar does not model, such as arithmetic
fn arithmetic_strategy() -> impl Strategy<Value = String> {
    (name_strategy(), prop_oneof!["\\+", "-", "\\*", "%", "\\?\\?", "=="], 0u32..1000)
        .prop_map(|(name, op, n)| format!("${} {} {}", name, op, n))
}

/// Comparisons against string literals that may contain `?`
fn quoted_question_strategy() -> impl Strategy<Value = String> {
    (name_strategy(), "[a-z ?]{0,6}\\?[a-z ?]{0,6}")
        .prop_map(|(name, text)| format!("${} == '{}'", name, text))
}

proptest! {
    #[test]
    fn test_plain_text_is_one_text_node(text in text_strategy()) {
        let program = parse(&wrap(&text)).expect("plain text parses");
        let nodes = body(&program);

        prop_assert_eq!(nodes.len(), 1);
        prop_assert!(matches!(&nodes[0], BodyNode::Text(t) if t.text == text));
    }

    #[test]
    fn test_interpolation_keeps_raw(name in path_strategy(), pipe in "( \\|[a-z]{1,8})?") {
        let raw = format!("${}{}", name, pipe);
        let program = parse(&wrap(&format!("a{{{}}}b", raw))).expect("interpolation parses");
        let nodes = body(&program);

        prop_assert_eq!(nodes.len(), 3);
        prop_assert!(matches!(&nodes[1], BodyNode::Interpolation(i) if i.raw == raw));
    }

    #[test]
    fn test_reference_is_recognised(name in name_strategy()) {
        let program = parse(&wrap(&format!("{{let $v: ${} /}}", name))).expect("let parses");

        prop_assert!(matches!(let_expression(&program), Expression::Reference(r) if r.name == name));
    }

    #[test]
    fn test_integer_literal_value(n in 0u32..100_000) {
        let program = parse(&wrap(&format!("{{let $v: {} /}}", n))).expect("let parses");

        prop_assert!(matches!(
            let_expression(&program),
            Expression::Number(literal) if literal.value == f64::from(n)
        ));
    }

    #[test]
    fn test_unmodelled_expression_is_raw(expr in arithmetic_strategy()) {
        let program = parse(&wrap(&format!("{{let $v:  {}   /}}", expr))).expect("let parses");

        match let_expression(&program) {
            Expression::Other(other) => prop_assert_eq!(other.raw, expr),
            other => prop_assert!(false, "expected raw expression, found {:?}", other),
        }
    }

    #[test]
    fn test_question_in_string_is_raw(expr in quoted_question_strategy()) {
        let program = parse(&wrap(&format!("{{let $v: {} /}}", expr))).expect("let parses");

        match let_expression(&program) {
            Expression::Other(other) => prop_assert_eq!(other.raw, expr),
            other => prop_assert!(false, "expected raw expression, found {:?}", other),
        }
    }

    #[test]
    fn test_field_access_is_raw(path in path_strategy()) {
        let source = format!("${}", path);
        let program = parse(&wrap(&format!("{{let $v: {} /}}", source))).expect("let parses");

        let expected_reference = !path.contains('.');
        match let_expression(&program) {
            Expression::Reference(r) => prop_assert!(expected_reference && r.name == path),
            Expression::Other(o) => prop_assert!(!expected_reference && o.raw == source),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_never_panics(source in "[{}/a-z$:?. \n]{0,60}") {
        let _ = parse(&source);
        let _ = parse(&wrap(&source));
    }
}
