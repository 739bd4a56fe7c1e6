//! Expression grammar
//!
//! Only part of the expression language is modelled. Each operand first tries
//! the structured forms (reference, string, boolean, map, number, function
//! call); a structured match only counts when it is immediately followed by
//! the operand's terminator. Otherwise the operand falls back to a raw
//! capture of everything up to the terminator, which becomes an
//! [`OtherExpression`].
//!
//! Terminators nest: the condition of a ternary stops at `?`, its first
//! branch at `:`, and every operand also stops at the terminator of the
//! enclosing context (`/}` in a body, `,` `)` `]` inside call arguments and
//! map values). Ternaries associate to the right.
//!
//! When no ternary-shaped reading fits (`$a ?? $b`, `'a?' + $b`), the whole
//! expression is captured raw, as long as it holds no bare `?` that would
//! make it a ternary missing its `:` branch.

use chumsky::prelude::*;
use std::ops::Range;

use super::combinators::{
    keyword, marked, padded, raw_until, terminator, whitespace, Marker, ParserError, Terminator,
};
use crate::soy::ast::expression::{
    BooleanLiteral, FunctionCall, MapItem, MapLiteral, NumberLiteral, OtherExpression, Reference,
    StringLiteral, Ternary,
};
use crate::soy::ast::Expression;

pub(crate) type ExpressionParser = BoxedParser<'static, char, Expression, ParserError>;

/// Terminator of an inline `{param}`/`{let}` value
pub(crate) fn slash_close() -> Terminator {
    terminator(just("/}"))
}

/// Terminator of call arguments and map values
pub(crate) fn nested_terminator() -> Terminator {
    terminator(one_of(",)]"))
}

/// A full expression, ending right before `term` (which is not consumed)
pub(crate) fn expression(marker: &Marker, term: Terminator) -> ExpressionParser {
    let nested_marker = marker.clone();
    let nested = recursive(move |nested| {
        expression_with(&nested_marker, nested_terminator(), nested.boxed())
    });

    expression_with(marker, term, nested.boxed())
}

fn expression_with(marker: &Marker, term: Terminator, nested: ExpressionParser) -> ExpressionParser {
    // `?:`, `??` and `?.` are operators of their own
    let question = terminator(just('?').then(none_of(":?.").rewind()));
    let colon = terminator(just(':'));
    let condition_stop = question.clone().or(term.clone()).boxed();
    let branch_stop = colon.clone().or(term.clone()).boxed();
    let whole = raw_expression(marker, term.clone());
    let marker = marker.clone();

    recursive(move |expr| {
        let condition = operand(&marker, condition_stop.clone(), nested.clone());
        let left = question
            .clone()
            .ignore_then(whitespace())
            .ignore_then(operand(&marker, branch_stop.clone(), nested.clone()));
        let right = colon.clone().ignore_then(whitespace()).ignore_then(expr);

        let ternary_marker = marker.clone();
        condition
            .then(left.then(right).or_not())
            .map_with_span(move |(cond, branches), span: Range<usize>| match branches {
                Some((left, right)) => {
                    Expression::Ternary(Ternary::new(ternary_marker.mark(&span), cond, left, right))
                }
                None => cond,
            })
            .then_ignore(term.clone().rewind())
            .or(whole.clone())
    })
    .boxed()
}

/// One operand: a structured form followed by `stop`, or a raw capture up to `stop`
fn operand(
    marker: &Marker,
    stop: Terminator,
    nested: ExpressionParser,
) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    let structured = choice((
        reference(marker),
        string_literal(marker).map(Expression::String),
        boolean_literal(marker),
        map_literal(marker, nested.clone()),
        number_literal(marker),
        function_call(marker, nested),
    ))
    .then_ignore(stop.clone().rewind());

    structured.or(other_expression(marker, stop))
}

fn reference(marker: &Marker) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    marked(
        marker,
        just('$').ignore_then(text::ident()),
        |mark, name: String| Expression::Reference(Reference::new(mark, name)),
    )
}

/// `'...'` with `\n`, `\t`, `\r` escapes; any other escaped character stands for itself
pub(crate) fn string_literal(marker: &Marker) -> impl Parser<char, StringLiteral, Error = ParserError> + Clone {
    let escape = just('\\').ignore_then(any()).map(|c| match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    });
    let content = none_of("\\'").or(escape).repeated().collect::<String>();

    marked(
        marker,
        content.delimited_by(just('\''), just('\'')),
        |mark, value: String| StringLiteral::new(mark, value),
    )
}

fn boolean_literal(marker: &Marker) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    let value = keyword("true")
        .to(true)
        .or(keyword("false").to(false));

    marked(marker, value, |mark, value: bool| {
        Expression::Boolean(BooleanLiteral::new(mark, value))
    })
}

/// An optional sign followed by digits and dots, accepted only if it reads as a float
fn number_literal(marker: &Marker) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    let digits = filter(|c: &char| c.is_ascii_digit() || *c == '.')
        .repeated()
        .at_least(1);
    let number = one_of("+-")
        .or_not()
        .chain::<char, _, _>(digits)
        .collect::<String>()
        .try_map(|text: String, span: Range<usize>| {
            text.parse::<f64>()
                .map_err(|_| Simple::custom(span, format!("`{}` is not a number", text)))
        });

    marked(marker, number, |mark, value: f64| {
        Expression::Number(NumberLiteral::new(mark, value))
    })
}

/// `['key': value, ...]`, possibly empty
fn map_literal(
    marker: &Marker,
    nested: ExpressionParser,
) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    let item = marked(
        marker,
        string_literal(marker)
            .then_ignore(padded(just(':')))
            .then(nested),
        |mark, (key, value): (StringLiteral, Expression)| MapItem::new(mark, key, value),
    );
    let items = item
        .separated_by(padded(just(',')))
        .delimited_by(just('[').then(whitespace()), whitespace().then(just(']')));

    marked(marker, items, |mark, items: Vec<MapItem>| {
        Expression::Map(MapLiteral::new(mark, items))
    })
}

fn function_call(
    marker: &Marker,
    nested: ExpressionParser,
) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    let args = nested
        .separated_by(padded(just(',')))
        .delimited_by(just('(').then(whitespace()), whitespace().then(just(')')));

    marked(
        marker,
        text::ident().then(args),
        |mark, (name, args): (String, Vec<Expression>)| {
            Expression::FunctionCall(FunctionCall::new(mark, name, args))
        },
    )
}

/// Everything up to `stop`; empty text and maps with non-string keys are rejected
fn raw_capture(stop: Terminator) -> impl Parser<char, String, Error = ParserError> + Clone {
    raw_until(stop, false).try_map(|raw: String, span: Range<usize>| {
        if raw.trim().is_empty() {
            Err(Simple::custom(span, "expected an expression"))
        } else if looks_like_map(&raw) {
            Err(Simple::custom(span, "map keys must be string literals"))
        } else {
            Ok(raw)
        }
    })
}

/// Everything up to `stop`, kept verbatim
fn other_expression(
    marker: &Marker,
    stop: Terminator,
) -> impl Parser<char, Expression, Error = ParserError> + Clone {
    marked(marker, raw_capture(stop), |mark, raw: String| {
        Expression::Other(OtherExpression::new(mark, raw))
    })
}

/// The whole expression up to `term`, kept verbatim unless it reads as a
/// ternary without its `:` branch
fn raw_expression(marker: &Marker, term: Terminator) -> ExpressionParser {
    let raw = raw_capture(term).try_map(|raw: String, span: Range<usize>| {
        if has_bare_question(&raw) {
            Err(Simple::custom(span, "`?` without a matching `:` branch"))
        } else {
            Ok(raw)
        }
    });

    marked(marker, raw, |mark, raw: String| {
        Expression::Other(OtherExpression::new(mark, raw))
    })
    .boxed()
}

/// A `?` outside string literals that is not part of `?:`, `??` or `?.`
fn has_bare_question(raw: &str) -> bool {
    let chars: Vec<char> = raw.chars().collect();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_string = true,
            '?' => {
                let prev = i.checked_sub(1).map(|j| chars[j]);
                let next = chars.get(i + 1).copied();
                let joined = prev == Some('?') || matches!(next, Some(':' | '?' | '.'));
                if !joined {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// `[` whose first `:`, `,` or `]` is a `:`: a map literal whose keys are not strings
fn looks_like_map(raw: &str) -> bool {
    match raw.strip_prefix('[') {
        Some(rest) => rest.chars().find(|c| matches!(c, ':' | ',' | ']')) == Some(':'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse_expr(source: &str) -> Result<Expression, Vec<ParserError>> {
        let marker = Marker::new(source);
        expression(&marker, slash_close())
            .then_ignore(slash_close())
            .then_ignore(end())
            .parse(source)
    }

    fn node_type(expr: &Expression) -> &'static str {
        use crate::soy::ast::AstNode;
        expr.node_type()
    }

    #[rstest]
    #[case("$name /}", "Reference")]
    #[case("'hi' /}", "StringLiteral")]
    #[case("true /}", "BooleanLiteral")]
    #[case("false/}", "BooleanLiteral")]
    #[case("42 /}", "NumberLiteral")]
    #[case("-1.5 /}", "NumberLiteral")]
    #[case("['a': 1] /}", "MapLiteral")]
    #[case("[] /}", "MapLiteral")]
    #[case("isNonnull($x) /}", "FunctionCall")]
    #[case("$a ? 'x' : 'y' /}", "Ternary")]
    #[case("1 + 2 /}", "OtherExpression")]
    #[case("$user.name /}", "OtherExpression")]
    #[case("[1, 2] /}", "OtherExpression")]
    #[case("1.2.3 /}", "OtherExpression")]
    #[case("trueish /}", "OtherExpression")]
    #[case("$a ?? 'd' /}", "OtherExpression")]
    #[case("$a?.b /}", "OtherExpression")]
    #[case("'a?' + $b /}", "OtherExpression")]
    #[case("$x == '?' /}", "OtherExpression")]
    #[case("$a?.b ? 1 : 2 /}", "Ternary")]
    fn test_expression_forms(#[case] source: &str, #[case] expected: &str) {
        let expr = parse_expr(source).unwrap();
        assert_eq!(node_type(&expr), expected, "parsing {:?}", source);
    }

    #[test]
    fn test_raw_capture_excludes_trailing_whitespace() {
        let expr = parse_expr("1 + 2   /}").unwrap();
        match expr {
            Expression::Other(other) => assert_eq!(other.raw, "1 + 2"),
            other => panic!("expected OtherExpression, got {:?}", other),
        }
    }

    #[test]
    fn test_string_escapes() {
        let expr = parse_expr(r"'a\'b\nc\\d\q' /}").unwrap();
        match expr {
            Expression::String(s) => assert_eq!(s.value, "a'b\nc\\dq"),
            other => panic!("expected StringLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_ternary_operands() {
        let expr = parse_expr("$a ? 'x' : 'y' /}").unwrap();
        let Expression::Ternary(t) = expr else {
            panic!("expected Ternary");
        };
        assert!(matches!(*t.cond, Expression::Reference(ref r) if r.name == "a"));
        assert!(matches!(*t.left, Expression::String(ref s) if s.value == "x"));
        assert!(matches!(*t.right, Expression::String(ref s) if s.value == "y"));
        assert_eq!(t.mark.start.index, 0);
        assert_eq!(t.mark.end.index, 14);
    }

    #[test]
    fn test_ternary_is_right_associative() {
        let expr = parse_expr("$a ? 1 : $b ? 2 : 3 /}").unwrap();
        let Expression::Ternary(outer) = expr else {
            panic!("expected Ternary");
        };
        assert!(matches!(*outer.left, Expression::Number(ref n) if n.value == 1.0));
        assert!(matches!(*outer.right, Expression::Ternary(_)));
    }

    #[test]
    fn test_ternary_with_raw_condition() {
        let expr = parse_expr("$n > 1 ? 'many' : 'one' /}").unwrap();
        let Expression::Ternary(t) = expr else {
            panic!("expected Ternary");
        };
        assert!(matches!(*t.cond, Expression::Other(ref o) if o.raw == "$n > 1"));
    }

    #[test]
    fn test_ternary_without_colon_fails() {
        assert!(parse_expr("$a ? $b /}").is_err());
    }

    #[test]
    fn test_question_operators_keep_whole_expression() {
        let expr = parse_expr("$a ?? 'd' /}").unwrap();
        assert!(matches!(expr, Expression::Other(ref o) if o.raw == "$a ?? 'd'"));
        assert_eq!(expr.mark().start.index, 0);

        let expr = parse_expr("max($a ?? 1, 'b?') /}").unwrap();
        let Expression::FunctionCall(call) = expr else {
            panic!("expected FunctionCall");
        };
        assert!(matches!(call.args[0], Expression::Other(ref o) if o.raw == "$a ?? 1"));
    }

    #[test]
    fn test_bare_question_detection() {
        assert!(has_bare_question("$a ? $b"));
        assert!(has_bare_question("'x' + $a ? 1"));
        assert!(!has_bare_question("$a ?? $b"));
        assert!(!has_bare_question("$a?.b"));
        assert!(!has_bare_question("$a ?: $b"));
        assert!(!has_bare_question("'?' + '\\'?'"));
    }

    #[test]
    fn test_elvis_operator_is_raw() {
        let expr = parse_expr("$a ?: 'b' /}").unwrap();
        assert!(matches!(expr, Expression::Other(ref o) if o.raw == "$a ?: 'b'"));
    }

    #[test]
    fn test_map_with_non_string_key_fails() {
        assert!(parse_expr("[1: 'x'] /}").is_err());
        assert!(parse_expr("[$k: 'x'] /}").is_err());
    }

    #[test]
    fn test_map_items() {
        let expr = parse_expr("['a': 1, 'b': $c] /}").unwrap();
        let Expression::Map(map) = expr else {
            panic!("expected MapLiteral");
        };
        assert_eq!(map.items.len(), 2);
        assert!(matches!(map.get("a"), Some(Expression::Number(n)) if n.value == 1.0));
        assert!(matches!(map.get("b"), Some(Expression::Reference(r)) if r.name == "c"));
    }

    #[test]
    fn test_function_call_args() {
        let expr = parse_expr("max($a, 2, $b + 1) /}").unwrap();
        let Expression::FunctionCall(call) = expr else {
            panic!("expected FunctionCall");
        };
        assert_eq!(call.name, "max");
        assert_eq!(call.args.len(), 3);
        assert!(matches!(call.args[2], Expression::Other(ref o) if o.raw == "$b + 1"));
    }

    #[test]
    fn test_function_call_without_args() {
        let expr = parse_expr("randomInt() /}").unwrap();
        assert!(matches!(expr, Expression::FunctionCall(ref c) if c.args.is_empty()));
    }

    #[test]
    fn test_empty_expression_fails() {
        assert!(parse_expr(" /}").is_err());
    }

    #[test]
    fn test_string_mark_slices_to_source() {
        let source = "'hello' /}";
        let expr = parse_expr(source).unwrap();
        assert_eq!(expr.mark().slice(source), "'hello'");
    }
}
