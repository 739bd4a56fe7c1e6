//! Template-level declarations: doc blocks, `{@param}` headers, attributes,
//! `{template}` and `{deltemplate}`.

use chumsky::prelude::*;
use std::sync::Arc;

use super::body::{body_content, BodyItemParser};
use super::combinators::{
    keyword, marked, raw_until, required_whitespace, template_name, unterminated_at_eof, whitespace,
    Marker, ParserError,
};
use crate::soy::ast::{
    Attribute, Body, DelTemplate, ParamDeclaration, SoyDoc, Template, TemplateItem,
};
use crate::soy::namespace::resolve_template_name;

/// Type recorded for params declared only in a doc block
pub const DOC_PARAM_TYPE: &str = "any";

/// One line of a doc block
#[derive(Debug, Clone)]
enum DocLine {
    Param(ParamDeclaration),
    Text(String),
}

/// `/** ... */`
///
/// Lines may start with a `*` margin. A line whose content starts with
/// `@param name` (or `@param? name`) declares a parameter and the rest of
/// that line is ignored; every other line contributes to the doc text.
pub(crate) fn soy_doc(marker: &Marker) -> impl Parser<char, SoyDoc, Error = ParserError> + Clone {
    let margin = one_of(" \t")
        .repeated()
        .then(just('*').then(none_of("/").rewind()).or_not())
        .ignored();

    let annotation = marked(
        marker,
        just("@param")
            .ignore_then(just('?').or_not())
            .then_ignore(one_of(" \t").repeated().at_least(1))
            .then(text::ident()),
        |mark, (optional, name): (Option<char>, String)| {
            ParamDeclaration::new(mark, optional.is_none(), name, DOC_PARAM_TYPE)
        },
    );

    let line = margin.ignore_then(choice((
        one_of(" \t")
            .repeated()
            .ignore_then(annotation)
            .then_ignore(raw_until(doc_line_end(), false))
            .map(DocLine::Param),
        raw_until(doc_line_end(), false).map(|text: String| DocLine::Text(text.trim().to_string())),
    )));

    let doc = just("/**")
        .ignore_then(line.separated_by(just('\n')))
        .then_ignore(just("*/"));

    marked(marker, doc, |mark, lines: Vec<DocLine>| {
        let mut params = Vec::new();
        let mut text = Vec::new();
        for line in lines {
            match line {
                DocLine::Param(param) => params.push(param),
                DocLine::Text(line) => text.push(line),
            }
        }
        SoyDoc::new(mark, text.join("\n").trim(), params)
    })
}

fn doc_line_end() -> impl Parser<char, (), Error = ParserError> + Clone {
    just('\n').ignored().or(just("*/").ignored())
}

/// `{@param name: type}` or `{@param? name: type}`; the type is kept as raw text
pub(crate) fn param_declaration(
    marker: &Marker,
) -> impl Parser<char, ParamDeclaration, Error = ParserError> + Clone {
    let declaration = just("{@param")
        .ignore_then(just('?').or_not())
        .then_ignore(required_whitespace())
        .then(text::ident())
        .then_ignore(whitespace())
        .then_ignore(just(':'))
        .then(raw_until(just('}'), true));

    marked(
        marker,
        declaration,
        |mark, ((optional, name), type_expr): ((Option<char>, String), String)| {
            ParamDeclaration::new(mark, optional.is_none(), name, type_expr.trim())
        },
    )
}

/// `name="value"`; the value is taken verbatim, without unescaping
pub(crate) fn attribute(marker: &Marker) -> impl Parser<char, Attribute, Error = ParserError> + Clone {
    let name = filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .repeated()
        .at_least(1)
        .collect::<String>();
    let value = just('"').ignore_then(raw_until(just('"'), true));

    marked(
        marker,
        name.then_ignore(just('=')).then(value),
        |mark, (name, value): (String, String)| Attribute::new(mark, name, value),
    )
}

fn attributes(marker: &Marker) -> impl Parser<char, Vec<Attribute>, Error = ParserError> + Clone {
    required_whitespace().ignore_then(attribute(marker)).repeated()
}

type Header = ((String, Vec<Attribute>), Vec<ParamDeclaration>);

/// `{command name attrs...}` then `{@param}` declarations, the body and `{/command}`
fn declaration(
    marker: &Marker,
    command: &'static str,
    item: BodyItemParser,
) -> impl Parser<char, (Header, Body), Error = ParserError> + Clone {
    let head = just('{')
        .ignore_then(keyword(command))
        .ignore_then(required_whitespace())
        .ignore_then(template_name())
        .then(attributes(marker))
        .then_ignore(whitespace())
        .then_ignore(just('}'));
    let params = whitespace().ignore_then(param_declaration(marker)).repeated();

    unterminated_at_eof(marker, head.then(params).then(body_content(command, &[], item)))
}

/// A documented `{template}`; its name is resolved against `namespace`
pub(crate) fn template(
    marker: &Marker,
    namespace: Arc<Vec<String>>,
    item: BodyItemParser,
) -> impl Parser<char, TemplateItem, Error = ParserError> + Clone {
    let parser = soy_doc(marker)
        .then_ignore(whitespace())
        .or_not()
        .then(declaration(marker, "template", item));

    marked(
        marker,
        parser,
        move |mark, (doc, (((name, attributes), params), body)): (Option<SoyDoc>, (Header, Body))| {
            let name = resolve_template_name(&name, namespace.as_slice());
            TemplateItem::Template(Template::new(mark, doc, name, attributes, params, body))
        },
    )
}

/// A documented `{deltemplate}`; the name is kept as written and a
/// `variant` attribute is lifted out of the attribute list
pub(crate) fn deltemplate(
    marker: &Marker,
    item: BodyItemParser,
) -> impl Parser<char, TemplateItem, Error = ParserError> + Clone {
    let parser = soy_doc(marker)
        .then_ignore(whitespace())
        .or_not()
        .then(declaration(marker, "deltemplate", item));

    marked(
        marker,
        parser,
        |mark, (doc, (((name, attributes), params), body)): (Option<SoyDoc>, (Header, Body))| {
            let (variants, attributes): (Vec<Attribute>, Vec<Attribute>) =
                attributes.into_iter().partition(|attr| attr.name == "variant");
            let variant = variants.into_iter().next().map(|attr| attr.value);
            TemplateItem::DelTemplate(DelTemplate::new(
                mark, doc, name, variant, attributes, params, body,
            ))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soy::parser::body::body_item;

    fn item(marker: &Marker) -> BodyItemParser {
        body_item(marker, Arc::new(vec!["a".to_string(), "b".to_string()]))
    }

    #[test]
    fn test_doc_text_and_params() {
        let source = "/**\n * Says hello.\n * @param name the person\n * @param? greeting optional\n */";
        let marker = Marker::new(source);
        let doc = soy_doc(&marker).then_ignore(end()).parse(source).unwrap();

        assert_eq!(doc.text, "Says hello.");
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[0].name, "name");
        assert!(doc.params[0].required);
        assert_eq!(doc.params[0].type_expr, DOC_PARAM_TYPE);
        assert_eq!(doc.params[1].name, "greeting");
        assert!(!doc.params[1].required);
    }

    #[test]
    fn test_single_line_doc() {
        let source = "/** Renders the footer. */";
        let marker = Marker::new(source);
        let doc = soy_doc(&marker).then_ignore(end()).parse(source).unwrap();
        assert_eq!(doc.text, "Renders the footer.");
        assert!(doc.params.is_empty());
        assert_eq!(doc.mark.slice(source), source);
    }

    #[test]
    fn test_param_declaration() {
        let source = "{@param? items: list<map<string, int>>}";
        let marker = Marker::new(source);
        let decl = param_declaration(&marker)
            .then_ignore(end())
            .parse(source)
            .unwrap();
        assert!(!decl.required);
        assert_eq!(decl.name, "items");
        assert_eq!(decl.type_expr, "list<map<string, int>>");
    }

    #[test]
    fn test_attribute_value_is_raw() {
        let source = r#"kind="te\"xt""#;
        let marker = Marker::new(source);
        let attr = attribute(&marker).parse(source).unwrap();
        assert_eq!(attr.name, "kind");
        assert_eq!(attr.value, "te\\");
    }

    #[test]
    fn test_template_with_header() {
        let source = "/** Doc. */\n{template .foo autoescape=\"strict\"}\n  {@param x: string}\n{$x}{/template}";
        let marker = Marker::new(source);
        let parsed = template(&marker, Arc::new(vec!["a".into(), "b".into()]), item(&marker))
            .then_ignore(end())
            .parse(source)
            .unwrap();

        let TemplateItem::Template(t) = parsed else {
            panic!("expected Template");
        };
        assert_eq!(t.name, "a.b.foo");
        assert_eq!(t.doc.as_ref().map(|d| d.text.as_str()), Some("Doc."));
        assert_eq!(t.attribute("autoescape"), Some("strict"));
        assert_eq!(t.params.len(), 1);
        assert_eq!(t.params[0].type_expr, "string");
        assert_eq!(t.body.len(), 2);
        assert_eq!(t.mark.start.index, 0);
    }

    #[test]
    fn test_deltemplate_variant() {
        let source = "{deltemplate menu.item variant=\"'compact'\" kind=\"html\"}x{/deltemplate}";
        let marker = Marker::new(source);
        let parsed = deltemplate(&marker, item(&marker))
            .then_ignore(end())
            .parse(source)
            .unwrap();

        let TemplateItem::DelTemplate(t) = parsed else {
            panic!("expected DelTemplate");
        };
        assert_eq!(t.name, "menu.item");
        assert_eq!(t.variant.as_deref(), Some("'compact'"));
        assert_eq!(t.attributes.len(), 1);
        assert_eq!(t.attribute("kind"), Some("html"));
    }
}
