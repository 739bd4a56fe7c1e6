//! Whole-file grammar: namespace declaration followed by templates

use chumsky::prelude::*;
use std::sync::Arc;

use super::body::body_item;
use super::combinators::{file_trivia, keyword, marked, required_whitespace, trivia, Marker, ParserError};
use super::declarations::{deltemplate, template};
use crate::soy::ast::{Program, TemplateItem};
use crate::soy::namespace::{is_dotted_path, split_path};

/// `{namespace a.b.c ...}`; anything after the path up to `}` is ignored
pub(crate) fn namespace_declaration() -> impl Parser<char, Vec<String>, Error = ParserError> + Clone {
    let path = filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '.')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|path: String, span| {
            if is_dotted_path(&path) {
                Ok(path)
            } else {
                Err(Simple::custom(span, format!("`{}` is not a dotted namespace path", path)))
            }
        });

    just('{')
        .ignore_then(keyword("namespace"))
        .ignore_then(required_whitespace())
        .ignore_then(path)
        .then_ignore(required_whitespace().then(none_of("}").repeated()).or_not())
        .then_ignore(just('}'))
        .map(|path: String| split_path(&path))
}

/// Leading comments and the namespace declaration only
pub(crate) fn namespace_header() -> impl Parser<char, Vec<String>, Error = ParserError> + Clone {
    file_trivia().ignore_then(namespace_declaration())
}

/// The complete file, with relative template names resolved against `namespace`
pub(crate) fn program(
    marker: &Marker,
    namespace: Arc<Vec<String>>,
) -> impl Parser<char, Program, Error = ParserError> + Clone {
    let item = body_item(marker, namespace.clone());
    let template_item = choice((
        template(marker, namespace, item.clone()),
        deltemplate(marker, item),
    ));
    let templates = trivia().ignore_then(template_item).repeated().at_least(1);

    let program = marked(
        marker,
        namespace_declaration().then(templates),
        |mark, (namespace, templates): (Vec<String>, Vec<TemplateItem>)| {
            Program::new(mark, namespace, templates)
        },
    );

    file_trivia()
        .ignore_then(program)
        .then_ignore(trivia())
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_declaration() {
        let parser = namespace_declaration().then_ignore(end());
        assert_eq!(parser.parse("{namespace a.b.c}").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(
            parser.parse("{namespace a.b requirecss=\"x\"}").unwrap(),
            vec!["a", "b"]
        );
        assert!(parser.parse("{namespace a.b-c}").is_err());
        assert!(parser.parse("{namespace a..b}").is_err());
        assert!(parser.parse("{namespace}").is_err());
    }

    #[test]
    fn test_namespace_header_skips_license_comment() {
        let source = "/*\n * Copyright\n */\n// file\n{namespace demo}";
        assert_eq!(namespace_header().parse(source).unwrap(), vec!["demo"]);
    }

    #[test]
    fn test_program_requires_a_template() {
        let source = "{namespace demo}\n";
        let marker = Marker::new(source);
        assert!(program(&marker, Arc::new(vec!["demo".into()]))
            .parse(source)
            .is_err());
    }
}
