//! Parser combinator functions for building the soy grammar.
//!
//! Every rule in the grammar is assembled from the helpers here: whitespace
//! handling, raw capture up to a terminator, command openers and closers,
//! and [`marked`], the only way a node gets its source mark.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::ops::Range;
use std::sync::Arc;

use crate::soy::ast::{Mark, SourceLocation};

/// Type alias for parser error
pub(crate) type ParserError = Simple<char>;

/// A boxed parser for the input that ends some construct
pub(crate) type Terminator = BoxedParser<'static, char, (), ParserError>;

/// Converts chumsky spans (character ranges) into marks
#[derive(Debug, Clone)]
pub(crate) struct Marker {
    location: Arc<SourceLocation>,
}

impl Marker {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            location: Arc::new(SourceLocation::new(source)),
        }
    }

    pub(crate) fn mark(&self, span: &Range<usize>) -> Mark {
        self.location.range_to_mark(span)
    }

    pub(crate) fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/// Run `parser`, then build a node from the mark of everything it consumed
/// and its output.
pub(crate) fn marked<O, N, P, F>(
    marker: &Marker,
    parser: P,
    build: F,
) -> impl Parser<char, N, Error = ParserError> + Clone
where
    P: Parser<char, O, Error = ParserError> + Clone,
    F: Fn(Mark, O) -> N + Clone,
{
    let marker = marker.clone();
    parser.map_with_span(move |output, span: Range<usize>| build(marker.mark(&span), output))
}

/// Zero or more blanks, tabs or newlines
pub(crate) fn whitespace() -> impl Parser<char, (), Error = ParserError> + Clone {
    one_of(" \t\r\n").repeated().ignored()
}

pub(crate) fn required_whitespace() -> impl Parser<char, (), Error = ParserError> + Clone {
    one_of(" \t\r\n").repeated().at_least(1).ignored()
}

/// Skip optional whitespace on both sides of `parser`
pub(crate) fn padded<O, P>(parser: P) -> impl Parser<char, O, Error = ParserError> + Clone
where
    P: Parser<char, O, Error = ParserError> + Clone,
{
    whitespace().ignore_then(parser).then_ignore(whitespace())
}

/// A terminator that also accepts the whitespace leading up to `parser`.
///
/// Raw captures stop before that whitespace, so captured text never keeps
/// trailing blanks.
pub(crate) fn terminator<O, P>(parser: P) -> Terminator
where
    P: Parser<char, O, Error = ParserError> + Clone + 'static,
    O: 'static,
{
    whitespace().ignore_then(parser).ignored().boxed()
}

/// Consume characters one at a time until `terminator` matches, returning
/// the text consumed so far.
///
/// With `consume` the terminator is eaten as well, otherwise it is left for
/// the caller. Fails if the input ends before the terminator is found.
pub(crate) fn raw_until<O, T>(terminator: T, consume: bool) -> BoxedParser<'static, char, String, ParserError>
where
    T: Parser<char, O, Error = ParserError> + Clone + 'static,
    O: 'static,
{
    let scan = take_until(terminator.clone().rewind())
        .map(|(chars, _): (Vec<char>, O)| chars.into_iter().collect::<String>());

    if consume {
        scan.then_ignore(terminator).boxed()
    } else {
        scan.boxed()
    }
}

/// Match one of `names` as an identifier
pub(crate) fn command_name(
    names: &[&'static str],
) -> impl Parser<char, &'static str, Error = ParserError> + Clone {
    let names = names.to_vec();
    text::ident().try_map(move |ident: String, span: Range<usize>| {
        names
            .iter()
            .copied()
            .find(|name| *name == ident)
            .ok_or_else(|| Simple::custom(span, format!("unexpected command `{}`", ident)))
    })
}

/// `{name ...}` for one of `names`; whatever follows the name up to the
/// closing `}` is absorbed without being modelled.
pub(crate) fn open_command(
    names: &[&'static str],
) -> impl Parser<char, &'static str, Error = ParserError> + Clone {
    just('{')
        .ignore_then(command_name(names))
        .then_ignore(raw_until(just('}'), true))
}

/// `name` as a whole identifier
pub(crate) fn keyword(name: &'static str) -> impl Parser<char, (), Error = ParserError> + Clone {
    text::ident().try_map(move |ident: String, span: Range<usize>| {
        if ident == name {
            Ok(())
        } else {
            Err(Simple::custom(
                span,
                format!("expected `{}`, found `{}`", name, ident),
            ))
        }
    })
}

/// `{/name}`
pub(crate) fn close_command(name: &'static str) -> impl Parser<char, (), Error = ParserError> + Clone {
    just("{/")
        .ignore_then(keyword(name))
        .then_ignore(whitespace())
        .then_ignore(just('}'))
}

/// A template name: relative (`.foo`) or dotted (`a.b.foo`)
pub(crate) fn template_name() -> impl Parser<char, String, Error = ParserError> + Clone {
    just('.')
        .or_not()
        .then(text::ident().separated_by(just('.')).at_least(1))
        .map(|(dot, segments): (Option<char>, Vec<String>)| {
            let path = segments.join(".");
            match dot {
                Some(_) => format!(".{}", path),
                None => path,
            }
        })
}

/// Report a block that runs into the end of input as unterminated.
///
/// The error points at the block's opening tag rather than at the end of
/// input. Errors that did not happen at end of input, and blocks nested
/// deeper that already reported themselves, pass through untouched. A block
/// that would only start at end of input has no opening tag yet, so its
/// error is left for the enclosing block to claim.
pub(crate) fn unterminated_at_eof<O, P>(
    marker: &Marker,
    parser: P,
) -> impl Parser<char, O, Error = ParserError> + Clone
where
    P: Parser<char, O, Error = ParserError> + Clone,
{
    let len = marker.location().len();
    parser.map_err_with_span(move |error: ParserError, span: Range<usize>| {
        let at_end = span.start < len
            && error.found().is_none()
            && error.span().start >= len
            && matches!(error.reason(), SimpleReason::Unexpected);
        if !at_end {
            return error;
        }
        let opener = span.start..span.start + 1;
        <ParserError as chumsky::error::Error<char>>::unclosed_delimiter(opener, '{', span, '}', None)
    })
}

pub(crate) fn line_comment() -> impl Parser<char, (), Error = ParserError> + Clone {
    just("//").then(none_of("\n").repeated()).ignored()
}

/// `/* ... */`, but not a `/** ... */` doc block; the empty `/**/` is a comment
pub(crate) fn block_comment() -> impl Parser<char, (), Error = ParserError> + Clone {
    let empty = just("/**/").ignored();
    let commented = just("/*")
        .then(none_of("*"))
        .then(take_until(just("*/")))
        .ignored();

    empty.or(commented)
}

fn any_block_comment() -> impl Parser<char, (), Error = ParserError> + Clone {
    just("/*").then(take_until(just("*/"))).ignored()
}

/// Whitespace and non-doc comments between top-level declarations
pub(crate) fn trivia() -> impl Parser<char, (), Error = ParserError> + Clone {
    choice((one_of(" \t\r\n").ignored(), line_comment(), block_comment()))
        .repeated()
        .ignored()
}

/// Whitespace and any comments (doc-style included) ahead of the namespace
pub(crate) fn file_trivia() -> impl Parser<char, (), Error = ParserError> + Clone {
    choice((one_of(" \t\r\n").ignored(), line_comment(), any_block_comment()))
        .repeated()
        .ignored()
}
