use std::borrow::Cow;

use miette::SourceSpan;
use winnow::{
    Parser,
    combinator::eof,
    error::{ContextError, ParseError},
};

/// Parses an endpoint path template, like `/users/:id/avatar` or
/// `/users/{id}/avatar`.
///
/// Placeholders are either `:name`, where the name is made of ASCII
/// letters, digits, and underscores, or `{name}`, where the name is
/// anything except braces. A placeholder can share a segment with
/// literal text, as in `/reports/report-{id}.pdf`.
pub fn parse(input: &str) -> Result<Vec<PathSegment<'_>>, BadPath> {
    (self::parser::template, eof)
        .map(|(segments, _)| segments)
        .parse(input)
        .map_err(BadPath::from_parse_error)
}

/// Returns the placeholder names in a parsed path, in order.
pub fn params<'a>(segments: &'a [PathSegment<'a>]) -> impl Iterator<Item = &'a str> + 'a {
    segments
        .iter()
        .flat_map(|segment| segment.fragments())
        .filter_map(|fragment| match fragment {
            PathFragment::Param(name) => Some(*name),
            PathFragment::Literal(_) => None,
        })
}

/// A slash-delimited path segment that contains zero or more
/// template fragments.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathSegment<'input>(Vec<PathFragment<'input>>);

impl<'input> PathSegment<'input> {
    pub fn fragments(&self) -> &[PathFragment<'input>] {
        &self.0
    }
}

/// A fragment within a path segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathFragment<'input> {
    /// Literal text, percent-decoded.
    Literal(Cow<'input, str>),
    /// Placeholder name.
    Param(&'input str),
}

mod parser {
    use super::*;

    use winnow::{
        Parser,
        combinator::{alt, delimited, preceded, repeat},
        token::take_while,
    };

    pub fn template<'a>(input: &mut &'a str) -> winnow::Result<Vec<PathSegment<'a>>> {
        alt((
            ('/', segment, template)
                .map(|(_, head, tail)| std::iter::once(head).chain(tail).collect()),
            ('/', segment).map(|(_, segment)| vec![segment]),
            '/'.map(|_| vec![PathSegment::default()]),
        ))
        .parse_next(input)
    }

    fn segment<'a>(input: &mut &'a str) -> winnow::Result<PathSegment<'a>> {
        repeat(1.., fragment).map(PathSegment).parse_next(input)
    }

    fn fragment<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        alt((braced, colon, literal)).parse_next(input)
    }

    pub fn braced<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        delimited('{', take_while(1.., |c| c != '{' && c != '}'), '}')
            .map(PathFragment::Param)
            .parse_next(input)
    }

    pub fn colon<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        preceded(
            ':',
            take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        )
        .map(PathFragment::Param)
        .parse_next(input)
    }

    pub fn literal<'a>(input: &mut &'a str) -> winnow::Result<PathFragment<'a>> {
        take_while(1.., |c| {
            matches!(c,
                'A'..='Z' | 'a'..='z' | '0'..='9' |
                '-' | '.' | '_' | '~' | '@' |
                '!' | '$' | '&' | '\'' | '(' | ')' |
                '*' | '+' | ',' | ';' | '=' | '%'
            )
        })
        .verify_map(|text| {
            percent_encoding::percent_decode_str(text)
                .decode_utf8()
                .ok()
                .map(PathFragment::Literal)
        })
        .parse_next(input)
    }
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
#[error("invalid endpoint path template")]
#[diagnostic(help("paths start with `/`, and placeholders look like `:id` or `{{id}}`"))]
pub struct BadPath {
    #[source_code]
    code: String,
    #[label]
    span: SourceSpan,
}

impl BadPath {
    fn from_parse_error(error: ParseError<&str, ContextError>) -> Self {
        let input = *error.input();
        Self {
            code: input.to_owned(),
            span: error.char_span().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_path() {
        let result = parse("/").unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].fragments(), &[]);
    }

    #[test]
    fn test_literal_segments() {
        let result = parse("/auth/logout").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].fragments(), &[PathFragment::Literal("auth".into())]);
        assert_eq!(
            result[1].fragments(),
            &[PathFragment::Literal("logout".into())]
        );
    }

    #[test]
    fn test_colon_placeholder() {
        let result = parse("/users/:id/avatar").unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[1].fragments(), &[PathFragment::Param("id")]);
        assert_eq!(params(&result).collect_vec(), ["id"]);
    }

    #[test]
    fn test_braced_placeholder() {
        let result = parse("/orgs/{orgId}/members/{member-id}").unwrap();

        assert_eq!(params(&result).collect_vec(), ["orgId", "member-id"]);
    }

    #[test]
    fn test_placeholder_with_literal_text() {
        let result = parse("/reports/report-{id}.pdf").unwrap();

        assert_eq!(
            result[1].fragments(),
            &[
                PathFragment::Literal("report-".into()),
                PathFragment::Param("id"),
                PathFragment::Literal(".pdf".into())
            ]
        );
    }

    #[test]
    fn test_colon_placeholder_ends_at_punctuation() {
        let result = parse("/files/:name.json").unwrap();

        assert_eq!(
            result[1].fragments(),
            &[
                PathFragment::Param("name"),
                PathFragment::Literal(".json".into())
            ]
        );
    }

    #[test]
    fn test_percent_encoded_literal() {
        let result = parse("/search/caf%C3%A9").unwrap();

        assert_eq!(result[1].fragments(), &[PathFragment::Literal("café".into())]);
    }

    #[test]
    fn test_trailing_slash() {
        let result = parse("/users/").unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].fragments(), &[]);
    }

    #[test]
    fn test_missing_leading_slash() {
        assert!(parse("users/:id").is_err());
    }

    #[test]
    fn test_double_slash() {
        assert!(parse("/users//a").is_err());
    }

    #[test]
    fn test_empty_placeholders() {
        assert!(parse("/users/:").is_err());
        assert!(parse("/users/{}").is_err());
    }

    #[test]
    fn test_nested_braces() {
        assert!(parse("/users/{user/{id}}").is_err());
    }
}
