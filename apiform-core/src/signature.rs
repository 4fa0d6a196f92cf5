//! Derives the call signature of an endpoint.
//!
//! Every generator builds its identifiers, argument lists, cache keys,
//! and invalidation groups from these functions, so that the artifacts
//! they emit agree with each other.

use std::borrow::Cow;

use crate::{parse::Method, registry::EndpointDescriptor};

/// Whether an endpoint reads or writes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    Query,
    Mutation,
}

impl Category {
    /// The reserved tag labels, which are never domain tags.
    pub const RESERVED: [&'static str; 2] = ["query", "mutation"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }

    #[inline]
    pub fn is_reserved(tag: &str) -> bool {
        Self::RESERVED.contains(&tag)
    }
}

/// Returns the category of an endpoint. Only the method decides;
/// stored tags are ignored.
#[inline]
pub fn category(endpoint: &EndpointDescriptor) -> Category {
    if is_query(endpoint) {
        Category::Query
    } else {
        Category::Mutation
    }
}

#[inline]
pub fn is_query(endpoint: &EndpointDescriptor) -> bool {
    endpoint.method == Method::Get
}

#[inline]
pub fn is_mutation(endpoint: &EndpointDescriptor) -> bool {
    !is_query(endpoint)
}

/// Which optional inputs an endpoint takes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Shape {
    pub has_params: bool,
    pub has_query: bool,
    pub has_body: bool,
}

impl Shape {
    /// Returns `true` if the endpoint takes no inputs at all.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.has_params || self.has_query || self.has_body)
    }
}

#[inline]
pub fn shape(endpoint: &EndpointDescriptor) -> Shape {
    Shape {
        has_params: endpoint.params.is_some(),
        has_query: endpoint.query.is_some(),
        has_body: endpoint.body.is_some(),
    }
}

/// Returns the domain tags of an endpoint, in their stored order.
/// A successful mutation invalidates one cache group per domain tag.
pub fn invalidation_tags(endpoint: &EndpointDescriptor) -> impl Iterator<Item = &str> {
    endpoint
        .tags
        .iter()
        .map(String::as_str)
        .filter(|tag| !Category::is_reserved(tag))
}

/// One positional argument at a generated call site.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CallArgument {
    Params,
    Query,
    Body,
}

impl CallArgument {
    /// The argument's binding name in generated code.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Params => "params",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

/// Returns the arguments that a call site passes for an endpoint of
/// the given shape: params, then query, then body. Absent inputs are
/// left out rather than passed as placeholders.
pub fn call_arguments(shape: Shape) -> Vec<CallArgument> {
    [
        (shape.has_params, CallArgument::Params),
        (shape.has_query, CallArgument::Query),
        (shape.has_body, CallArgument::Body),
    ]
    .into_iter()
    .filter_map(|(present, arg)| present.then_some(arg))
    .collect()
}

/// How [`identifier_for`] combines an affix with an endpoint name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Affix<'a> {
    /// `Capitalize(name)`: `getUser` becomes `GetUser`.
    None,
    /// `prefix + Capitalize(name)`: `use` and `getUser` become `useGetUser`.
    Prefix(&'a str),
    /// `name + Capitalize(suffix)`: `createUser` and `Action` become
    /// `createUserAction`.
    Suffix(&'a str),
}

/// Builds a generated identifier from an affix and an endpoint name.
pub fn identifier_for(affix: Affix<'_>, name: &str) -> String {
    match affix {
        Affix::None => capitalize(name).into_owned(),
        Affix::Prefix(prefix) => format!("{prefix}{}", capitalize(name)),
        Affix::Suffix(suffix) => format!("{name}{}", capitalize(suffix)),
    }
}

/// Uppercases the first character of a string, leaving the rest as-is.
pub fn capitalize(s: &str) -> Cow<'_, str> {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(s),
    }
}

/// The derived signature of one named endpoint.
#[derive(Clone, Copy, Debug)]
pub struct Signature<'a> {
    pub name: &'a str,
    pub endpoint: &'a EndpointDescriptor,
    pub shape: Shape,
    pub category: Category,
}

impl<'a> Signature<'a> {
    pub fn new(name: &'a str, endpoint: &'a EndpointDescriptor) -> Self {
        Self {
            name,
            endpoint,
            shape: shape(endpoint),
            category: category(endpoint),
        }
    }

    #[inline]
    pub fn is_query(&self) -> bool {
        self.category == Category::Query
    }

    #[inline]
    pub fn call_arguments(&self) -> Vec<CallArgument> {
        call_arguments(self.shape)
    }

    #[inline]
    pub fn invalidation_tags(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        invalidation_tags(self.endpoint)
    }

    #[inline]
    pub fn identifier(&self, affix: Affix<'_>) -> String {
        identifier_for(affix, self.name)
    }
}
