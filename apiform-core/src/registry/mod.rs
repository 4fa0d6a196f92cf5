use std::fmt::{self, Display};

use indexmap::{IndexMap, map::Entry};
use itertools::Itertools;

use crate::{
    parse::{self, Document, Method},
    signature::{Category, Signature, capitalize},
};

mod error;
mod ident;

pub use error::RegistryError;
pub use ident::{
    is_identifier_continue, is_identifier_like, is_valid_endpoint_name, is_valid_identifier,
};

/// A reference to a validation schema, by the name that the schemas
/// module exports it under.
///
/// The generator never looks inside a schema; it only cares whether
/// a reference is present.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SchemaRef(String);

impl SchemaRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named endpoint.
#[derive(Clone, Debug)]
pub struct EndpointDescriptor {
    pub path: String,
    pub method: Method,
    pub params: Option<SchemaRef>,
    pub query: Option<SchemaRef>,
    pub body: Option<SchemaRef>,
    pub response: SchemaRef,
    /// Overrides the registry's base URL for this endpoint only.
    pub base_url: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl EndpointDescriptor {
    /// Creates an endpoint without optional parts.
    pub fn new(method: Method, path: impl Into<String>, response: SchemaRef) -> Self {
        Self {
            path: path.into(),
            method,
            params: None,
            query: None,
            body: None,
            response,
            base_url: None,
            tags: Vec::new(),
            description: None,
        }
    }

    /// Returns every schema this endpoint references, in
    /// params, query, body, response order.
    pub fn schemas(&self) -> impl Iterator<Item = &SchemaRef> {
        itertools::chain!(&self.params, &self.query, &self.body, std::iter::once(&self.response))
    }
}

impl From<parse::Endpoint> for EndpointDescriptor {
    fn from(endpoint: parse::Endpoint) -> Self {
        Self {
            path: endpoint.path,
            method: endpoint.method,
            params: endpoint.params.map(SchemaRef),
            query: endpoint.query.map(SchemaRef),
            body: endpoint.body.map(SchemaRef),
            response: SchemaRef(endpoint.response),
            base_url: endpoint.base_url,
            tags: endpoint.tags,
            description: endpoint.description,
        }
    }
}

/// The validated, immutable set of endpoints that drives generation.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    base_url: Option<String>,
    endpoints: IndexMap<String, EndpointDescriptor>,
}

impl Registry {
    /// Builds a registry from named endpoints, keeping their order.
    pub fn new<S: Into<String>>(
        base_url: Option<String>,
        endpoints: impl IntoIterator<Item = (S, EndpointDescriptor)>,
    ) -> Result<Self, RegistryError> {
        if base_url.as_deref().is_some_and(str::is_empty) {
            return Err(RegistryError::EmptyBaseUrl);
        }

        let mut map = IndexMap::new();
        // Generated type and hook names capitalize the endpoint name,
        // so `getUser` and `GetUser` would declare the same identifiers.
        let mut capitalized = IndexMap::new();
        for (name, endpoint) in endpoints {
            let name = name.into();
            validate(&name, &endpoint)?;
            let key = capitalize(&name).into_owned();
            match map.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(RegistryError::DuplicateEndpoint(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    if let Some(existing) = capitalized.get(&key) {
                        return Err(RegistryError::ConflictingEndpoint {
                            endpoint: entry.key().clone(),
                            existing: String::clone(existing),
                            identifier: key,
                        });
                    }
                    capitalized.insert(key, entry.key().clone());
                    entry.insert(endpoint);
                }
            }
        }

        Ok(Self {
            base_url,
            endpoints: map,
        })
    }

    /// Builds a registry from a parsed document.
    pub fn from_doc(doc: Document) -> Result<Self, RegistryError> {
        Self::new(
            doc.base_url,
            doc.endpoints
                .0
                .into_iter()
                .map(|(name, endpoint)| (name, EndpointDescriptor::from(endpoint))),
        )
    }

    #[inline]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.get(name)
    }

    /// Returns an iterator over all endpoints, in registry order.
    #[inline]
    pub fn endpoints(&self) -> impl ExactSizeIterator<Item = (&str, &EndpointDescriptor)> {
        self.endpoints
            .iter()
            .map(|(name, endpoint)| (name.as_str(), endpoint))
    }

    /// Returns the derived signature of every endpoint, in registry order.
    #[inline]
    pub fn signatures(&self) -> impl ExactSizeIterator<Item = Signature<'_>> {
        self.endpoints()
            .map(|(name, endpoint)| Signature::new(name, endpoint))
    }

    /// Returns endpoints whose stored category tag disagrees with
    /// the category derived from their method.
    ///
    /// These never affect generation, where the method always wins,
    /// but usually mean the registry has a typo.
    pub fn category_conflicts(&self) -> impl Iterator<Item = CategoryConflict<'_>> {
        self.signatures().flat_map(|sig| {
            sig.endpoint
                .tags
                .iter()
                .filter(|tag| Category::is_reserved(tag))
                .filter(move |&tag| tag != sig.category.as_str())
                .map(move |tag| CategoryConflict {
                    endpoint: sig.name,
                    method: sig.endpoint.method,
                    stored: tag.as_str(),
                    derived: sig.category,
                })
        })
    }
}

/// An endpoint whose stored category tag contradicts its method.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CategoryConflict<'a> {
    pub endpoint: &'a str,
    pub method: Method,
    pub stored: &'a str,
    pub derived: Category,
}

impl Display for CategoryConflict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "endpoint `{}` is tagged `{}`, but `{}` makes it a {}",
            self.endpoint,
            self.stored,
            self.method,
            self.derived.as_str(),
        )
    }
}

fn validate(name: &str, endpoint: &EndpointDescriptor) -> Result<(), RegistryError> {
    if !is_valid_endpoint_name(name) {
        return Err(RegistryError::InvalidName(name.to_owned()));
    }

    let segments = parse::path::parse(&endpoint.path).map_err(|source| RegistryError::BadPath {
        endpoint: name.to_owned(),
        source,
    })?;
    let placeholders = parse::path::params(&segments).collect_vec();
    match (&endpoint.params, placeholders.is_empty()) {
        (None, false) => {
            return Err(RegistryError::UnboundPathParams {
                endpoint: name.to_owned(),
                placeholders: placeholders.into_iter().map(str::to_owned).collect(),
            });
        }
        (Some(params), true) => {
            tracing::warn!(
                endpoint = name,
                %params,
                "endpoint has a `params` schema, but its path has no placeholders",
            );
        }
        _ => {}
    }

    let fields = [
        ("params", endpoint.params.as_ref()),
        ("query", endpoint.query.as_ref()),
        ("body", endpoint.body.as_ref()),
        ("response", Some(&endpoint.response)),
    ];
    for (field, schema) in fields {
        if let Some(schema) = schema
            && !is_valid_identifier(schema.as_str())
        {
            return Err(RegistryError::InvalidSchemaRef {
                endpoint: name.to_owned(),
                field,
                schema: schema.0.clone(),
            });
        }
    }

    if endpoint.tags.iter().any(|tag| tag.is_empty()) {
        return Err(RegistryError::EmptyTag(name.to_owned()));
    }
    if let Some(tag) = endpoint.tags.iter().duplicates().next() {
        return Err(RegistryError::DuplicateTag {
            endpoint: name.to_owned(),
            tag: tag.clone(),
        });
    }

    if endpoint.base_url.as_deref().is_some_and(str::is_empty) {
        return Err(RegistryError::EmptyEndpointBaseUrl(name.to_owned()));
    }

    Ok(())
}
