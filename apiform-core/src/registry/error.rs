use crate::parse::path::BadPath;

/// An error constructing a [`Registry`](super::Registry).
#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum RegistryError {
    #[error("endpoint `{0}` is defined more than once")]
    #[diagnostic(help("endpoint names must be unique across the registry"))]
    DuplicateEndpoint(String),

    #[error("endpoint `{endpoint}` generates the same `{identifier}` names as endpoint `{existing}`")]
    #[diagnostic(help("endpoint names must differ by more than the case of their first letter"))]
    ConflictingEndpoint {
        endpoint: String,
        existing: String,
        identifier: String,
    },

    #[error("endpoint name `{0}` isn't a valid JavaScript identifier, or is reserved")]
    #[diagnostic(help("`refreshAuth`, `updateAuthCallbacks`, and `__proto__` are reserved for the generated client"))]
    InvalidName(String),

    #[error("endpoint `{endpoint}` has an invalid path")]
    BadPath {
        endpoint: String,
        #[source]
        #[diagnostic_source]
        source: BadPath,
    },

    #[error("endpoint `{endpoint}` has path placeholders ({}), but no `params` schema", .placeholders.join(", "))]
    UnboundPathParams {
        endpoint: String,
        placeholders: Vec<String>,
    },

    #[error("endpoint `{endpoint}` has an invalid `{field}` schema reference `{schema}`")]
    #[diagnostic(help("schema references name an identifier exported by the schemas module"))]
    InvalidSchemaRef {
        endpoint: String,
        field: &'static str,
        schema: String,
    },

    #[error("endpoint `{0}` has an empty tag")]
    EmptyTag(String),

    #[error("endpoint `{endpoint}` lists tag `{tag}` more than once")]
    DuplicateTag { endpoint: String, tag: String },

    #[error("endpoint `{0}` has an empty base URL")]
    EmptyEndpointBaseUrl(String),

    #[error("registry has an empty base URL")]
    EmptyBaseUrl,
}
