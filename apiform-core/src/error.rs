/// An error deserializing a registry document.
///
/// Both variants carry the path to the offending field, like
/// `endpoints.getUser.method`.
#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum SerdeError {
    #[error("invalid registry document at `{}`", .0.path())]
    Json(#[source] serde_path_to_error::Error<serde_json::Error>),
    #[error("invalid registry document at `{}`", .0.path())]
    Yaml(#[source] serde_path_to_error::Error<serde_yaml::Error>),
    #[error("trailing characters after registry document")]
    TrailingJson(#[source] serde_json::Error),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for SerdeError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Json(err)
    }
}

impl From<serde_path_to_error::Error<serde_yaml::Error>> for SerdeError {
    fn from(err: serde_path_to_error::Error<serde_yaml::Error>) -> Self {
        Self::Yaml(err)
    }
}
