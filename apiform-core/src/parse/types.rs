use std::fmt::{self, Display};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

use crate::error::SerdeError;

/// A registry document, as written by the user.
///
/// The document isn't validated beyond its shape; see
/// [`Registry::from_doc`](crate::registry::Registry::from_doc).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub base_url: Option<String>,
    pub endpoints: Endpoints,
}

impl Document {
    /// Parses a registry document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SerdeError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml);
        let result = serde_path_to_error::deserialize(deserializer)?;
        Ok(result)
    }

    /// Parses a registry document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SerdeError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let result = serde_path_to_error::deserialize(&mut deserializer)?;
        deserializer.end().map_err(SerdeError::TrailingJson)?;
        Ok(result)
    }
}

/// Named endpoints in document order.
///
/// Unlike a map, this keeps every entry, including entries with
/// duplicate names, so that the registry can reject them.
#[derive(Debug, Default)]
pub struct Endpoints(pub Vec<(String, Endpoint)>);

impl<'de> Deserialize<'de> for Endpoints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EndpointsVisitor;

        impl<'de> Visitor<'de> for EndpointsVisitor {
            type Value = Endpoints;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of endpoint names to endpoints")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Endpoint>()? {
                    entries.push(entry);
                }
                Ok(Endpoints(entries))
            }
        }

        deserializer.deserialize_map(EndpointsVisitor)
    }
}

/// A single endpoint definition.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    #[serde(default)]
    pub params: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub response: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
