use std::fmt::{self, Display};

use serde::Deserialize;

use super::Code;

/// A generated file, identified by what it contains.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Runtime,
    Types,
    Client,
    ServerClient,
    Hooks,
    Actions,
    Queries,
}

impl ArtifactKind {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Runtime => "runtime.ts",
            Self::Types => "types.ts",
            Self::Client => "client.ts",
            Self::ServerClient => "server-client.ts",
            Self::Hooks => "hooks.ts",
            Self::Actions => "actions.ts",
            Self::Queries => "queries.ts",
        }
    }

    /// The relative module specifier that sibling artifacts import.
    pub const fn module(self) -> &'static str {
        match self {
            Self::Runtime => "./runtime",
            Self::Types => "./types",
            Self::Client => "./client",
            Self::ServerClient => "./server-client",
            Self::Hooks => "./hooks",
            Self::Actions => "./actions",
            Self::Queries => "./queries",
        }
    }

    /// Returns `true` if the artifact runs in the browser, and should
    /// start with a `'use client'` directive.
    #[inline]
    pub fn is_client_side(self) -> bool {
        matches!(self, Self::Client | Self::Hooks)
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// The rendered text of one artifact, ready to write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    kind: ArtifactKind,
    path: String,
    text: String,
}

impl Artifact {
    pub fn from_code(kind: ArtifactKind, code: impl Code) -> Self {
        let path = code.path().to_owned();
        Self {
            kind,
            path,
            text: code.into_string(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Code for Artifact {
    fn path(&self) -> &str {
        &self.path
    }

    fn into_string(self) -> String {
        self.text
    }
}
