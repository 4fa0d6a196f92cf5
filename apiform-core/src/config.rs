use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    codegen::ArtifactKind,
    registry::{is_identifier_continue, is_identifier_like},
};

/// The framework that consumes the generated code.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Next.js, which renders on the server, and gets server actions,
    /// server queries, and a server-side client.
    Nextjs,
    /// Vite, which only renders on the client.
    Vite,
}

impl Provider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nextjs => "nextjs",
            Self::Vite => "vite",
        }
    }

    #[inline]
    pub fn is_server_rendering(self) -> bool {
        matches!(self, Self::Nextjs)
    }
}

/// The configuration for one generation run.
///
/// Built once by [`ConfigFile::resolve`], and never changed afterward.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub provider: Provider,
    /// The registry document.
    pub endpoints: PathBuf,
    /// The directory that generated artifacts are written to.
    pub output: PathBuf,
    /// Overrides the registry's base URL.
    pub base_url: Option<String>,
    /// An environment variable that overrides the base URL when the
    /// generated code runs.
    pub base_url_env: Option<String>,
    pub generate_client: bool,
    pub generate_hooks: bool,
    pub generate_server_actions: bool,
    pub generate_server_queries: bool,
    pub options: CodegenOptions,
}

impl ResolvedConfig {
    /// Returns the import lines to inject into an artifact.
    #[inline]
    pub fn custom_imports(&self, kind: ArtifactKind) -> &[String] {
        self.options
            .custom_imports
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Options that change what the generated code looks like.
#[derive(Clone, Debug)]
pub struct CodegenOptions {
    /// Adds a `'use client'` directive to client-side artifacts.
    pub use_client_directive: bool,
    pub hook_prefix: String,
    pub action_suffix: String,
    pub query_suffix: String,
    /// The module specifier, relative to the output directory, that
    /// exports every schema the registry references.
    pub schemas_module: String,
    pub custom_imports: IndexMap<ArtifactKind, Vec<String>>,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            use_client_directive: true,
            hook_prefix: "use".to_owned(),
            action_suffix: "Action".to_owned(),
            query_suffix: "Query".to_owned(),
            schemas_module: "../schemas".to_owned(),
            custom_imports: IndexMap::new(),
        }
    }
}

/// An `apiform.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub endpoints: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub base_url_env: Option<String>,
    #[serde(default)]
    pub generate_client: Option<bool>,
    #[serde(default)]
    pub generate_hooks: Option<bool>,
    #[serde(default)]
    pub generate_server_actions: Option<bool>,
    #[serde(default)]
    pub generate_server_queries: Option<bool>,
    #[serde(default)]
    pub options: OptionsFile,
}

/// The `[options]` table of an `apiform.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OptionsFile {
    #[serde(default)]
    pub use_client_directive: Option<bool>,
    #[serde(default)]
    pub hook_prefix: Option<String>,
    #[serde(default)]
    pub action_suffix: Option<String>,
    #[serde(default)]
    pub query_suffix: Option<String>,
    #[serde(default)]
    pub schemas_module: Option<String>,
    #[serde(default)]
    pub custom_imports: IndexMap<ArtifactKind, Vec<String>>,
}

impl ConfigFile {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Fills in defaults, resolves relative paths against `base_dir`,
    /// and checks that the result is usable.
    pub fn resolve(self, base_dir: &Path) -> Result<ResolvedConfig, ConfigError> {
        let provider = self.provider.ok_or(ConfigError::Missing("provider"))?;
        let endpoints = self.endpoints.ok_or(ConfigError::Missing("endpoints"))?;
        let output = self.output.ok_or(ConfigError::Missing("output"))?;
        if output.as_os_str().is_empty() {
            return Err(ConfigError::Missing("output"));
        }

        if self.base_url.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if let Some(var) = &self.base_url_env
            && !is_identifier_like(var)
        {
            return Err(ConfigError::InvalidEnvVar(var.clone()));
        }

        let defaults = CodegenOptions::default();
        let options = CodegenOptions {
            use_client_directive: self
                .options
                .use_client_directive
                .unwrap_or(defaults.use_client_directive),
            hook_prefix: self.options.hook_prefix.unwrap_or(defaults.hook_prefix),
            action_suffix: self.options.action_suffix.unwrap_or(defaults.action_suffix),
            query_suffix: self.options.query_suffix.unwrap_or(defaults.query_suffix),
            schemas_module: self
                .options
                .schemas_module
                .unwrap_or(defaults.schemas_module),
            custom_imports: self.options.custom_imports,
        };

        if !is_identifier_like(&options.hook_prefix) {
            return Err(ConfigError::InvalidAffix {
                option: "hook-prefix",
                value: options.hook_prefix,
            });
        }
        // Endpoint names may be reserved words, so a suffix can't be
        // empty.
        for (option, value) in [
            ("action-suffix", &options.action_suffix),
            ("query-suffix", &options.query_suffix),
        ] {
            if value.is_empty() || !is_identifier_continue(value) {
                return Err(ConfigError::InvalidAffix {
                    option,
                    value: value.clone(),
                });
            }
        }
        if options.schemas_module.trim().is_empty() {
            return Err(ConfigError::Missing("options.schemas-module"));
        }
        for (&kind, lines) in &options.custom_imports {
            if let Some(line) = lines
                .iter()
                .find(|line| !line.trim_start().starts_with("import "))
            {
                return Err(ConfigError::InvalidCustomImport {
                    kind,
                    line: line.clone(),
                });
            }
        }

        Ok(ResolvedConfig {
            provider,
            endpoints: base_dir.join(endpoints),
            output: base_dir.join(output),
            base_url: self.base_url,
            base_url_env: self.base_url_env,
            generate_client: self.generate_client.unwrap_or(true),
            generate_hooks: self.generate_hooks.unwrap_or(true),
            generate_server_actions: self.generate_server_actions.unwrap_or(false),
            generate_server_queries: self.generate_server_queries.unwrap_or(false),
            options,
        })
    }
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration file")]
    Parse(#[from] toml::de::Error),

    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("`base-url` is empty")]
    EmptyBaseUrl,

    #[error("`base-url-env` names an invalid environment variable `{0}`")]
    InvalidEnvVar(String),

    #[error("`{option}` is `{value}`, which can't be part of an identifier")]
    InvalidAffix { option: &'static str, value: String },

    #[error("custom import for `{}` isn't an `import` statement: `{line}`", .kind.file_name())]
    InvalidCustomImport { kind: ArtifactKind, line: String },

    #[error("no base URL; set `base-url` in the configuration, or `baseUrl` in the registry")]
    MissingBaseUrl,
}
