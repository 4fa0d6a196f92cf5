use crate::{
    config::{CodegenOptions, ConfigError, Provider, ResolvedConfig},
    registry::Registry,
    signature::Signature,
};

use super::ArtifactKind;

/// Everything a generator reads during one run.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorContext<'a> {
    config: &'a ResolvedConfig,
    registry: &'a Registry,
    base_url: &'a str,
}

impl<'a> GeneratorContext<'a> {
    /// Builds a context, resolving the base URL from the configuration,
    /// or the registry if the configuration doesn't set one.
    pub fn new(config: &'a ResolvedConfig, registry: &'a Registry) -> Result<Self, ConfigError> {
        let base_url = config
            .base_url
            .as_deref()
            .or_else(|| registry.base_url())
            .ok_or(ConfigError::MissingBaseUrl)?;
        Ok(Self {
            config,
            registry,
            base_url,
        })
    }

    #[inline]
    pub fn config(&self) -> &'a ResolvedConfig {
        self.config
    }

    #[inline]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    pub fn options(&self) -> &'a CodegenOptions {
        &self.config.options
    }

    #[inline]
    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    /// The default base URL for endpoints that don't override it.
    #[inline]
    pub fn base_url(&self) -> &'a str {
        self.base_url
    }

    /// Returns the signature of every endpoint, in registry order.
    #[inline]
    pub fn signatures(&self) -> impl ExactSizeIterator<Item = Signature<'a>> + use<'a> {
        self.registry.signatures()
    }

    #[inline]
    pub fn custom_imports(&self, kind: ArtifactKind) -> &'a [String] {
        self.config.custom_imports(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use pretty_assertions::assert_eq;

    use crate::{config::ConfigFile, tests::assert_matches};

    fn config(toml: &str) -> ResolvedConfig {
        ConfigFile::from_toml(toml)
            .unwrap()
            .resolve(Path::new("."))
            .unwrap()
    }

    #[test]
    fn test_config_base_url_wins() {
        let config = config(indoc::indoc! {r#"
            provider = "vite"
            endpoints = "e.yaml"
            output = "out"
            base-url = "http://localhost:3000/api"
        "#});
        let registry = Registry::new(
            Some("https://api.example.com".to_owned()),
            std::iter::empty::<(String, _)>(),
        )
        .unwrap();

        let cx = GeneratorContext::new(&config, &registry).unwrap();

        assert_eq!(cx.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_registry_base_url_fallback() {
        let config = config(indoc::indoc! {r#"
            provider = "vite"
            endpoints = "e.yaml"
            output = "out"
        "#});
        let registry = Registry::new(
            Some("https://api.example.com".to_owned()),
            std::iter::empty::<(String, _)>(),
        )
        .unwrap();

        let cx = GeneratorContext::new(&config, &registry).unwrap();

        assert_eq!(cx.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_missing_base_url() {
        let config = config(indoc::indoc! {r#"
            provider = "vite"
            endpoints = "e.yaml"
            output = "out"
        "#});
        let registry = Registry::new(None, std::iter::empty::<(String, _)>()).unwrap();

        assert_matches!(
            GeneratorContext::new(&config, &registry),
            Err(ConfigError::MissingBaseUrl),
        );
    }
}
