//! Selects, orders, and runs generators.

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::config::ResolvedConfig;

use super::{GenerateError, Generator, Writer};

/// A kind of generator.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum GeneratorKind {
    Runtime,
    Types,
    Client,
    Hooks,
    ServerActions,
    ServerQueries,
}

impl GeneratorKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Types => "types",
            Self::Client => "client",
            Self::Hooks => "hooks",
            Self::ServerActions => "server actions",
            Self::ServerQueries => "server queries",
        }
    }

    /// Returns the kinds whose artifacts this kind's code imports.
    pub const fn depends_on(self) -> &'static [GeneratorKind] {
        match self {
            Self::Runtime => &[],
            Self::Types => &[Self::Runtime],
            Self::Client => &[Self::Runtime, Self::Types],
            Self::Hooks => &[Self::Runtime, Self::Types, Self::Client],
            Self::ServerActions => &[Self::Types, Self::Client],
            Self::ServerQueries => &[Self::Types, Self::Client],
        }
    }
}

impl Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry in [`GENERATOR_PLAN`].
#[derive(Clone, Copy)]
pub struct GeneratorStep {
    pub kind: GeneratorKind,
    /// Returns `true` if this step runs for a configuration.
    pub enabled: fn(&ResolvedConfig) -> bool,
}

impl fmt::Debug for GeneratorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorStep")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Every generator, in the order it runs. A step always comes after
/// the steps it depends on.
pub const GENERATOR_PLAN: &[GeneratorStep] = &[
    GeneratorStep {
        kind: GeneratorKind::Runtime,
        enabled: always,
    },
    GeneratorStep {
        kind: GeneratorKind::Types,
        enabled: always,
    },
    GeneratorStep {
        kind: GeneratorKind::Client,
        enabled: client,
    },
    GeneratorStep {
        kind: GeneratorKind::Hooks,
        enabled: hooks,
    },
    GeneratorStep {
        kind: GeneratorKind::ServerActions,
        enabled: server_actions,
    },
    GeneratorStep {
        kind: GeneratorKind::ServerQueries,
        enabled: server_queries,
    },
];

fn always(_: &ResolvedConfig) -> bool {
    true
}

fn client(config: &ResolvedConfig) -> bool {
    config.generate_client
}

fn hooks(config: &ResolvedConfig) -> bool {
    config.generate_hooks
}

fn server_actions(config: &ResolvedConfig) -> bool {
    config.provider.is_server_rendering() && config.generate_server_actions
}

fn server_queries(config: &ResolvedConfig) -> bool {
    config.provider.is_server_rendering() && config.generate_server_queries
}

/// Returns the kinds of generators that run for a configuration,
/// in plan order.
pub fn select_generators(config: &ResolvedConfig) -> Vec<GeneratorKind> {
    GENERATOR_PLAN
        .iter()
        .filter(|step| (step.enabled)(config))
        .map(|step| step.kind)
        .collect()
}

/// Returns `(kind, dependency)` pairs for selected kinds whose
/// dependencies weren't selected. Their artifacts import modules
/// that this run won't write.
pub fn unmet_dependencies(kinds: &[GeneratorKind]) -> Vec<(GeneratorKind, GeneratorKind)> {
    kinds
        .iter()
        .flat_map(|&kind| kind.depends_on().iter().map(move |&dep| (kind, dep)))
        .filter(|(_, dep)| !kinds.contains(dep))
        .collect()
}

/// The artifacts written by a run, in write order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunReport {
    written: Vec<(GeneratorKind, PathBuf)>,
}

impl RunReport {
    #[inline]
    pub fn len(&self) -> usize {
        self.written.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (GeneratorKind, &Path)> {
        self.written
            .iter()
            .map(|(kind, path)| (*kind, path.as_path()))
    }

    pub fn paths(&self) -> impl ExactSizeIterator<Item = &Path> {
        self.iter().map(|(_, path)| path)
    }
}

/// Runs generators one at a time, in the given order.
///
/// Stops at the first failure. Artifacts that earlier generators
/// wrote stay written.
pub fn run<'a>(
    generators: impl IntoIterator<Item = Box<dyn Generator + 'a>>,
    writer: &dyn Writer,
) -> Result<RunReport, GenerateError> {
    let mut report = RunReport::default();
    for generator in generators {
        let kind = generator.kind();
        let paths = generator.generate(writer)?;
        tracing::info!(
            generator = %kind,
            artifacts = %paths.iter().map(|path| path.display()).join(", "),
            "generated",
        );
        report
            .written
            .extend(paths.into_iter().map(|path| (kind, path)));
    }
    Ok(report)
}
