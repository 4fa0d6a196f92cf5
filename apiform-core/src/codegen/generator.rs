use std::{io, path::PathBuf};

use super::{Artifact, Code, GeneratorKind, Writer};

/// Renders artifacts from a shared context.
///
/// Implementations hold a [`GeneratorContext`](super::GeneratorContext),
/// and never change it.
pub trait Generator {
    fn kind(&self) -> GeneratorKind;

    /// Renders every artifact this generator produces, without writing
    /// them anywhere.
    fn artifacts(&self) -> Vec<Artifact>;

    /// Renders and writes every artifact, in order, returning the
    /// written paths. Stops at the first write that fails.
    fn generate(&self, writer: &dyn Writer) -> Result<Vec<PathBuf>, GenerateError> {
        let kind = self.kind();
        self.artifacts()
            .into_iter()
            .map(|artifact| {
                let path = PathBuf::from(artifact.path());
                tracing::debug!(
                    generator = %kind,
                    path = %path.display(),
                    bytes = artifact.text().len(),
                    "writing artifact",
                );
                match writer.write(&path, artifact.text()) {
                    Ok(()) => Ok(path),
                    Err(source) => Err(GenerateError::Write { kind, path, source }),
                }
            })
            .collect()
    }
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum GenerateError {
    #[error("{kind} generator failed to write `{}`", .path.display())]
    Write {
        kind: GeneratorKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
