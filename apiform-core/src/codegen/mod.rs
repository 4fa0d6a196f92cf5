mod artifact;
mod context;
mod generator;
pub mod orchestrator;
mod writer;

pub use artifact::{Artifact, ArtifactKind};
pub use context::GeneratorContext;
pub use generator::{GenerateError, Generator};
pub use orchestrator::{GENERATOR_PLAN, GeneratorKind, GeneratorStep, RunReport};
pub use writer::{DiskWriter, MemoryWriter, Writer};

/// A rendered source file.
pub trait Code {
    /// The file's path, relative to the output directory.
    fn path(&self) -> &str;

    fn into_string(self) -> String;
}

impl<P: AsRef<str>> Code for (P, String) {
    fn path(&self) -> &str {
        self.0.as_ref()
    }

    fn into_string(self) -> String {
        self.1
    }
}
