use std::{
    cell::RefCell,
    io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;

/// Writes artifact text to a location.
///
/// Writing the same path twice replaces its contents, so that
/// regenerating with unchanged inputs is idempotent.
pub trait Writer {
    /// Writes `text` to `path`, relative to the writer's root.
    fn write(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// Writes artifacts under a directory on disk, creating missing
/// directories as needed.
#[derive(Clone, Debug)]
pub struct DiskWriter {
    root: PathBuf,
}

impl DiskWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Writer for DiskWriter {
    fn write(&self, path: &Path, text: &str) -> io::Result<()> {
        let path = self.root.join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, text)
    }
}

/// Records artifacts in memory, in the order they were first written.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    files: RefCell<IndexMap<PathBuf, String>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text written to `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Returns the paths written so far.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn into_files(self) -> IndexMap<PathBuf, String> {
        self.files.into_inner()
    }
}

impl Writer for MemoryWriter {
    fn write(&self, path: &Path, text: &str) -> io::Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_owned(), text.to_owned());
        Ok(())
    }
}
