use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Failures raised while fetching catalog and level documents.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The document could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The source does not hold the requested document.
    #[error("document `{0}` is not available")]
    Missing(String),
}

/// Provider of the raw JSON documents the explorer loads.
pub trait DocumentSource {
    /// Text of the tile catalog document.
    fn catalog(&self) -> Result<String, SourceError>;

    /// Text of the level document `level` inside `world`.
    fn level(&self, world: &str, level: &str) -> Result<String, SourceError>;
}

/// Reads documents from an asset directory.
///
/// The catalog lives at `objects/tiles.json` and levels at
/// `worlds/<world>/levels/<level>.json` below the root.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at the provided directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset directory the source reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: PathBuf) -> Result<String, SourceError> {
        fs::read_to_string(&path).map_err(|source| SourceError::Io { path, source })
    }
}

impl DocumentSource for DirectorySource {
    fn catalog(&self) -> Result<String, SourceError> {
        self.read(self.root.join("objects").join("tiles.json"))
    }

    fn level(&self, world: &str, level: &str) -> Result<String, SourceError> {
        self.read(
            self.root
                .join("worlds")
                .join(world)
                .join("levels")
                .join(format!("{level}.json")),
        )
    }
}

/// Serves documents held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    catalog: Option<String>,
    levels: HashMap<(String, String), String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the tile catalog document.
    #[must_use]
    pub fn with_catalog(mut self, text: impl Into<String>) -> Self {
        self.catalog = Some(text.into());
        self
    }

    /// Registers the level document `level` inside `world`.
    #[must_use]
    pub fn with_level(
        mut self,
        world: impl Into<String>,
        level: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let _ = self
            .levels
            .insert((world.into(), level.into()), text.into());
        self
    }
}

impl DocumentSource for MemorySource {
    fn catalog(&self) -> Result<String, SourceError> {
        self.catalog
            .clone()
            .ok_or_else(|| SourceError::Missing("tile catalog".to_owned()))
    }

    fn level(&self, world: &str, level: &str) -> Result<String, SourceError> {
        self.levels
            .get(&(world.to_owned(), level.to_owned()))
            .cloned()
            .ok_or_else(|| SourceError::Missing(format!("{world}/{level}")))
    }
}
