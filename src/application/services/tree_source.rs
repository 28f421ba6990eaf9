//! Tree loading service
//!
//! Reads nested tree documents (JSON or TOML) and validates them into a `Tree`.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{sample_tree, Tree, TreeSpec};
use crate::infrastructure::traits::FileSystem;

/// Supported tree document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Toml,
}

impl TreeFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Service for obtaining validated trees.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
}

impl TreeService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// The built-in sample tree.
    pub fn sample(&self) -> ApplicationResult<Tree> {
        Ok(Tree::from_spec(&sample_tree())?)
    }

    /// Load `path` if given, otherwise fall back to the sample tree.
    pub fn resolve(&self, path: Option<&Path>) -> ApplicationResult<Tree> {
        match path {
            Some(path) => self.load(path),
            None => {
                debug!("no tree file given, using sample tree");
                self.sample()
            }
        }
    }

    /// Read, parse and validate a tree document.
    ///
    /// Duplicate or empty ids are rejected here, before any layout runs.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Tree> {
        let format = TreeFormat::from_path(path)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))?;

        if !self.fs.exists(path) {
            return Err(ApplicationError::NoInput {
                path: path.to_path_buf(),
                reason: "file not found",
            });
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::NoInput {
                path: path.to_path_buf(),
                reason: "not a file",
            });
        }

        let content = self.fs.read_to_string(path).with_path_context("read tree", path)?;
        let spec = Self::parse(&content, format, path)?;
        let tree = Tree::from_spec(&spec)?;
        debug!("loaded {} nodes from {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Parse a document without validating ids.
    pub fn parse(content: &str, format: TreeFormat, path: &Path) -> ApplicationResult<TreeSpec> {
        let parsed = match format {
            TreeFormat::Json => serde_json::from_str::<TreeSpec>(content).map_err(|e| e.to_string()),
            TreeFormat::Toml => toml::from_str::<TreeSpec>(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }
}
