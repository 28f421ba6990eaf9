//! Service container for dependency injection
//!
//! Wires settings and the filesystem into services.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{TreeService, TreeVisualizer};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::CollapsedSet;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn tree_service(&self) -> TreeService {
        TreeService::new(Arc::clone(&self.fs))
    }

    /// Build a visualizer for `file`, falling back to the configured tree file,
    /// then to the sample tree.
    pub fn visualizer(
        &self,
        file: Option<&Path>,
        collapsed: CollapsedSet,
    ) -> ApplicationResult<TreeVisualizer> {
        let source = file.or(self.settings.tree_file.as_deref());
        debug!("tree source: {:?}", source);
        let tree = self.tree_service().resolve(source)?;
        Ok(TreeVisualizer::with_collapsed(
            tree,
            self.settings.layout,
            collapsed,
        ))
    }
}
