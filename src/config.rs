//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeflow/treeflow.toml`
//! 3. Local config: `<project_dir>/.treeflow.toml`
//! 4. Environment variables: `TREEFLOW_*` prefix, `__` between sections
//!    (e.g. `TREEFLOW_LAYOUT__HORIZONTAL_SPACING=150`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{LayoutConfig, RenderStyle};

/// Raw layout section for intermediate parsing (None = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayout {
    pub horizontal_spacing: Option<f64>,
    pub vertical_spacing: Option<f64>,
}

/// Raw style section for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStyle {
    pub node_kind: Option<String>,
    pub edge_kind: Option<String>,
    pub accent: Option<String>,
    pub stroke_width: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tree_file: Option<PathBuf>,
    pub layout: RawLayout,
    pub style: RawStyle,
}

/// Unified configuration for treeflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Tree document used when no file is given on the command line
    pub tree_file: Option<PathBuf>,
    /// Column and level spacing
    pub layout: LayoutConfig,
    /// Render document styling
    pub style: RenderStyle,
}

/// Get the XDG config directory for treeflow.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeflow").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeflow.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".treeflow.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input alone if expansion fails.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            tree_file: overlay.tree_file.clone().or_else(|| self.tree_file.clone()),
            layout: LayoutConfig {
                horizontal_spacing: overlay
                    .layout
                    .horizontal_spacing
                    .unwrap_or(self.layout.horizontal_spacing),
                vertical_spacing: overlay
                    .layout
                    .vertical_spacing
                    .unwrap_or(self.layout.vertical_spacing),
            },
            style: RenderStyle {
                node_kind: overlay
                    .style
                    .node_kind
                    .clone()
                    .unwrap_or_else(|| self.style.node_kind.clone()),
                edge_kind: overlay
                    .style
                    .edge_kind
                    .clone()
                    .unwrap_or_else(|| self.style.edge_kind.clone()),
                accent: overlay
                    .style
                    .accent
                    .clone()
                    .unwrap_or_else(|| self.style.accent.clone()),
                stroke_width: overlay.style.stroke_width.unwrap_or(self.style.stroke_width),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.treeflow.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), project_dir)
    }

    /// Like [`Settings::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply TREEFLOW_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, None)
    }

    /// `vars` replaces the process environment when given.
    fn apply_env_source(
        mut settings: Self,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let env = Environment::with_prefix("TREEFLOW")
            .prefix_separator("_")
            .separator("__")
            .source(vars);
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("tree_file") {
            settings.tree_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_float("layout.horizontal_spacing") {
            settings.layout.horizontal_spacing = val;
        }
        if let Ok(val) = config.get_float("layout.vertical_spacing") {
            settings.layout.vertical_spacing = val;
        }
        if let Ok(val) = config.get_string("style.node_kind") {
            settings.style.node_kind = val;
        }
        if let Ok(val) = config.get_string("style.edge_kind") {
            settings.style.edge_kind = val;
        }
        if let Ok(val) = config.get_string("style.accent") {
            settings.style.accent = val;
        }
        if let Ok(val) = config.get_float("style.stroke_width") {
            settings.style.stroke_width = val;
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(tree_file) = &self.tree_file {
            let expanded = expand_env_vars(tree_file.to_string_lossy().as_ref());
            self.tree_file = Some(PathBuf::from(expanded));
        }
    }

    /// Spacings must be positive and finite; stroke width non-negative.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let spacings = [
            ("layout.horizontal_spacing", self.layout.horizontal_spacing),
            ("layout.vertical_spacing", self.layout.vertical_spacing),
        ];
        for (key, value) in spacings {
            if !value.is_finite() || value <= 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("{} must be a positive number, got {}", key, value),
                });
            }
        }
        if !self.style.stroke_width.is_finite() || self.style.stroke_width < 0.0 {
            return Err(ApplicationError::Config {
                message: format!(
                    "style.stroke_width must not be negative, got {}",
                    self.style.stroke_width
                ),
            });
        }
        Ok(())
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

/// Commented template written by `config init`.
pub fn config_template() -> &'static str {
    r##"# treeflow configuration

# Tree document (JSON or TOML) used when no file is given
# tree_file = "~/trees/org.json"

[layout]
# Distance between sibling leaf columns
horizontal_spacing = 200.0
# Distance between depth levels
vertical_spacing = 120.0

[style]
node_kind = "treeNode"
edge_kind = "smoothstep"
accent = "#60a5fa"
stroke_width = 2.0
"##
}
