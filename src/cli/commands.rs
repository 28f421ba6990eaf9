use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::TreeVisualizer;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, TreeArgs};
use crate::cli::output;
use crate::cli::session::run_session;
use crate::cli::{CliError, CliResult};
use crate::config::{config_template, global_config_path, local_config_path, Settings};
use crate::domain::{CollapsedSet, Layout};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    debug!("project_dir: {:?}", project_dir);

    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => execute_config(command, project_dir.as_deref()),
        Commands::Layout { tree, format } => {
            let container = container(project_dir.as_deref())?;
            _layout(&container, tree, *format)
        }
        Commands::Outline { tree } => {
            let container = container(project_dir.as_deref())?;
            _outline(&container, tree)
        }
        Commands::Session { file } => {
            let container = container(project_dir.as_deref())?;
            _session(&container, file.as_deref())
        }
    }
}

fn container(project_dir: Option<&Path>) -> CliResult<ServiceContainer> {
    let settings = Settings::load(project_dir)?;
    Ok(ServiceContainer::new(settings))
}

/// Load the tree and apply the requested initial collapse state.
fn build_visualizer(container: &ServiceContainer, args: &TreeArgs) -> CliResult<TreeVisualizer> {
    let collapsed: CollapsedSet = args.collapse.iter().cloned().collect();
    let mut visualizer = container.visualizer(args.file.as_deref(), collapsed)?;

    for id in &args.collapse {
        if !visualizer.tree().contains(id) {
            output::warning(&format!("unknown node id: {}", id));
        }
    }
    if args.collapse_all {
        visualizer.collapse_all();
    }
    Ok(visualizer)
}

fn to_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ApplicationError::OperationFailed {
            context: "serialize layout".to_string(),
            source: Box::new(e),
        }
        .into()
    })
}

#[instrument(skip(container))]
fn _layout(container: &ServiceContainer, args: &TreeArgs, format: OutputFormat) -> CliResult<()> {
    let visualizer = build_visualizer(container, args)?;
    let text = match format {
        OutputFormat::Json => to_json(&visualizer.document(&container.settings.style))?,
        OutputFormat::Layout => to_json(visualizer.layout())?,
        OutputFormat::Table => layout_table(visualizer.layout()),
    };
    output::info(text.trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn _outline(container: &ServiceContainer, args: &TreeArgs) -> CliResult<()> {
    let visualizer = build_visualizer(container, args)?;
    output::info(visualizer.outline().to_string().trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn _session(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let mut visualizer = container.visualizer(file, CollapsedSet::new())?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut visualizer, stdin.lock(), &mut stdout.lock())
        .map_err(|e| InfraError::io("session", e))?;
    Ok(())
}

fn execute_config(command: &ConfigCommands, project_dir: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(project_dir)?;
            output::info(settings.to_toml()?.trim_end());
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::detail(&describe_path("global", &path)),
                None => output::detail("global: (no config directory on this platform)"),
            }
            if let Some(dir) = project_dir {
                output::detail(&describe_path("local", &local_config_path(dir)));
            }
            output::detail("env: TREEFLOW_* (e.g. TREEFLOW_LAYOUT__HORIZONTAL_SPACING)");
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".to_string())
                })?
            } else {
                let dir = project_dir.ok_or_else(|| {
                    CliError::InvalidArgs("cannot determine project directory".to_string())
                })?;
                local_config_path(dir)
            };
            write_template(&RealFileSystem, &path)?;
            output::action("Created", &path.display());
            Ok(())
        }
    }
}

fn describe_path(scope: &str, path: &Path) -> String {
    let state = if path.exists() { "" } else { " (not found)" };
    format!("{}: {}{}", scope, path.display(), state)
}

/// Write the config template, refusing to overwrite an existing file.
pub fn write_template(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
    fs.write(path, config_template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

/// Aligned text table of a layout, one row per visible node.
pub fn layout_table(layout: &Layout) -> String {
    let id_width = layout
        .nodes
        .iter()
        .map(|n| n.id.len())
        .chain(std::iter::once(2))
        .max()
        .unwrap_or(2);

    let header = format!(
        "{:<id_width$}  {:>8}  {:>8}  {:>5}  {:>4}  {:<9}  LABEL",
        "ID", "X", "Y", "DEPTH", "SPAN", "STATE"
    );
    let rows = layout.nodes.iter().map(|n| {
        let state = match (n.has_children, n.collapsed) {
            (false, _) => "leaf",
            (true, true) => "collapsed",
            (true, false) => "expanded",
        };
        format!(
            "{:<id_width$}  {:>8.1}  {:>8.1}  {:>5}  {:>4}  {:<9}  {}",
            n.id, n.position.x, n.position.y, n.depth, n.span, state, n.label
        )
    });

    std::iter::once(header).chain(rows).join("\n") + "\n"
}
