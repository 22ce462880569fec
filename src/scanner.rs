//! Project discovery and execution-graph construction.

use crate::config::{ModuleConfiguration, MODULE_CONFIG_FILE};
use crate::error::Result;
use crate::resources::{RESOURCE_FILE, SOURCE_VALUES_DIR};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory whose presence marks a module root.
const MODULE_MARKER_DIR: &str = "src";

/// One discovered source resource file and the settings that apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionGraphEntry {
    pub module_root: PathBuf,
    pub resource_file: PathBuf,
    pub config: Option<ModuleConfiguration>,
}

impl ExecutionGraphEntry {
    /// Module description, or empty when the module has no config file.
    pub fn module_description(&self) -> &str {
        self.config
            .as_ref()
            .map(|c| c.description.as_str())
            .unwrap_or_default()
    }
}

/// Ordered plan of resource files to translate, in discovery order.
pub type ExecutionGraph = Vec<ExecutionGraphEntry>;

/// Walk `project_root` and build the execution graph.
///
/// Fails on the first module config file that cannot be loaded; no partial
/// graph is returned.
pub fn scan(project_root: &Path) -> Result<ExecutionGraph> {
    let (resource_files, config_files) = discover(project_root);
    info!(
        "Found {} {} file(s) and {} {} file(s)",
        resource_files.len(),
        RESOURCE_FILE,
        config_files.len(),
        MODULE_CONFIG_FILE
    );

    build_execution_graph(project_root, &resource_files, &config_files)
}

/// Find source resource files and module config files, sorted by path.
fn discover(project_root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut resource_files = Vec::new();
    let mut config_files = Vec::new();

    let walker = WalkDir::new(project_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Cannot access path: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name();
        if file_name == RESOURCE_FILE && is_source_values_file(path) {
            resource_files.push(path.to_path_buf());
        } else if file_name == MODULE_CONFIG_FILE {
            config_files.push(path.to_path_buf());
        }
    }

    (resource_files, config_files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// True when the file sits directly in a directory named exactly `values`.
/// Qualified directories (`values-es`, `values-night`) are write targets.
fn is_source_values_file(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name == SOURCE_VALUES_DIR)
        .unwrap_or(false)
}

/// Nearest ancestor of `resource_file` that contains a `src` directory.
///
/// The search stops at `project_root`, which is returned when no ancestor
/// below it qualifies.
pub fn find_module_root(resource_file: &Path, project_root: &Path) -> PathBuf {
    let start = resource_file.parent().unwrap_or(resource_file);

    for dir in start.ancestors() {
        if dir.join(MODULE_MARKER_DIR).is_dir() {
            return dir.to_path_buf();
        }
        if dir == project_root {
            break;
        }
    }

    project_root.to_path_buf()
}

fn build_execution_graph(
    project_root: &Path,
    resource_files: &[PathBuf],
    config_files: &[PathBuf],
) -> Result<ExecutionGraph> {
    let mut graph = Vec::with_capacity(resource_files.len());

    for resource_file in resource_files {
        let module_root = find_module_root(resource_file, project_root);

        // One config file name per directory, so at most one can match
        let config = match config_files
            .iter()
            .find(|config| config.parent() == Some(module_root.as_path()))
        {
            Some(path) => Some(ModuleConfiguration::load(path)?),
            None => None,
        };

        debug!(
            "Module: {}, Configuration: {}, Path: {}",
            resource_file.display(),
            config
                .as_ref()
                .map(|c| c.source.display().to_string())
                .unwrap_or_else(|| "none".to_string()),
            module_root.display()
        );

        graph.push(ExecutionGraphEntry {
            module_root,
            resource_file: resource_file.clone(),
            config,
        });
    }

    Ok(graph)
}
