//! Turning stored settings into a run
//!
//! `ProjectContext` pairs a project directory with its loaded settings and
//! produces the layer sources and `PostProcessConfig` the stages consume.

use std::path::{Path, PathBuf};

use pcbpost_core::{BoardLayer, LayerSource, PostProcessConfig};
use tracing::info;

use crate::config::ToolSettings;
use crate::error::SettingsResult;
use crate::project::ProjectSettings;

/// Input file name for a layer, as stored in the project
fn project_input(project: &ProjectSettings, layer: BoardLayer) -> &str {
    match layer {
        BoardLayer::FrontCopper => &project.front_copper,
        BoardLayer::BackCopper => &project.back_copper,
        BoardLayer::FrontEngraving => &project.front_engraving,
        BoardLayer::BackEngraving => &project.back_engraving,
        BoardLayer::Outline => &project.outline,
        BoardLayer::Drilling => &project.drilling,
    }
}

/// Every layer's input and converter settings, in conversion order
pub fn layer_sources(tool: &ToolSettings, project: &ProjectSettings) -> Vec<LayerSource> {
    BoardLayer::ALL
        .iter()
        .map(|&layer| {
            LayerSource::new(
                layer,
                tool.layer_settings(layer).cloned(),
                project_input(project, layer),
            )
        })
        .collect()
}

/// Output directory of a project
pub fn resolve_output_dir(tool: &ToolSettings, project_dir: &Path) -> PathBuf {
    project_dir.join(tool.output_folder())
}

/// Build the post-processing config for a project
pub fn resolve_post_process_config(
    tool: &ToolSettings,
    project: &ProjectSettings,
    project_dir: &Path,
) -> PostProcessConfig {
    PostProcessConfig::new(resolve_output_dir(tool, project_dir))
        .with_remove_tool_changes(project.remove_tool_changes())
        .with_combine(tool.combine_outputs)
        .with_allow_missing_footer(tool.allow_missing_footer)
}

/// A project directory with its settings loaded
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_dir: PathBuf,
    tool: ToolSettings,
    project: ProjectSettings,
}

impl ProjectContext {
    /// Load the project's settings from its directory
    pub fn load(project_dir: impl Into<PathBuf>, tool: ToolSettings) -> Self {
        let project_dir = project_dir.into();
        let project = ProjectSettings::load(&project_dir);
        info!("Loaded project settings for {}", project_dir.display());
        Self {
            project_dir,
            tool,
            project,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    pub fn project(&self) -> &ProjectSettings {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut ProjectSettings {
        &mut self.project
    }

    pub fn output_dir(&self) -> PathBuf {
        resolve_output_dir(&self.tool, &self.project_dir)
    }

    pub fn layer_sources(&self) -> Vec<LayerSource> {
        layer_sources(&self.tool, &self.project)
    }

    pub fn post_process_config(&self) -> PostProcessConfig {
        resolve_post_process_config(&self.tool, &self.project, &self.project_dir)
    }

    /// Write the project settings back
    ///
    /// Returns `false` if the project directory no longer exists.
    pub fn save(&self) -> SettingsResult<bool> {
        self.project.save(&self.project_dir)
    }
}
