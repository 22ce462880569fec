//! Translate the `values/strings.xml` resources of an Android project into
//! every configured target language with an AI provider.

pub mod config;
pub mod entry;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod resources;
pub mod response;
pub mod retry;
pub mod scanner;

use crate::config::{GlobalConfiguration, PROMPT_TEMPLATE_FILE};
use crate::error::Result;
use crate::pipeline::TranslationPipeline;
use crate::prompt::PromptBuilder;
use crate::provider::{Provider, TranslationProvider};
use crate::report::RunReport;
use std::path::Path;
use tracing::info;

/// Translate a whole project rooted at `project_dir`.
///
/// Configuration and credentials are checked before the tree is scanned, so
/// misconfiguration fails without touching any resource file.
pub async fn translate_project(project_dir: &Path) -> Result<RunReport> {
    let config = GlobalConfiguration::load(project_dir)?;
    let provider = Provider::from_config(&config)?;

    info!("Validating {} credentials", provider.kind());
    provider.validate_credentials().await?;

    let prompt_builder = PromptBuilder::load(&project_dir.join(PROMPT_TEMPLATE_FILE))?;
    let graph = scanner::scan(project_dir)?;

    TranslationPipeline::new(&provider, &config, &prompt_builder)
        .run(&graph)
        .await
}
