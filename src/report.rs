//! Run summary: what was configured and how many lines each module got.

use crate::config::GlobalConfiguration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Settings echoed back in the report. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSummary {
    pub app_description: String,
    pub source_language: String,
    pub target_languages: Vec<String>,
    pub exclude_translated: bool,
    pub ai_provider: String,
    pub ai_folder: Option<String>,
    pub ai_model: Option<String>,
    pub excluded_keys: Vec<String>,
}

impl From<&GlobalConfiguration> for ConfigurationSummary {
    fn from(config: &GlobalConfiguration) -> Self {
        Self {
            app_description: config.app_description.clone(),
            source_language: config.source_language.clone(),
            target_languages: config.target_languages.clone(),
            exclude_translated: config.exclude_translated,
            ai_provider: config.ai_provider.as_str().to_string(),
            ai_folder: config.ai_folder.clone(),
            ai_model: config.ai_model.clone(),
            excluded_keys: config.exclude.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageReport {
    pub language: String,
    pub translated: usize,
}

/// Counts for one source resource file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleReport {
    pub module_root: PathBuf,
    pub resource_file: PathBuf,
    pub languages: Vec<LanguageReport>,
}

impl ModuleReport {
    pub fn new(module_root: PathBuf, resource_file: PathBuf) -> Self {
        Self {
            module_root,
            resource_file,
            languages: Vec::new(),
        }
    }

    pub fn record(&mut self, language: &str, translated: usize) {
        self.languages.push(LanguageReport {
            language: language.to_string(),
            translated,
        });
    }

    pub fn translated(&self) -> usize {
        self.languages.iter().map(|l| l.translated).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub configuration: ConfigurationSummary,
    pub modules: Vec<ModuleReport>,
    pub total_modules: usize,
    pub total_translated: usize,
}

impl RunReport {
    pub fn new(config: &GlobalConfiguration) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            configuration: ConfigurationSummary::from(config),
            modules: Vec::new(),
            total_modules: 0,
            total_translated: 0,
        }
    }

    pub fn push_module(&mut self, module: ModuleReport) {
        self.total_modules += 1;
        self.total_translated += module.translated();
        self.modules.push(module);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering for the terminal.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.configuration;

        writeln!(f, "===== TRANSLATION REPORT =====\n")?;
        writeln!(f, "Configuration Used:")?;
        writeln!(f, "- App Description     : {}", config.app_description)?;
        writeln!(f, "- Source Language     : {}", config.source_language)?;
        writeln!(
            f,
            "- Target Languages    : {}",
            config.target_languages.join(", ")
        )?;
        writeln!(f, "- Exclude Translated  : {}", config.exclude_translated)?;
        writeln!(f, "- AI Provider         : {}", config.ai_provider)?;
        writeln!(
            f,
            "- AI Folder           : {}",
            config.ai_folder.as_deref().unwrap_or("None")
        )?;
        writeln!(
            f,
            "- AI Model            : {}",
            config.ai_model.as_deref().unwrap_or("default")
        )?;
        if config.excluded_keys.is_empty() {
            writeln!(f, "- Excluded Keys       : None")?;
        } else {
            writeln!(f, "- Excluded Keys       : {}", config.excluded_keys.join(", "))?;
        }

        writeln!(f, "\nTotal Modules Processed: {}\n", self.total_modules)?;
        for module in &self.modules {
            writeln!(f, "Module: {}", module.resource_file.display())?;
            for language in &module.languages {
                writeln!(
                    f,
                    "  Language: {} -> {} lines translated",
                    language.language, language.translated
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Summary:")?;
        writeln!(f, "- Total translated lines: {}", self.total_translated)?;
        if let Some(finished) = self.finished_at {
            let elapsed = finished - self.started_at;
            writeln!(
                f,
                "- Duration: {:.1}s",
                elapsed.num_milliseconds() as f64 / 1000.0
            )?;
        }
        Ok(())
    }
}
