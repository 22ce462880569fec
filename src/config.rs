use crate::error::{Result, TranslatorError};
use crate::provider::ProviderKind;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Project-level configuration file, looked up in the project root.
pub const GLOBAL_CONFIG_FILE: &str = "default-translator-config.yml";

/// Per-module configuration file, looked up anywhere in the project tree.
pub const MODULE_CONFIG_FILE: &str = "translator-config.yml";

/// Optional prompt template, looked up in the project root.
pub const PROMPT_TEMPLATE_FILE: &str = "default-translator-prompt.txt";

/// Environment variable consulted when `aiKey` is empty in the config file.
pub const AI_KEY_ENV: &str = "TRANSLATOR_AI_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Default, Deserialize)]
struct RawDocument<S> {
    config: Option<S>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawGlobalSection {
    app_description: Option<String>,
    source_language: Option<String>,
    target_languages: Option<Vec<String>>,
    exclude_translated: Option<bool>,
    ai_provider: Option<String>,
    ai_key: Option<String>,
    ai_folder: Option<String>,
    ai_model: Option<String>,
    ai_endpoint: Option<String>,
    ai_timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawModuleSection {
    module_description: Option<String>,
    exclude_translated: Option<bool>,
}

/// Run-wide settings, loaded once and shared read-only by every stage.
#[derive(Debug, Clone)]
pub struct GlobalConfiguration {
    pub app_description: String,
    pub source_language: String,
    /// Target language codes in configured order, without duplicates.
    pub target_languages: Vec<String>,
    pub exclude_translated: bool,
    pub ai_provider: ProviderKind,
    pub ai_key: String,
    /// Secondary credential (Yandex folder id). `None` when empty.
    pub ai_folder: Option<String>,
    /// Model override. `None` selects the provider default.
    pub ai_model: Option<String>,
    /// Base URL override for the provider API.
    pub ai_endpoint: Option<String>,
    pub ai_timeout: Duration,
    /// Keys excluded from translation in every module.
    pub exclude: BTreeSet<String>,
}

impl GlobalConfiguration {
    /// Load and validate `default-translator-config.yml` from the project root.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(GLOBAL_CONFIG_FILE);
        if !path.is_file() {
            return Err(TranslatorError::Configuration(format!(
                "Configuration file '{}' not found in project root {}",
                GLOBAL_CONFIG_FILE,
                project_dir.display()
            )));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| TranslatorError::io(&path, e))?;
        let env_key = std::env::var(AI_KEY_ENV).ok();
        let config = Self::parse(&content, &path, env_key)?;

        debug!(
            "Loaded configuration from {}: provider={}, source={}, targets={:?}",
            path.display(),
            config.ai_provider,
            config.source_language,
            config.target_languages
        );

        Ok(config)
    }

    /// Parse and validate a configuration document.
    ///
    /// `fallback_key` is used when the document leaves `aiKey` empty.
    pub fn parse(content: &str, source: &Path, fallback_key: Option<String>) -> Result<Self> {
        let raw: RawDocument<RawGlobalSection> = parse_yaml(content, source)?;
        let section = raw.config.ok_or_else(|| {
            TranslatorError::Configuration(format!(
                "Missing 'config' section in {}",
                source.display()
            ))
        })?;

        let ai_provider = non_empty(section.ai_provider);
        let ai_key = non_empty(section.ai_key).or_else(|| non_empty(fallback_key));
        let (ai_provider, ai_key) = match (ai_provider, ai_key) {
            (Some(provider), Some(key)) => (provider, key),
            _ => {
                return Err(TranslatorError::Configuration(
                    "Missing required AI settings (aiProvider, aiKey) in configuration file"
                        .to_string(),
                ))
            }
        };

        let source_language = non_empty(section.source_language);
        let target_languages = dedup_languages(section.target_languages.unwrap_or_default());
        let source_language = match source_language {
            Some(language) if !target_languages.is_empty() => language,
            _ => {
                return Err(TranslatorError::Configuration(
                    "Missing required settings (sourceLanguage, targetLanguages) in configuration file"
                        .to_string(),
                ))
            }
        };

        let ai_provider: ProviderKind = ai_provider.parse()?;

        let timeout_secs = section.ai_timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(TranslatorError::Configuration(
                "aiTimeoutSeconds must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            app_description: section.app_description.unwrap_or_default(),
            source_language,
            target_languages,
            exclude_translated: section.exclude_translated.unwrap_or(false),
            ai_provider,
            ai_key,
            ai_folder: non_empty(section.ai_folder),
            ai_model: non_empty(section.ai_model),
            ai_endpoint: non_empty(section.ai_endpoint),
            ai_timeout: Duration::from_secs(timeout_secs),
            exclude: collect_keys(raw.exclude),
        })
    }
}

/// Settings from a module-local `translator-config.yml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfiguration {
    pub description: String,
    pub exclude: BTreeSet<String>,
    pub exclude_translated: bool,
    /// File the settings were read from.
    pub source: PathBuf,
}

impl ModuleConfiguration {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TranslatorError::io(path, e))?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, source: &Path) -> Result<Self> {
        let raw: RawDocument<RawModuleSection> = parse_yaml(content, source)?;
        let section = raw.config.unwrap_or_default();

        let description = non_empty(section.module_description).ok_or_else(|| {
            TranslatorError::Configuration(format!(
                "Missing module description in {}",
                source.display()
            ))
        })?;

        Ok(Self {
            description,
            exclude: collect_keys(raw.exclude),
            exclude_translated: section.exclude_translated.unwrap_or(false),
            source: source.to_path_buf(),
        })
    }
}

fn parse_yaml<T>(content: &str, source: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    // An empty file deserializes to null, which serde_yaml refuses for a struct.
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml::from_str(content).map_err(|e| {
        TranslatorError::Parse(format!("Error parsing YAML file {}: {}", source.display(), e))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn dedup_languages(languages: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    languages
        .into_iter()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

fn collect_keys(keys: Option<Vec<String>>) -> BTreeSet<String> {
    keys.unwrap_or_default()
        .into_iter()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}
