//! Drives extraction, prompting, translation and writing for every
//! (resource file, target language) pair of the execution graph.

use crate::config::GlobalConfiguration;
use crate::entry::{normalize_whitespace, TranslatableEntry, TranslationResult};
use crate::error::{Result, TranslatorError};
use crate::prompt::{PromptBuilder, PromptContext};
use crate::provider::TranslationProvider;
use crate::report::{ModuleReport, RunReport};
use crate::resources::{language_dir, read_string_resources, write_resources, RESOURCE_FILE};
use crate::response::parse_translations;
use crate::scanner::{ExecutionGraph, ExecutionGraphEntry};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Sequential translation run over an execution graph.
///
/// Pairs are processed strictly one after another; the first fatal error
/// (authentication, response parsing, validation, I/O) aborts the run and
/// leaves files written so far in place.
pub struct TranslationPipeline<'a, P> {
    provider: &'a P,
    config: &'a GlobalConfiguration,
    prompt_builder: &'a PromptBuilder,
}

impl<'a, P: TranslationProvider> TranslationPipeline<'a, P> {
    pub fn new(
        provider: &'a P,
        config: &'a GlobalConfiguration,
        prompt_builder: &'a PromptBuilder,
    ) -> Self {
        Self {
            provider,
            config,
            prompt_builder,
        }
    }

    pub async fn run(&self, graph: &ExecutionGraph) -> Result<RunReport> {
        let mut report = RunReport::new(self.config);
        info!(
            "Translating {} resource file(s) into {} language(s)",
            graph.len(),
            self.config.target_languages.len()
        );

        for entry in graph {
            let module = self.translate_module(entry).await?;
            report.push_module(module);
        }

        report.finish();
        info!(
            "Translation finished: {} line(s) across {} module(s)",
            report.total_translated, report.total_modules
        );
        Ok(report)
    }

    async fn translate_module(&self, entry: &ExecutionGraphEntry) -> Result<ModuleReport> {
        info!("Processing {}", entry.resource_file.display());

        let exclude = self.effective_exclude(entry);
        let entries = extract_entries(&entry.resource_file, &exclude);
        let mut module = ModuleReport::new(entry.module_root.clone(), entry.resource_file.clone());

        for language in &self.config.target_languages {
            let translated = self.translate_language(entry, &entries, language).await?;
            module.record(language, translated);
        }

        Ok(module)
    }

    /// Translate one (file, language) pair and return the number of newly
    /// translated lines.
    async fn translate_language(
        &self,
        entry: &ExecutionGraphEntry,
        entries: &[TranslatableEntry],
        language: &str,
    ) -> Result<usize> {
        let target_dir = language_dir(&entry.resource_file, language);

        let carried = if self.effective_exclude_translated(entry) {
            existing_translations(&target_dir.join(RESOURCE_FILE), entries)
        } else {
            Vec::new()
        };
        let carried_keys: HashSet<&str> = carried.iter().map(|r| r.key.as_str()).collect();
        let pending: Vec<TranslatableEntry> = entries
            .iter()
            .filter(|e| !carried_keys.contains(e.key.as_str()))
            .cloned()
            .collect();

        let translated = if pending.is_empty() {
            debug!(
                "Nothing to translate for {} [{}]",
                entry.resource_file.display(),
                language
            );
            Vec::new()
        } else {
            self.request_translation(entry, &pending, language).await?
        };
        let count = translated.len();

        let mut output = carried;
        output.extend(translated);
        let path = write_resources(&target_dir, &output)?;

        info!(
            "[{}] {} new, {} kept -> {}",
            language,
            count,
            output.len() - count,
            path.display()
        );
        Ok(count)
    }

    async fn request_translation(
        &self,
        entry: &ExecutionGraphEntry,
        pending: &[TranslatableEntry],
        language: &str,
    ) -> Result<Vec<TranslationResult>> {
        let prompt = self.prompt_builder.build(&PromptContext {
            app_description: &self.config.app_description,
            module_description: entry.module_description(),
            source_language: &self.config.source_language,
            target_language: language,
            entries: pending,
        })?;

        debug!(
            "Requesting {} string(s) in '{}' ({} byte prompt)",
            pending.len(),
            language,
            prompt.len()
        );
        let raw = self.provider.translate(&prompt).await?;
        let results = parse_translations(&raw)?;
        validate_results(&results, &entry.resource_file, language)?;
        Ok(results)
    }

    /// Global exclusions plus the module's own.
    fn effective_exclude(&self, entry: &ExecutionGraphEntry) -> BTreeSet<String> {
        let mut exclude = self.config.exclude.clone();
        if let Some(module) = &entry.config {
            exclude.extend(module.exclude.iter().cloned());
        }
        exclude
    }

    fn effective_exclude_translated(&self, entry: &ExecutionGraphEntry) -> bool {
        entry
            .config
            .as_ref()
            .map(|c| c.exclude_translated)
            .unwrap_or(self.config.exclude_translated)
    }
}

/// Read the translatable entries of a source resource file.
///
/// Unreadable or malformed files are logged and yield no entries so the run
/// can continue with the other modules.
pub fn extract_entries(path: &Path, exclude: &BTreeSet<String>) -> Vec<TranslatableEntry> {
    let resources = match read_string_resources(path) {
        Ok(resources) => resources,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let entries: Vec<TranslatableEntry> = resources
        .into_iter()
        .filter(|r| r.translatable && !r.name.is_empty() && !exclude.contains(&r.name))
        .filter_map(|r| {
            let value = normalize_whitespace(&r.value);
            (!value.is_empty()).then(|| TranslatableEntry::new(r.name, value))
        })
        .filter(|e| {
            let first = seen.insert(e.key.clone());
            if !first {
                warn!("Duplicate key '{}' in {}, keeping the first", e.key, path.display());
            }
            first
        })
        .collect();

    info!("Collected {} string(s) from {}", entries.len(), path.display());
    entries
}

/// Existing translations worth keeping: non-empty values for keys the source
/// still defines, in the order they appear in the existing file.
fn existing_translations(path: &Path, source: &[TranslatableEntry]) -> Vec<TranslationResult> {
    if !path.is_file() {
        return Vec::new();
    }

    let wanted: HashSet<&str> = source.iter().map(|e| e.key.as_str()).collect();
    match read_string_resources(path) {
        Ok(existing) => {
            let mut kept = HashSet::new();
            existing
                .into_iter()
                .filter(|r| !r.value.is_empty() && wanted.contains(r.name.as_str()))
                .filter(|r| kept.insert(r.name.clone()))
                .map(|r| TranslationResult::new(r.name, r.value))
                .collect()
        }
        Err(e) => {
            warn!("Ignoring existing translations in {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Every result must carry a key and a value before anything is written.
fn validate_results(results: &[TranslationResult], source: &Path, language: &str) -> Result<()> {
    let incomplete: Vec<String> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_complete())
        .map(|(i, r)| {
            if r.key.is_empty() {
                format!("#{} (missing key)", i)
            } else {
                format!("'{}' (missing value)", r.key)
            }
        })
        .collect();

    if incomplete.is_empty() {
        return Ok(());
    }

    Err(TranslatorError::Validation(format!(
        "{} incomplete translation(s) for {} [{}]: {}",
        incomplete.len(),
        source.display(),
        language,
        incomplete.join(", ")
    )))
}
