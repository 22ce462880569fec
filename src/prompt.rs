//! Translation prompt rendering.
//!
//! Templates use named placeholders in braces (`{target_lang_full}`); a
//! literal brace is written doubled (`{{`, `}}`). Available placeholders:
//!
//! - `{app_description}`
//! - `{module_description}`
//! - `{source_lang_full}` / `{target_lang_full}`: language display names
//! - `{words_json}`: the entries as a pretty-printed JSON array

use crate::entry::TranslatableEntry;
use crate::error::{Result, TranslatorError};
use crate::language::display_name;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"
You are an assistant that translates Android string resources from one language to another.
Translate the following list of UI strings from {source_lang_full} to {target_lang_full}.

Project description: {app_description}
Module (screen) description: {module_description}

Each string is a key-value pair. Return a JSON array where each item contains:
- "key": the original key
- "value": the translated text

Example response:
[
  {{ "key": "title_hello", "value": "Hola" }},
  ...
]

Here is the list to translate:
{words_json}
"#;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("valid placeholder regex"))
}

/// Values substituted into the template for one (module, language) request.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub app_description: &'a str,
    pub module_description: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub entries: &'a [TranslatableEntry],
}

/// Renders translation prompts from a user-supplied or built-in template.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn with_default_template() -> Self {
        Self::new(DEFAULT_PROMPT_TEMPLATE)
    }

    /// Use the template at `path` if the file exists, else the built-in one.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_file() {
            info!("Using prompt template {}", path.display());
            let template =
                std::fs::read_to_string(path).map_err(|e| TranslatorError::io(path, e))?;
            Ok(Self::new(template))
        } else {
            debug!(
                "Prompt template {} not found, using the built-in template",
                path.display()
            );
            Ok(Self::with_default_template())
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template for `context`, trimmed of surrounding whitespace.
    pub fn build(&self, context: &PromptContext<'_>) -> Result<String> {
        let words_json = serde_json::to_string_pretty(context.entries).map_err(|e| {
            TranslatorError::Configuration(format!("Failed to serialize word list: {}", e))
        })?;
        let source_lang_full = display_name(context.source_language);
        let target_lang_full = display_name(context.target_language);

        let lookup = |name: &str| match name {
            "app_description" => Some(context.app_description),
            "module_description" => Some(context.module_description),
            "source_lang_full" => Some(source_lang_full.as_str()),
            "target_lang_full" => Some(target_lang_full.as_str()),
            "words_json" => Some(words_json.as_str()),
            _ => None,
        };

        let rendered = render(&self.template, lookup)?;
        Ok(rendered.trim().to_string())
    }
}

fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_regex().captures_iter(template) {
        let whole = caps.get(0).map(|m| (m.start(), m.end(), m.as_str()));
        let Some((start, end, token)) = whole else {
            continue;
        };

        push_literal(&mut out, &template[last..start])?;
        match token {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            _ => {
                let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                let value = lookup(name).ok_or_else(|| {
                    TranslatorError::Configuration(format!(
                        "Prompt template references unknown placeholder '{{{}}}'",
                        name
                    ))
                })?;
                out.push_str(value);
            }
        }
        last = end;
    }

    push_literal(&mut out, &template[last..])?;
    Ok(out)
}

/// Copy literal template text, rejecting unpaired braces.
fn push_literal(out: &mut String, literal: &str) -> Result<()> {
    if literal.contains('{') || literal.contains('}') {
        return Err(TranslatorError::Configuration(format!(
            "Prompt template has an unmatched brace near '{}'; write literal braces as '{{{{' or '}}}}'",
            literal.trim()
        )));
    }
    out.push_str(literal);
    Ok(())
}
