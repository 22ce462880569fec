//! Android `strings.xml` reading and writing.
//!
//! Values go through two layers of escaping: XML markup escaping (`&`, `<`,
//! `>`) and Android's own backslash escaping of quotes (`\'`, `\"`). Reading
//! undoes both; writing applies both, so a write followed by a read returns
//! the original values.

use crate::entry::TranslationResult;
use crate::error::{Result, TranslatorError};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of a string resource file.
pub const RESOURCE_FILE: &str = "strings.xml";

/// Directory holding the default (source language) resources.
pub const SOURCE_VALUES_DIR: &str = "values";

const ROOT_ELEMENT: &str = "resources";
const STRING_ELEMENT: &str = "string";
const GENERATED_COMMENT: &str = " Generated by Translator AI ";

/// A `<string>` element read from a resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    /// Text content with XML and Android escapes decoded, whitespace untouched.
    pub value: String,
    /// False when marked `translatable="false"`.
    pub translatable: bool,
}

/// Read every `<string>` child of the root element of `path`.
pub fn read_string_resources(path: &Path) -> Result<Vec<StringResource>> {
    let xml = std::fs::read_to_string(path).map_err(|e| TranslatorError::io(path, e))?;
    parse_string_resources(&xml).map_err(|e| match e {
        TranslatorError::Parse(message) => {
            TranslatorError::Parse(format!("XML parse error in {}: {}", path.display(), message))
        }
        other => other,
    })
}

/// Parse resource XML.
///
/// Nested markup inside a `<string>` (e.g. `<b>`) contributes its text only.
pub fn parse_string_resources(xml: &str) -> Result<Vec<StringResource>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    // (name, translatable, accumulated text) of the <string> being read
    let mut current: Option<(String, bool, String)> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| TranslatorError::Parse(format!("{} at position {}", e, position)))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    seen_root = true;
                } else if depth == 2 && e.name().as_ref() == STRING_ELEMENT.as_bytes() {
                    let (name, translatable) = string_attributes(&e)?;
                    current = Some((name, translatable, String::new()));
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    seen_root = true;
                } else if depth == 1 && e.name().as_ref() == STRING_ELEMENT.as_bytes() {
                    let (name, translatable) = string_attributes(&e)?;
                    out.push(StringResource {
                        name,
                        value: String::new(),
                        translatable,
                    });
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((name, translatable, text)) = current.take() {
                        out.push(StringResource {
                            name,
                            value: unescape_android(&text),
                            translatable,
                        });
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => {
                if let Some((_, _, text)) = current.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| TranslatorError::Parse(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some((_, _, text)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(TranslatorError::Parse("no root element found".to_string()));
    }
    if depth != 0 {
        return Err(TranslatorError::Parse(
            "unexpected end of document: unclosed element".to_string(),
        ));
    }

    Ok(out)
}

fn string_attributes(element: &BytesStart<'_>) -> Result<(String, bool)> {
    let attribute = |key: &str| -> Result<Option<String>> {
        let attr = element
            .try_get_attribute(key)
            .map_err(|e| TranslatorError::Parse(e.to_string()))?;
        attr.map(|a| {
            a.unescape_value()
                .map(|v| v.into_owned())
                .map_err(|e| TranslatorError::Parse(e.to_string()))
        })
        .transpose()
    };

    let name = attribute("name")?.unwrap_or_default();
    let translatable = attribute("translatable")?
        .map(|v| !v.trim().eq_ignore_ascii_case("false"))
        .unwrap_or(true);

    Ok((name, translatable))
}

/// Escape a value for the text content of a `<string>` element.
///
/// `&`, `<` and `>` become markup entities; `'` and `"` get a backslash.
pub fn escape_android_string(value: &str) -> String {
    partial_escape(value)
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}

/// Undo the backslash quote escapes of [`escape_android_string`].
pub fn unescape_android(value: &str) -> String {
    value.replace("\\'", "'").replace("\\\"", "\"")
}

/// Path of the resource file for `language`, next to the source `values` directory.
///
/// `res/values/strings.xml` with `es` gives `res/values-es/strings.xml`.
pub fn language_dir(source_file: &Path, language: &str) -> PathBuf {
    let res_dir = source_file
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    res_dir.join(format!("{}-{}", SOURCE_VALUES_DIR, language))
}

/// Serialize `entries` as a complete, pretty-printed resource document.
pub fn render_resources(entries: &[TranslationResult]) -> std::io::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
    writer.write_event(Event::Comment(BytesText::from_escaped(GENERATED_COMMENT)))?;

    for entry in entries {
        let element =
            BytesStart::new(STRING_ELEMENT).with_attributes([("name", entry.key.as_str())]);
        writer.write_event(Event::Start(element))?;
        writer.write_event(Event::Text(BytesText::from_escaped(escape_android_string(
            &entry.value,
        ))))?;
        writer.write_event(Event::End(BytesEnd::new(STRING_ELEMENT)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write `entries` to `target_dir/strings.xml`, replacing any existing file.
pub fn write_resources(target_dir: &Path, entries: &[TranslationResult]) -> Result<PathBuf> {
    std::fs::create_dir_all(target_dir).map_err(|e| TranslatorError::io(target_dir, e))?;

    let path = target_dir.join(RESOURCE_FILE);
    let bytes = render_resources(entries).map_err(|e| TranslatorError::io(&path, e))?;
    std::fs::write(&path, bytes).map_err(|e| TranslatorError::io(&path, e))?;

    debug!("Wrote {} translated strings to {}", entries.len(), path.display());
    Ok(path)
}
