use crate::entry::TranslationResult;
use crate::error::{Result, TranslatorError};
use tracing::debug;

/// Extract the translated entries from a model's raw answer.
///
/// Models often wrap the array in prose or a markdown fence, so everything
/// between the first `[` and the last `]` is taken as the JSON payload. The
/// error message carries the raw answer for diagnosis.
pub fn parse_translations(raw: &str) -> Result<Vec<TranslationResult>> {
    debug!("Parsing provider response ({} bytes)", raw.len());

    let payload = json_array_slice(raw).ok_or_else(|| {
        TranslatorError::Parse(format!(
            "Failed to parse response: no JSON array found\nOriginal response: {}",
            raw
        ))
    })?;

    serde_json::from_str(payload).map_err(|e| {
        TranslatorError::Parse(format!(
            "Failed to parse response: {}\nOriginal response: {}",
            e, raw
        ))
    })
}

fn json_array_slice(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (start < end).then(|| &raw[start..=end])
}
