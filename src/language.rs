//! Language registry: maps language codes to English display names.
//!
//! Prompts name languages in full ("Spanish", not "es") because models follow
//! the instruction more reliably. Lookup is a pure function over a static
//! table; unknown codes resolve to the code itself.

use std::collections::HashMap;
use std::sync::OnceLock;

/// A known language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    /// ISO 639-1 code (e.g., "es")
    pub code: &'static str,

    /// English name (e.g., "Spanish")
    pub name: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    by_code: HashMap<&'static str, LanguageInfo>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            by_code: LANGUAGES
                .iter()
                .map(|&(code, name)| (code, LanguageInfo { code, name }))
                .collect(),
        })
    }

    /// Look up a bare ISO 639-1 code, case-insensitively.
    ///
    /// Qualified codes (`pt-rBR`, `zh-TW`) are not resolved here; see
    /// [`display_name`].
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageInfo> {
        self.by_code.get(code.trim().to_ascii_lowercase().as_str())
    }
}

/// Resolve a language code to its display name, falling back to the raw code.
///
/// Qualifiers are kept so that variants stay distinct: `zh-rTW` gives
/// "Chinese (Taiwan)", `b+sr+Latn` gives "Serbian (Latin)". A qualifier
/// missing from the tables is shown as written, without the Android `r`.
pub fn display_name(code: &str) -> String {
    let code = code.trim();
    let (tag, separators): (&str, &[char]) = match code.strip_prefix("b+") {
        Some(rest) => (rest, &['+']),
        None => (code, &['-', '_']),
    };

    let mut subtags = tag.split(separators);
    let primary = subtags.next().unwrap_or_default();
    let Some(language) = LanguageRegistry::get().get_by_code(primary) else {
        return code.to_string();
    };

    let qualifiers: Vec<String> = subtags
        .filter(|s| !s.is_empty())
        .map(qualifier_name)
        .collect();
    if qualifiers.is_empty() {
        language.name.to_string()
    } else {
        format!("{} ({})", language.name, qualifiers.join(", "))
    }
}

fn qualifier_name(subtag: &str) -> String {
    // Android resource directories spell regions as `rXX`
    let region = match subtag.strip_prefix('r') {
        Some(region) if region.len() == 2 => region,
        _ => subtag,
    };

    lookup(REGIONS, region)
        .or_else(|| lookup(SCRIPTS, subtag))
        .map(str::to_string)
        .unwrap_or_else(|| region.to_string())
}

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|&(_, name)| name)
}

const SCRIPTS: &[(&str, &str)] = &[
    ("Arab", "Arabic"),
    ("Cyrl", "Cyrillic"),
    ("Hans", "Simplified"),
    ("Hant", "Traditional"),
    ("Latn", "Latin"),
];

const REGIONS: &[(&str, &str)] = &[
    ("AR", "Argentina"),
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CN", "China"),
    ("CO", "Colombia"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("HK", "Hong Kong"),
    ("IE", "Ireland"),
    ("IN", "India"),
    ("MO", "Macao"),
    ("MX", "Mexico"),
    ("NZ", "New Zealand"),
    ("PT", "Portugal"),
    ("SG", "Singapore"),
    ("TW", "Taiwan"),
    ("US", "United States"),
    ("419", "Latin America"),
];

const LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("as", "Assamese"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Modern Greek (1453-)"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("in", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iw", "Hebrew"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Central Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("ky", "Kirghiz"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay (macrolanguage)"),
    ("my", "Burmese"),
    ("nb", "Norwegian Bokmål"),
    ("ne", "Nepali (macrolanguage)"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("or", "Oriya (macrolanguage)"),
    ("pa", "Panjabi"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili (macrolanguage)"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tk", "Turkmen"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("tt", "Tatar"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
    ("zu", "Zulu"),
];
