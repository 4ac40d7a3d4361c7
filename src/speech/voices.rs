/*!
 * Voice selection for a target language.
 *
 * Bare ISO 639-1 codes expand to an ordered list of region-qualified
 * variants, and the catalog is scanned in variant order: every voice is
 * considered for the first variant before the second variant is tried.
 */

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::platform::Voice;

/// Region-qualified expansion for bare language codes, in preference order
static LANGUAGE_VARIANTS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("en", &["en-US", "en-GB", "en-AU", "en"]);
    map.insert("ja", &["ja-JP", "ja"]);
    map.insert("es", &["es-ES", "es-MX", "es"]);
    map.insert("fr", &["fr-FR", "fr-CA", "fr"]);
    map.insert("de", &["de-DE", "de"]);
    map.insert("zh", &["zh-CN", "zh-TW", "zh"]);
    map.insert("ko", &["ko-KR", "ko"]);
    map.insert("ar", &["ar-SA", "ar"]);
    map.insert("ru", &["ru-RU", "ru"]);
    map.insert("pt", &["pt-BR", "pt-PT", "pt"]);
    map
});

/// Expand a language code into its ordered variant list. Codes without a
/// mapping entry are used as-is.
pub fn expand_language_variants(language_code: &str) -> Vec<String> {
    let normalized = language_code.trim().to_lowercase();
    match LANGUAGE_VARIANTS.get(normalized.as_str()) {
        Some(variants) => variants.iter().map(|v| v.to_string()).collect(),
        None => vec![normalized],
    }
}

/// Select a voice for a target language.
///
/// Scans the catalog once per variant, in variant order, returning the first
/// voice whose language tag starts with the variant. Falls back to the first
/// English voice, then to the first voice in whatever order the platform
/// reported the catalog — a last resort, not a guarantee.
pub fn select_voice<'a>(voices: &'a [Voice], language_code: &str) -> Option<&'a Voice> {
    for variant in expand_language_variants(language_code) {
        if let Some(voice) = voices.iter().find(|v| tag_matches(&v.language, &variant)) {
            return Some(voice);
        }
    }

    voices.iter()
        .find(|v| tag_matches(&v.language, "en"))
        .or_else(|| voices.first())
}

fn tag_matches(voice_language: &str, variant: &str) -> bool {
    voice_language.to_lowercase().starts_with(&variant.to_lowercase())
}
