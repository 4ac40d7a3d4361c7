use anyhow::{Result, anyhow};
use isolang::Language;

/// Language catalog and utilities for ISO 639-1 language code handling
///
/// The supported-language catalog is the closed selection surface for
/// translation and speech: only codes listed here are accepted by the
/// orchestrator, and an unknown code fails loudly instead of defaulting.
/// A translation target language offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    /// ISO 639-1 code
    pub code: &'static str,
    /// English display name
    pub display_name: &'static str,
}

/// Fixed catalog of translation target languages
pub const SUPPORTED_LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "en", display_name: "English" },
    LanguageOption { code: "ja", display_name: "Japanese" },
    LanguageOption { code: "es", display_name: "Spanish" },
    LanguageOption { code: "fr", display_name: "French" },
    LanguageOption { code: "de", display_name: "German" },
    LanguageOption { code: "zh", display_name: "Simplified Chinese" },
    LanguageOption { code: "ko", display_name: "Korean" },
    LanguageOption { code: "ar", display_name: "Arabic" },
    LanguageOption { code: "ru", display_name: "Russian" },
    LanguageOption { code: "pt", display_name: "Portuguese" },
];

/// Default language used for summary speech and as the initial translation target
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Look up a catalog entry by its ISO 639-1 code
pub fn find_language(code: &str) -> Option<&'static LanguageOption> {
    let normalized = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES.iter().find(|lang| lang.code == normalized)
}

/// Get the display name for a supported language code
///
/// Fails for codes outside the catalog, even if they are valid ISO codes;
/// the selector surface is closed.
pub fn language_display_name(code: &str) -> Result<&'static str> {
    find_language(code)
        .map(|lang| lang.display_name)
        .ok_or_else(|| anyhow!("Unsupported language code: {}", code))
}

/// Validate that a string is a well-formed ISO 639-1 language code
pub fn is_valid_iso_code(code: &str) -> bool {
    let normalized = code.trim().to_lowercase();
    normalized.len() == 2 && Language::from_639_1(&normalized).is_some()
}

/// Get the ISO-registered English name for any valid ISO 639-1 code,
/// catalog or not (used for diagnostics only)
pub fn iso_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    Language::from_639_1(&normalized)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
