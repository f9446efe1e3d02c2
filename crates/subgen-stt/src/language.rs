//! Language selector resolution.
//!
//! The interactive surface offers human-readable language names; whisper
//! wants short codes. Selectors that resolve to nothing fall back to
//! auto-detection rather than failing the job.

use log::info;

/// Map a human-readable language name to the Whisper language code.
pub fn whisper_language_code(name: &str) -> Option<&'static str> {
    let code = match name {
        "English" => "en",
        "Mandarin Chinese" => "zh",
        "Hindi" => "hi",
        "Spanish" => "es",
        "Modern Standard Arabic" => "ar",
        "French" => "fr",
        "Portuguese (European)" | "Portuguese (Brazilian)" => "pt",
        "Russian" => "ru",
        "Indonesian" => "id",
        "Urdu" => "ur",
        "Standard German" => "de",
        "Japanese" => "ja",
        "Vietnamese" => "vi",
        "Turkish" => "tr",
        "Italian" => "it",
        "Korean" => "ko",
        "Romanian" => "ro",
        "Greek" => "el",
        "Persian" => "fa",
        _ => return None,
    };
    Some(code)
}

/// Resolve a selector into the code handed to whisper. `None` means
/// auto-detect. Selectors that already look like a code pass through.
pub(crate) fn resolve_selector(selector: Option<&str>) -> Option<String> {
    let selector = selector?.trim();
    if selector.is_empty() || selector.eq_ignore_ascii_case("auto") {
        return None;
    }
    if let Some(code) = whisper_language_code(selector) {
        return Some(code.to_string());
    }
    if selector.len() <= 3 && selector.chars().all(|c| c.is_ascii_lowercase()) {
        return Some(selector.to_string());
    }
    info!(
        "Language '{}' not recognized; falling back to auto-detection",
        selector
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_names() {
        assert_eq!(whisper_language_code("English"), Some("en"));
        assert_eq!(whisper_language_code("Standard German"), Some("de"));
        assert_eq!(whisper_language_code("Portuguese (Brazilian)"), Some("pt"));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(whisper_language_code("Klingon"), None);
    }

    #[test]
    fn selector_resolves_names_and_codes() {
        assert_eq!(resolve_selector(Some("Japanese")), Some("ja".to_string()));
        assert_eq!(resolve_selector(Some("ja")), Some("ja".to_string()));
    }

    #[test]
    fn selector_falls_back_to_auto_detect() {
        assert_eq!(resolve_selector(None), None);
        assert_eq!(resolve_selector(Some("")), None);
        assert_eq!(resolve_selector(Some("Nigerian Pidgin")), None);
    }
}
