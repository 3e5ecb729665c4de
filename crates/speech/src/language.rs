/// Application language names and the Whisper codes they map to.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("telugu", "te"),
    ("assamese", "as"),
    ("english", "en"),
];

/// Language names accepted at the HTTP edge.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    LANGUAGE_CODES.iter().map(|(name, _)| *name)
}

pub fn is_supported(language: &str) -> bool {
    lookup(language).is_some()
}

fn lookup(language: &str) -> Option<&'static str> {
    let needle = language.trim().to_lowercase();
    LANGUAGE_CODES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, code)| *code)
}

/// Maps an application language name to a Whisper code, falling back to `fallback`
/// for anything not in the table.
pub fn whisper_code<'a>(language: &str, fallback: &'a str) -> &'a str {
    lookup(language).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_languages_map_to_codes() {
        assert_eq!(whisper_code("telugu", "te"), "te");
        assert_eq!(whisper_code("assamese", "te"), "as");
        assert_eq!(whisper_code("english", "te"), "en");
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(whisper_code("  Assamese ", "te"), "as");
        assert!(is_supported("TELUGU"));
    }

    #[test]
    fn unknown_language_uses_fallback() {
        assert_eq!(whisper_code("klingon", "te"), "te");
        assert_eq!(whisper_code("", "te"), "te");
        assert!(!is_supported("klingon"));
    }

    #[test]
    fn supported_list_is_complete() {
        let names: Vec<_> = supported_languages().collect();
        assert_eq!(names, vec!["telugu", "assamese", "english"]);
    }
}
