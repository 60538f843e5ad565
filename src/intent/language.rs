//! Language-name normalization for the translate intent.

/// Common language names and the codes the translation provider expects.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("spanish", "es"),
    ("french", "fr"),
    ("german", "de"),
    ("italian", "it"),
    ("greek", "el"),
    ("japanese", "ja"),
    ("chinese", "zh-CN"),
    ("russian", "ru"),
    ("portuguese", "pt"),
    ("arabic", "ar"),
    ("hindi", "hi"),
];

/// Map a language name to its code (case-insensitive).
///
/// Unknown names pass through lower-cased; the translation provider decides
/// whether they are usable.
pub fn language_code(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    LANGUAGES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_map_to_codes() {
        assert_eq!(language_code("greek"), "el");
        assert_eq!(language_code("Chinese"), "zh-CN");
        assert_eq!(language_code("  SPANISH "), "es");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(language_code("Klingon"), "klingon");
        assert_eq!(language_code("nl"), "nl");
    }
}
