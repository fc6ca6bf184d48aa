//! Locale code mapping between translation-platform identifiers and Android
//! resource directory suffixes.

/// Locale codes whose Android resource directory uses a legacy ISO-639 code.
///
/// Android inherited these from Java's `Locale`, which predates the current
/// codes for Hebrew, Yiddish and Indonesian.
const LEGACY_CODE_MAPPINGS: [(&str, &str); 3] = [("he", "iw"), ("yi", "ji"), ("id", "in")];

/// Converts a translation-platform locale code to the code Android uses for
/// resource directories.
///
/// Region-qualified codes such as `pt-BR` become `pt-rBR`, matching the
/// `values-pt-rBR` directory naming convention. Codes with no region
/// qualifier, and anything that is not a well-formed locale tag, pass
/// through unchanged. Total over all inputs.
pub fn android_locale(locale: &str) -> String {
    for (code, legacy) in LEGACY_CODE_MAPPINGS {
        if locale == code {
            return legacy.to_string();
        }
    }

    if let Some((language, region)) = locale.split_once('-')
        && !language.is_empty()
        && !region.is_empty()
        && language.bytes().all(|b| b.is_ascii_lowercase())
        && region.bytes().all(|b| b.is_ascii_uppercase())
    {
        return format!("{language}-r{region}");
    }

    locale.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn legacy_codes_use_override_table() {
        assert_eq!(android_locale("he"), "iw");
        assert_eq!(android_locale("yi"), "ji");
        assert_eq!(android_locale("id"), "in");
    }

    #[test]
    fn region_qualified_codes_get_r_prefix() {
        assert_eq!(android_locale("pt-BR"), "pt-rBR");
        assert_eq!(android_locale("es-ES"), "es-rES");
        assert_eq!(android_locale("zh-CN"), "zh-rCN");
    }

    #[test]
    fn plain_codes_pass_through() {
        assert_eq!(android_locale("de"), "de");
        assert_eq!(android_locale("fr"), "fr");
        assert_eq!(android_locale("en"), "en");
    }

    #[test]
    fn malformed_tags_pass_through() {
        // Script subtags and mixed case don't match the region pattern.
        assert_eq!(android_locale("sr-Cyrl"), "sr-Cyrl");
        assert_eq!(android_locale("PT-BR"), "PT-BR");
        assert_eq!(android_locale("pt-"), "pt-");
        assert_eq!(android_locale("-BR"), "-BR");
        assert_eq!(android_locale(""), "");
    }

    proptest! {
        #[test]
        fn well_formed_region_tags_are_rewritten(
            language in "[a-z]{2,8}",
            region in "[A-Z]{2,8}",
        ) {
            let tag = format!("{language}-{region}");
            prop_assert_eq!(android_locale(&tag), format!("{language}-r{region}"));
        }

        #[test]
        fn hyphenless_codes_outside_the_table_are_unchanged(
            locale in "[a-z]{3,8}",
        ) {
            // Three-letter-plus codes can't collide with the two-letter
            // override table entries.
            prop_assert_eq!(android_locale(&locale), locale);
        }

        #[test]
        fn mapper_is_total(locale in ".*") {
            // Never panics, whatever the input.
            let _ = android_locale(&locale);
        }
    }
}
