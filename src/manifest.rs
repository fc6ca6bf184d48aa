//! The localization manifest and the candidate path set derived from it.
//!
//! The manifest on the main branch is the authoritative list of locales that
//! ship in release builds. It is itself never copied to the release branch;
//! the uplift-tracked index file (`l10n.toml`) and the per-locale resource
//! files are.

use serde::Deserialize;

use crate::locale::android_locale;

/// Path of the release localization manifest on the main branch.
pub const MANIFEST_PATH: &str = "l10n-release.toml";

/// Path of the uplift-tracked localization index file.
///
/// Unlike the manifest this file is part of the sync set: release builds
/// read it, so it must track the main branch.
pub const INDEX_PATH: &str = "l10n.toml";

/// The localization manifest document.
///
/// Only the `locales` key matters here; the manifest carries other tooling
/// configuration that is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct L10nManifest {
    /// Locales shipping in release builds, in manifest order.
    pub locales: Vec<String>,
}

impl L10nManifest {
    /// Parses a manifest from its TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Returns every path eligible for sync, in sync order: the index file
    /// first, then one resource file per locale in manifest order.
    pub fn candidate_paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(self.locales.len() + 1);
        paths.push(INDEX_PATH.to_string());
        for locale in &self.locales {
            paths.push(strings_path(locale));
        }
        paths
    }
}

/// Resource file path for one locale, using the Android directory suffix.
fn strings_path(locale: &str) -> String {
    format!(
        "app/src/main/res/values-{}/strings.xml",
        android_locale(locale)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locales_and_ignores_other_keys() {
        let manifest = L10nManifest::parse(
            r#"
            basedir = "."
            locales = ["de", "fr", "pt-BR"]

            [env]
            ANDROID = "1"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.locales, vec!["de", "fr", "pt-BR"]);
    }

    #[test]
    fn parse_fails_without_locales_key() {
        assert!(L10nManifest::parse("basedir = \".\"\n").is_err());
    }

    #[test]
    fn parse_fails_on_malformed_toml() {
        assert!(L10nManifest::parse("locales = [").is_err());
    }

    #[test]
    fn candidate_paths_start_with_index_file() {
        let manifest = L10nManifest {
            locales: vec!["de".to_string()],
        };
        assert_eq!(
            manifest.candidate_paths(),
            vec![
                "l10n.toml".to_string(),
                "app/src/main/res/values-de/strings.xml".to_string(),
            ]
        );
    }

    #[test]
    fn candidate_paths_follow_manifest_order_and_mapping() {
        let manifest = L10nManifest {
            locales: vec!["pt-BR".to_string(), "he".to_string(), "de".to_string()],
        };
        assert_eq!(
            manifest.candidate_paths(),
            vec![
                "l10n.toml".to_string(),
                "app/src/main/res/values-pt-rBR/strings.xml".to_string(),
                "app/src/main/res/values-iw/strings.xml".to_string(),
                "app/src/main/res/values-de/strings.xml".to_string(),
            ]
        );
    }

    #[test]
    fn empty_locale_list_yields_only_the_index_file() {
        let manifest = L10nManifest::parse("locales = []\n").unwrap();
        assert_eq!(manifest.candidate_paths(), vec!["l10n.toml".to_string()]);
    }
}
