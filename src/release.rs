//! Release branch naming and the beta gate.
//!
//! Strings are only synced to branches that are still in beta; released
//! versions get string updates as a manual exception, never automatically.

/// Path of the version descriptor file on a release branch.
pub const VERSION_FILE_PATH: &str = "version.txt";

/// Substring of the version descriptor marking a branch as still in beta.
pub const BETA_MARKER: &str = "-beta.";

/// First major version using the underscore branch naming scheme.
///
/// Release branches were renamed from `releases/vNN.0.0` to
/// `releases_vNN.0.0` starting with this version; older branches keep the
/// slash form.
const UNDERSCORE_NAMING_THRESHOLD: u64 = 85;

/// Returns the release branch name for the given major version.
pub fn release_branch_name(major_version: u64) -> String {
    if major_version < UNDERSCORE_NAMING_THRESHOLD {
        format!("releases/v{major_version}.0.0")
    } else {
        format!("releases_v{major_version}.0.0")
    }
}

/// Whether a version descriptor identifies a beta build.
pub fn is_beta_version(version: &str) -> bool {
    version.contains(BETA_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn branch_naming_threshold_boundary() {
        assert_eq!(release_branch_name(84), "releases/v84.0.0");
        assert_eq!(release_branch_name(85), "releases_v85.0.0");
        assert_eq!(release_branch_name(86), "releases_v86.0.0");
    }

    #[test]
    fn beta_marker_detection() {
        assert!(is_beta_version("87.0.0-beta.2"));
        assert!(is_beta_version("85.0.0-beta.1\n"));
        assert!(!is_beta_version("87.0.0"));
        assert!(!is_beta_version("87.0.0-rc.1"));
        assert!(!is_beta_version(""));
    }

    proptest! {
        #[test]
        fn branch_name_embeds_major_version(major in 0u64..10_000) {
            let name = release_branch_name(major);
            let expected = format!("v{}.0.0", major);
            prop_assert!(name.contains(&expected));
            prop_assert!(name.starts_with("releases"));
        }

        #[test]
        fn separator_follows_threshold(major in 0u64..10_000) {
            let name = release_branch_name(major);
            if major < 85 {
                prop_assert!(name.starts_with("releases/"));
            } else {
                prop_assert!(name.starts_with("releases_"));
            }
        }
    }
}
