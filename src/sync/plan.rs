//! Pure planning for a sync run: which paths need an update, what the
//! working branch is called, and what the commits and pull request say.
//!
//! Nothing here touches the network, which is what makes the decision logic
//! testable without a gateway.

use crate::gateway::FileSnapshot;

/// Prefix of every working branch this tool creates.
pub const WORKING_BRANCH_PREFIX: &str = "strsync/string-import-";

/// One path that needs an update on the release branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// The candidate path.
    pub path: String,
    /// The file as it stands on the main branch.
    pub source: FileSnapshot,
    /// The file as it stands on the release branch, or `None` when it does
    /// not exist there yet. The SHA doubles as the expected-state token for
    /// the update.
    pub destination: Option<FileSnapshot>,
}

impl ChangeEntry {
    /// Whether applying this entry creates a new file rather than updating
    /// an existing one.
    pub fn is_creation(&self) -> bool {
        self.destination.is_none()
    }
}

/// The ordered set of paths whose content differs between the main branch
/// and the release branch.
///
/// Iteration order follows candidate-path order, which governs both the
/// order updates are applied in and the order the pull request lists them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    /// Computes the change set from per-path snapshot pairs, preserving
    /// input order.
    ///
    /// A path is included iff it is absent on the destination or its
    /// content SHA differs from the source's.
    pub fn compute(pairs: Vec<(FileSnapshot, Option<FileSnapshot>)>) -> Self {
        let entries = pairs
            .into_iter()
            .filter(|(source, destination)| match destination {
                Some(destination) => destination.sha != source.sha,
                None => true,
            })
            .map(|(source, destination)| ChangeEntry {
                path: source.path.clone(),
                source,
                destination,
            })
            .collect();
        ChangeSet { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// The changed paths, in change-set order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}

/// Name of the working branch for a run started at the given unix time.
///
/// The timestamp keeps concurrent-ish runs from colliding on the ref name;
/// it is not a serialization mechanism.
pub fn working_branch_name(unix_seconds: i64) -> String {
    format!("{WORKING_BRANCH_PREFIX}{unix_seconds}")
}

/// Commit message for one file update.
pub fn commit_message(path: &str) -> String {
    format!("Strings update - {path}")
}

/// Pull request title for a sync run.
pub fn pr_title(product_name: &str, major_version: u64) -> String {
    format!("String sync for {product_name} v{major_version}")
}

/// Pull request body: a short explanation followed by one bullet per
/// changed path, in change-set order.
pub fn pr_body(
    product_name: &str,
    main_branch: &str,
    release_branch: &str,
    changes: &ChangeSet,
) -> String {
    let mut list_of_changes = String::new();
    for entry in changes.entries() {
        list_of_changes.push_str(&format!(" * `{}`\n", entry.path));
    }

    format!(
        "This (automated) patch syncs strings from {product_name} `{main_branch}` to \
         `{release_branch}`.\n\nThe following files needed an update:\n\n{list_of_changes}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sha;
    use proptest::prelude::*;

    fn snapshot(path: &str, sha: &str) -> FileSnapshot {
        FileSnapshot {
            path: path.to_string(),
            sha: Sha::new(sha),
            content: format!("content of {path}@{sha}"),
        }
    }

    #[test]
    fn identical_snapshots_are_excluded() {
        let changes = ChangeSet::compute(vec![(
            snapshot("l10n.toml", "aaa"),
            Some(snapshot("l10n.toml", "aaa")),
        )]);
        assert!(changes.is_empty());
    }

    #[test]
    fn differing_sha_is_included_as_update() {
        let changes = ChangeSet::compute(vec![(
            snapshot("a.xml", "aaa"),
            Some(snapshot("a.xml", "bbb")),
        )]);
        assert_eq!(changes.len(), 1);
        assert!(!changes.entries()[0].is_creation());
    }

    #[test]
    fn absent_destination_is_included_as_creation() {
        let changes = ChangeSet::compute(vec![(snapshot("a.xml", "aaa"), None)]);
        assert_eq!(changes.len(), 1);
        assert!(changes.entries()[0].is_creation());
    }

    #[test]
    fn order_follows_input_order() {
        let changes = ChangeSet::compute(vec![
            (snapshot("b.xml", "1"), None),
            (snapshot("a.xml", "2"), Some(snapshot("a.xml", "3"))),
            (snapshot("c.xml", "4"), Some(snapshot("c.xml", "4"))),
        ]);
        assert_eq!(changes.paths(), vec!["b.xml", "a.xml"]);
    }

    #[test]
    fn working_branch_name_embeds_timestamp() {
        assert_eq!(
            working_branch_name(1_600_000_000),
            "strsync/string-import-1600000000"
        );
    }

    #[test]
    fn commit_message_names_the_path() {
        assert_eq!(
            commit_message("app/src/main/res/values-de/strings.xml"),
            "Strings update - app/src/main/res/values-de/strings.xml"
        );
    }

    #[test]
    fn pr_title_names_product_and_version() {
        assert_eq!(pr_title("Fenix", 87), "String sync for Fenix v87");
    }

    #[test]
    fn pr_body_lists_every_change_as_a_bullet() {
        let changes = ChangeSet::compute(vec![
            (snapshot("l10n.toml", "1"), Some(snapshot("l10n.toml", "2"))),
            (snapshot("app/src/main/res/values-de/strings.xml", "3"), None),
        ]);
        let body = pr_body("Fenix", "master", "releases_v87.0.0", &changes);

        assert!(body.starts_with(
            "This (automated) patch syncs strings from Fenix `master` to `releases_v87.0.0`."
        ));
        assert!(body.contains(" * `l10n.toml`\n"));
        assert!(body.contains(" * `app/src/main/res/values-de/strings.xml`\n"));
        // Order of bullets matches the change set.
        assert!(
            body.find("l10n.toml").unwrap() < body.find("values-de").unwrap(),
            "bullets must follow change-set order"
        );
    }

    // ─── Property Tests ───────────────────────────────────────────────────────

    /// Per-path inputs: source sha, and destination sha when the file exists
    /// on the release branch.
    fn arb_pairs() -> impl Strategy<Value = Vec<(FileSnapshot, Option<FileSnapshot>)>> {
        prop::collection::vec(("[0-9a-f]{8}", prop::option::of("[0-9a-f]{8}")), 0..20).prop_map(
            |shas| {
                shas.into_iter()
                    .enumerate()
                    .map(|(i, (src, dst))| {
                        let path = format!("res/values-l{i}/strings.xml");
                        (
                            snapshot(&path, &src),
                            dst.map(|sha| snapshot(&path, &sha)),
                        )
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn change_set_is_a_subset_of_candidates(pairs in arb_pairs()) {
            let candidates: Vec<String> =
                pairs.iter().map(|(src, _)| src.path.clone()).collect();
            let changes = ChangeSet::compute(pairs);
            for path in changes.paths() {
                prop_assert!(candidates.contains(&path));
            }
        }

        #[test]
        fn membership_iff_absent_or_differs(pairs in arb_pairs()) {
            let expected: Vec<String> = pairs
                .iter()
                .filter(|(src, dst)| dst.as_ref().is_none_or(|d| d.sha != src.sha))
                .map(|(src, _)| src.path.clone())
                .collect();
            let changes = ChangeSet::compute(pairs);
            prop_assert_eq!(changes.paths(), expected);
        }

        #[test]
        fn pr_body_lists_each_change_exactly_once(pairs in arb_pairs()) {
            let changes = ChangeSet::compute(pairs);
            let body = pr_body("Fenix", "master", "releases_v87.0.0", &changes);
            for entry in changes.entries() {
                let bullet = format!(" * `{}`\n", entry.path);
                prop_assert_eq!(body.matches(&bullet).count(), 1);
            }
        }
    }
}
