use crate::helpers::TestCase;

/// Only the manifests which exist are committed.
#[test]
fn test() {
    TestCase::new(file!())
        .expected_commit("1.2.4", &["Changelog.yaml", "package.json"])
        .run("--npm --commit");
}
