use crate::helpers::TestCase;

/// Tagging commits first, so the tag points at the release.
#[test]
fn test() {
    TestCase::new(file!())
        .expected_commit("1.2.4", &["Changelog.yaml"])
        .expected_tags(&["v1.2.4"])
        .run("--tag");
}
