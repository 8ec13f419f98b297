use crate::helpers::TestCase;

/// The dry run reports everything and changes nothing, then the real run does it all.
#[test]
fn test() {
    TestCase::new(file!())
        .expected_commit("1.3.0", &["Changelog.yaml", "package.json"])
        .expected_tags(&["v1.3.0"])
        .run("--npm --tag");
}
