use crate::helpers::TestCase;

#[test]
fn test() {
    TestCase::new(file!())
        .expected_commit("1.3.0", &["Changelog.yaml", "package.json"])
        .expected_tags(&["v1.3.0"])
        .run("");
}
