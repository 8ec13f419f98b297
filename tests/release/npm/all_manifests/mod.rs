use crate::helpers::TestCase;

#[test]
fn test() {
    TestCase::new(file!())
        .expected_commit(
            "1.3.0",
            &[
                "Changelog.yaml",
                "npm-shrinkwrap.json",
                "package-lock.json",
                "package.json",
            ],
        )
        .run("--npm --commit");
}
