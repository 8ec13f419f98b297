use crate::helpers::TestCase;

/// Old changelogs call the unreleased section `master`, it's never written back.
#[test]
fn test() {
    TestCase::new(file!()).run("");
}
