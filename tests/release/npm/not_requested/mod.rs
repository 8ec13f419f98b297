use crate::helpers::TestCase;

/// Manifests are left alone without `--npm`.
#[test]
fn test() {
    TestCase::new(file!()).run("");
}
