use crate::helpers::TestCase;

/// A manifest without a version gets one at the end.
#[test]
fn test() {
    TestCase::new(file!()).run("--npm");
}
