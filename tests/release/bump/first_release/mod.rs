use crate::helpers::TestCase;

/// Labels don't matter when there's nothing released yet.
#[test]
fn test() {
    TestCase::new(file!()).run("");
}
