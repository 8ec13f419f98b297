use crate::helpers::TestCase;

/// Flags add to the config file, a `false` there doesn't turn them off.
#[test]
fn test() {
    TestCase::new(file!()).run("--npm");
}
