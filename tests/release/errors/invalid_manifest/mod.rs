use crate::helpers::TestCase;

/// The changelog has already been released when the manifest fails, nothing is rolled back.
#[test]
fn test() {
    TestCase::new(file!()).run("--npm");
}
