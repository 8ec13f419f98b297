use crate::helpers::TestCase;

/// The project can live in a subdirectory.
#[test]
fn test() {
    TestCase::new(file!()).run("--path=app");
}
