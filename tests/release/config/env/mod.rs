use crate::helpers::TestCase;

#[test]
fn test() {
    TestCase::new(file!())
        .env("YANKEE_NPM", "true")
        .run("");
}
