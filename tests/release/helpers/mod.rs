#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod assert;
mod files;
mod test_case;

pub use assert::*;
pub use files::*;
pub use git::*;
pub use test_case::*;
