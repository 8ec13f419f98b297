use snapbox::Assert;

/// Assert with snapshots that can be overwritten by setting `SNAPSHOTS=overwrite`.
pub fn assert() -> Assert {
    Assert::new().action_env("SNAPSHOTS").normalize_paths(true)
}
